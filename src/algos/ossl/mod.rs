use openssl::{
    bn::{BigNum, BigNumContext, BigNumRef},
    ec::{EcGroup, EcKey, EcPoint},
    ecdsa::EcdsaSig,
    error::ErrorStack,
    nid::Nid,
    pkey::{Id, PKey, Private},
};
use zeroize::Zeroizing;

use crate::core::CurveOps;
use crate::core::ecdsa::{Digest, KeyPair, PublicKey, Signature};
use crate::core::error::Error;
use crate::core::wire::{FIELD_LEN, PUBLIC_KEY_LEN, SIGNATURE_LEN};

/// P-256 back-end on the `openssl` crate.
///
/// OpenSSL's public API has no RFC 6979 entry point, so both signing paths
/// draw their nonces from the library's RNG: signing the same (key, digest)
/// pair twice yields different signatures. Verification is unaffected.
pub struct OsslOps;

fn p256_group() -> Result<EcGroup, Error> {
    EcGroup::from_curve_name(Nid::X9_62_PRIME256V1).map_err(|_| Error::ResourceSetupFailed)
}

/// Big-endian, zero-padded to the destination width. `to_vec_padded` refuses
/// values wider than the destination, so an overlong R, S or coordinate can
/// never truncate silently.
fn write_fixed(value: &BigNumRef, dst: &mut [u8]) -> Result<(), Error> {
    let bytes = value
        .to_vec_padded(dst.len() as i32)
        .map_err(|e| Error::Backend(e.to_string()))?;
    dst.copy_from_slice(&bytes);
    Ok(())
}

impl CurveOps for OsslOps {
    type ParsedKey = EcKey<Private>;

    fn generate() -> Result<KeyPair, Error> {
        let group = p256_group()?;
        let key = EcKey::generate(&group).map_err(|e| Error::Backend(e.to_string()))?;
        // Exact-length encode into scratch; the owned buffer only ever
        // receives the used prefix.
        let der = Zeroizing::new(
            key.private_key_to_der()
                .map_err(|e| Error::Backend(e.to_string()))?,
        );
        KeyPair::from_der(&der)
    }

    fn parse(der: &[u8]) -> Result<EcKey<Private>, Error> {
        let key = EcKey::private_key_from_der(der).map_err(|_| Error::MalformedInput)?;
        // A key on a foreign curve is as unusable as an undecodable one.
        if key.group().curve_name() != Some(Nid::X9_62_PRIME256V1) {
            return Err(Error::MalformedInput);
        }
        Ok(key)
    }

    fn public_key(key: &EcKey<Private>) -> Result<PublicKey, Error> {
        let mut ctx = BigNumContext::new().map_err(|_| Error::ResourceSetupFailed)?;
        let mut x = BigNum::new().map_err(|_| Error::ResourceSetupFailed)?;
        let mut y = BigNum::new().map_err(|_| Error::ResourceSetupFailed)?;
        key.public_key()
            .affine_coordinates(key.group(), &mut x, &mut y, &mut ctx)
            .map_err(|e| Error::Backend(e.to_string()))?;

        let mut raw = [0u8; PUBLIC_KEY_LEN];
        write_fixed(&x, &mut raw[..FIELD_LEN])?;
        write_fixed(&y, &mut raw[FIELD_LEN..])?;
        Ok(PublicKey::from(raw))
    }

    fn sign(key: &EcKey<Private>, digest: &Digest) -> Result<Signature, Error> {
        let signature =
            EcdsaSig::sign(&digest.0, key).map_err(|e| Error::Backend(e.to_string()))?;

        let mut raw = [0u8; SIGNATURE_LEN];
        write_fixed(signature.r(), &mut raw[..FIELD_LEN])?;
        write_fixed(signature.s(), &mut raw[FIELD_LEN..])?;
        Ok(Signature::from(raw))
    }

    fn verify(public: &PublicKey, digest: &Digest, signature: &Signature) -> Result<(), Error> {
        // One error for the whole path: failed reconstruction and a wrong
        // signature look the same to the caller.
        match checked_verify(public, digest, signature) {
            Ok(true) => Ok(()),
            Ok(false) | Err(_) => Err(Error::SecurityVerificationFailed),
        }
    }

    fn sign_prehash(pem: &str, digest: &[u8], output: &mut [u8]) -> Result<usize, Error> {
        let pkey = PKey::private_key_from_pem(pem.as_bytes()).map_err(|_| Error::MalformedInput)?;
        if pkey.id() != Id::EC {
            return Err(Error::InvalidArgument);
        }
        let key = pkey.ec_key().map_err(|_| Error::MalformedInput)?;
        if key.group().curve_name() != Some(Nid::X9_62_PRIME256V1) {
            return Err(Error::MalformedInput);
        }

        let signature = EcdsaSig::sign(digest, &key).map_err(|e| Error::Backend(e.to_string()))?;
        let r = signature.r().to_vec();
        let s = signature.s().to_vec();

        let needed = r.len() + s.len();
        if output.len() < needed {
            return Err(Error::BufferTooSmall { needed });
        }
        output[..r.len()].copy_from_slice(&r);
        output[r.len()..needed].copy_from_slice(&s);
        Ok(needed)
    }
}

fn checked_verify(
    public: &PublicKey,
    digest: &Digest,
    signature: &Signature,
) -> Result<bool, ErrorStack> {
    let group = EcGroup::from_curve_name(Nid::X9_62_PRIME256V1)?;
    let mut ctx = BigNumContext::new()?;

    // The stored X ‖ Y is taken as affine coordinates of a curve point.
    let x = BigNum::from_slice(public.x())?;
    let y = BigNum::from_slice(public.y())?;
    let mut point = EcPoint::new(&group)?;
    point.set_affine_coordinates_gfp(&group, &x, &y, &mut ctx)?;
    let key = EcKey::from_public_key(&group, &point)?;
    key.check_key()?;

    let r = BigNum::from_slice(signature.r())?;
    let s = BigNum::from_slice(signature.s())?;
    let signature = EcdsaSig::from_private_components(r, s)?;
    signature.verify(&digest.0, &key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{
        self, RSA_PKCS8_PEM, SAMPLE_DIGEST, SAMPLE_KEY_DER, SAMPLE_KEY_PKCS8_PEM,
        SAMPLE_KEY_SEC1_PEM, SAMPLE_KEY_X, SAMPLE_KEY_Y, SAMPLE_SIG_R, SAMPLE_SIG_S,
    };

    #[test]
    pub fn test_ossl_signing() {
        testutil::test_signing_harness::<OsslOps>(&Digest([3; 32]));
    }

    #[test]
    pub fn arbtest_simple_ossl() {
        testutil::run_arbtest_harness_simple::<OsslOps>();
    }

    #[test]
    pub fn test_ossl_corruption() {
        testutil::test_corruption_harness::<OsslOps>(&Digest([0xd9; 32]));
    }

    // Verify side of RFC 6979 A.2.5 (P-256, SHA-256, "sample"): the vector
    // was produced deterministically, but checking it needs no 6979 support.
    #[test]
    pub fn test_known_answer_verify() {
        let mut raw = [0u8; PUBLIC_KEY_LEN];
        raw[..FIELD_LEN].copy_from_slice(&SAMPLE_KEY_X);
        raw[FIELD_LEN..].copy_from_slice(&SAMPLE_KEY_Y);
        let public = PublicKey::from(raw);

        let mut sig = [0u8; SIGNATURE_LEN];
        sig[..FIELD_LEN].copy_from_slice(&SAMPLE_SIG_R);
        sig[FIELD_LEN..].copy_from_slice(&SAMPLE_SIG_S);
        let signature = Signature::from(sig);

        OsslOps::verify(&public, &Digest(SAMPLE_DIGEST), &signature).unwrap();
    }

    #[test]
    pub fn test_parse_exports_expected_public_key() {
        let key = OsslOps::parse(&SAMPLE_KEY_DER).unwrap();
        let public = OsslOps::public_key(&key).unwrap();
        assert_eq!(public.x(), SAMPLE_KEY_X);
        assert_eq!(public.y(), SAMPLE_KEY_Y);

        let digest = Digest(SAMPLE_DIGEST);
        let signature = OsslOps::sign(&key, &digest).unwrap();
        OsslOps::verify(&public, &digest, &signature).unwrap();
    }

    #[test]
    pub fn test_signing_is_randomized() {
        let key = OsslOps::parse(&SAMPLE_KEY_DER).unwrap();
        let digest = Digest(SAMPLE_DIGEST);
        let first = OsslOps::sign(&key, &digest).unwrap();
        let second = OsslOps::sign(&key, &digest).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    pub fn test_parse_rejects_foreign_curve() {
        let group = EcGroup::from_curve_name(Nid::SECP384R1).unwrap();
        let key = EcKey::generate(&group).unwrap();
        let der = key.private_key_to_der().unwrap();
        assert_eq!(OsslOps::parse(&der).unwrap_err(), Error::MalformedInput);
    }

    #[test]
    pub fn test_prehash_accepts_both_pem_labels() {
        let mut output = [0u8; 80];
        for pem in [SAMPLE_KEY_SEC1_PEM, SAMPLE_KEY_PKCS8_PEM] {
            let written = OsslOps::sign_prehash(pem, &SAMPLE_DIGEST, &mut output).unwrap();
            assert!(written >= 2 && written <= SIGNATURE_LEN);
        }
    }

    #[test]
    pub fn test_prehash_rejects_rsa() {
        let mut output = [0u8; 80];
        assert_eq!(
            OsslOps::sign_prehash(RSA_PKCS8_PEM, &SAMPLE_DIGEST, &mut output),
            Err(Error::InvalidArgument)
        );
    }

    #[test]
    pub fn test_prehash_buffer_capacity() {
        assert!(matches!(
            OsslOps::sign_prehash(SAMPLE_KEY_SEC1_PEM, &SAMPLE_DIGEST, &mut []),
            Err(Error::BufferTooSmall { needed }) if needed >= 2
        ));
    }
}
