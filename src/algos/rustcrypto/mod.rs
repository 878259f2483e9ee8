use p256::{
    EncodedPoint, SecretKey,
    ecdsa::{
        Signature as BackendSignature, SigningKey, VerifyingKey,
        signature::hazmat::{PrehashSigner, PrehashVerifier},
    },
    elliptic_curve::{generic_array::GenericArray, rand_core::OsRng, sec1::ToEncodedPoint},
    pkcs8::{DecodePrivateKey, ObjectIdentifier, PrivateKeyInfo, SecretDocument},
};
use sec1::{EcParameters, EcPrivateKey, der::Encode};
use zeroize::Zeroizing;

use crate::core::CurveOps;
use crate::core::ecdsa::{Digest, KeyPair, PublicKey, Signature};
use crate::core::error::Error;
use crate::core::wire::{self, FIELD_LEN, PUBLIC_KEY_LEN, SIGNATURE_LEN};

/// id-ecPublicKey, the algorithm identifier every PKCS#8 EC key carries.
const EC_ALGORITHM_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");

/// prime256v1, the named-curve parameters element every stored key carries.
const NAMED_CURVE_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");

/// P-256 back-end on the RustCrypto `p256` crate.
///
/// Signing is deterministic (RFC 6979) on both the fixed-width and prehash
/// paths, so a (key, digest) pair always reproduces the same signature.
pub struct RustCryptoOps;

impl CurveOps for RustCryptoOps {
    type ParsedKey = SecretKey;

    fn generate() -> Result<KeyPair, Error> {
        let secret = SecretKey::random(&mut OsRng);
        let scalar = Zeroizing::new(secret.to_bytes());
        let point = secret.public_key().to_encoded_point(false);

        // RFC 5915 body assembled here; `SecretKey::to_sec1_der` leaves out
        // the named-curve element that stored keys carry. Exact-length encode
        // into scratch; the owned buffer only ever receives the used prefix.
        let der = Zeroizing::new(
            EcPrivateKey {
                private_key: &scalar,
                parameters: Some(EcParameters::NamedCurve(NAMED_CURVE_OID)),
                public_key: Some(point.as_bytes()),
            }
            .to_der()
            .map_err(|e| Error::Backend(e.to_string()))?,
        );
        KeyPair::from_der(&der)
    }

    fn parse(der: &[u8]) -> Result<SecretKey, Error> {
        SecretKey::from_sec1_der(der).map_err(|_| Error::MalformedInput)
    }

    fn public_key(key: &SecretKey) -> Result<PublicKey, Error> {
        let point = key.public_key().to_encoded_point(false);
        let (Some(x), Some(y)) = (point.x(), point.y()) else {
            return Err(Error::Backend("public point is the identity".into()));
        };

        let mut raw = [0u8; PUBLIC_KEY_LEN];
        raw[..FIELD_LEN].copy_from_slice(x);
        raw[FIELD_LEN..].copy_from_slice(y);
        Ok(PublicKey::from(raw))
    }

    fn sign(key: &SecretKey, digest: &Digest) -> Result<Signature, Error> {
        let signer = SigningKey::from(key);
        let signature: BackendSignature = signer
            .sign_prehash(&digest.0)
            .map_err(|e| Error::Backend(e.to_string()))?;

        let mut raw = [0u8; SIGNATURE_LEN];
        raw.copy_from_slice(&signature.to_bytes());
        Ok(Signature::from(raw))
    }

    fn verify(public: &PublicKey, digest: &Digest, signature: &Signature) -> Result<(), Error> {
        let point = EncodedPoint::from_untagged_bytes(GenericArray::from_slice(public.as_bytes()));
        let verifier = VerifyingKey::from_encoded_point(&point)
            .map_err(|_| Error::SecurityVerificationFailed)?;
        let signature = BackendSignature::from_slice(signature.as_bytes())
            .map_err(|_| Error::SecurityVerificationFailed)?;
        verifier
            .verify_prehash(&digest.0, &signature)
            .map_err(|_| Error::SecurityVerificationFailed)
    }

    fn sign_prehash(pem: &str, digest: &[u8], output: &mut [u8]) -> Result<usize, Error> {
        let secret = secret_key_from_pem(pem)?;
        let signer = SigningKey::from(&secret);
        // Prehash input shorter than half the field size is refused by the
        // library (bits2field), surfacing as a mapped back-end error.
        let signature: BackendSignature = signer
            .sign_prehash(digest)
            .map_err(|e| Error::Backend(e.to_string()))?;

        let (r, s) = signature.split_bytes();
        let r = wire::trim_leading_zeros(&r);
        let s = wire::trim_leading_zeros(&s);

        let needed = r.len() + s.len();
        if output.len() < needed {
            return Err(Error::BufferTooSmall { needed });
        }
        output[..r.len()].copy_from_slice(r);
        output[r.len()..needed].copy_from_slice(s);
        Ok(needed)
    }
}

/// Accepts `PRIVATE KEY` (PKCS#8) or `EC PRIVATE KEY` (SEC1) armor.
///
/// A decodable key of the wrong algorithm family is the caller handing us
/// the wrong kind of key ([Error::InvalidArgument]); anything undecodable is
/// [Error::MalformedInput].
fn secret_key_from_pem(pem: &str) -> Result<SecretKey, Error> {
    let (label, document) = SecretDocument::from_pem(pem).map_err(|_| Error::MalformedInput)?;

    match label {
        "PRIVATE KEY" => {
            let info =
                PrivateKeyInfo::try_from(document.as_bytes()).map_err(|_| Error::MalformedInput)?;
            if info.algorithm.oid != EC_ALGORITHM_OID {
                return Err(Error::InvalidArgument);
            }
            SecretKey::from_pkcs8_der(document.as_bytes()).map_err(|_| Error::MalformedInput)
        }
        "EC PRIVATE KEY" => {
            SecretKey::from_sec1_der(document.as_bytes()).map_err(|_| Error::MalformedInput)
        }
        _ => Err(Error::InvalidArgument),
    }
}
