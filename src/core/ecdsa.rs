use std::fmt;
use std::ops::Deref;

use zeroize::Zeroize;

use crate::algos::DefaultOps;
use crate::core::CurveOps;
use crate::core::error::Error;
use crate::core::wire::{DIGEST_LEN, FIELD_LEN, MAX_DER_LEN, PUBLIC_KEY_LEN, SIGNATURE_LEN};

/// An externally computed SHA-256 digest, opaque to this crate.
///
/// Sign/verify never hash anything themselves; the fixed 32-byte width here
/// is what keeps wrong-length digests out of those paths entirely.
#[derive(PartialEq, Eq, Clone, Debug)]
#[repr(transparent)]
pub struct Digest(pub [u8; DIGEST_LEN]);

impl Deref for Digest {
    type Target = [u8; DIGEST_LEN];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<[u8; DIGEST_LEN]> for Digest {
    fn from(value: [u8; DIGEST_LEN]) -> Self {
        Self(value)
    }
}

/// An ECDSA P-256 key pair, held as a SEC1 DER private-key blob.
///
/// The blob is the only state: every operation re-parses it into a transient
/// back-end key that is dropped before the call returns, so no live library
/// context survives between calls and a half-failed operation cannot leave
/// stale cryptographic state behind. The buffer is wiped on drop.
///
/// # Example
/// ```
/// use wiresig::{Digest, KeyPair};
///
/// let pair = KeyPair::generate().unwrap();
/// let public = pair.public_key().unwrap();
///
/// let digest = Digest([7u8; 32]);
/// let signature = pair.sign(&digest).unwrap();
///
/// public.verify(&digest, &signature).unwrap();
/// ```
#[derive(Clone)]
pub struct KeyPair {
    der: [u8; MAX_DER_LEN],
    len: u8,
}

impl KeyPair {
    /// Generates a fresh key pair with the active back-end.
    pub fn generate() -> Result<Self, Error> {
        DefaultOps::generate()
    }

    /// Wraps an externally supplied DER blob, e.g. one loaded from storage.
    ///
    /// Only the size bound is checked here; whether the blob actually decodes
    /// as a P-256 private key surfaces at the next operation, matching the
    /// parse-per-operation model.
    pub fn from_der(der: &[u8]) -> Result<Self, Error> {
        if der.len() > MAX_DER_LEN {
            return Err(Error::MalformedInput);
        }
        let mut pair = Self {
            der: [0u8; MAX_DER_LEN],
            len: der.len() as u8,
        };
        pair.der[..der.len()].copy_from_slice(der);
        Ok(pair)
    }

    /// The stored DER blob, at its exact encoded length.
    pub fn as_der(&self) -> &[u8] {
        &self.der[..self.len as usize]
    }

    /// Exports the public point as fixed-width X ‖ Y.
    pub fn public_key(&self) -> Result<PublicKey, Error> {
        let key = DefaultOps::parse(self.as_der())?;
        DefaultOps::public_key(&key)
    }

    /// Signs a 32-byte digest, producing a fixed-width R ‖ S signature.
    ///
    /// With the default back-end the nonce is derived per RFC 6979, so
    /// signing the same digest twice yields byte-identical signatures.
    pub fn sign(&self, digest: &Digest) -> Result<Signature, Error> {
        let key = DefaultOps::parse(self.as_der())?;
        DefaultOps::sign(&key, digest)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Key material stays out of logs.
        f.debug_struct("KeyPair")
            .field("der_len", &self.len)
            .finish_non_exhaustive()
    }
}

impl Drop for KeyPair {
    fn drop(&mut self) {
        self.der.zeroize();
        self.len = 0;
    }
}

/// A raw P-256 public key: X ‖ Y affine coordinates, each exactly
/// [FIELD_LEN] bytes, big-endian, zero-padded.
///
/// Built from a [KeyPair] or received over the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
#[repr(transparent)]
pub struct PublicKey([u8; PUBLIC_KEY_LEN]);

impl PublicKey {
    /// Accepts exactly [PUBLIC_KEY_LEN] raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let array = bytes.try_into().map_err(|_| Error::MalformedInput)?;
        Ok(Self(array))
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }

    /// The X coordinate.
    pub fn x(&self) -> &[u8] {
        &self.0[..FIELD_LEN]
    }

    /// The Y coordinate.
    pub fn y(&self) -> &[u8] {
        &self.0[FIELD_LEN..]
    }

    /// Checks `signature` over `digest` against this key.
    ///
    /// Any failure, including an X ‖ Y that decodes to no curve point, comes
    /// back as [Error::SecurityVerificationFailed]. Callers are not given
    /// enough to distinguish malformed from wrong; both mean the message is
    /// rejected.
    pub fn verify(&self, digest: &Digest, signature: &Signature) -> Result<(), Error> {
        DefaultOps::verify(self, digest, signature)
    }
}

impl From<[u8; PUBLIC_KEY_LEN]> for PublicKey {
    fn from(value: [u8; PUBLIC_KEY_LEN]) -> Self {
        Self(value)
    }
}

/// A fixed-width ECDSA signature: R ‖ S, each exactly [FIELD_LEN] bytes,
/// big-endian. Leading zero bytes are preserved, never stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
#[repr(transparent)]
pub struct Signature([u8; SIGNATURE_LEN]);

impl Signature {
    /// Accepts exactly [SIGNATURE_LEN] raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let array = bytes.try_into().map_err(|_| Error::MalformedInput)?;
        Ok(Self(array))
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    /// The R component.
    pub fn r(&self) -> &[u8] {
        &self.0[..FIELD_LEN]
    }

    /// The S component.
    pub fn s(&self) -> &[u8] {
        &self.0[FIELD_LEN..]
    }
}

impl From<[u8; SIGNATURE_LEN]> for Signature {
    fn from(value: [u8; SIGNATURE_LEN]) -> Self {
        Self(value)
    }
}

/// Signs a pre-computed digest with a PEM-encoded private key, without going
/// through [KeyPair].
///
/// The key may arrive in `PRIVATE KEY` (PKCS#8) or `EC PRIVATE KEY` (SEC1)
/// armor; anything that is not an EC private key, such as an RSA key, is
/// rejected with [Error::InvalidArgument]. The digest length is the
/// caller's choice rather than fixed at 32 bytes.
///
/// Output is the *loose* wire format: R then S at their natural big-endian
/// lengths, no padding. On success the written length is returned; if
/// `output` cannot hold the signature, [Error::BufferTooSmall] reports the
/// required length and nothing is written. Whether signing is deterministic
/// follows the active back-end, the same as [KeyPair::sign].
pub fn sign_prehash_pem(pem: &str, digest: &[u8], output: &mut [u8]) -> Result<usize, Error> {
    DefaultOps::sign_prehash(pem, digest, output)
}
