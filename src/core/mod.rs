pub mod ecdsa;
pub mod error;
pub mod wire;

pub use error::Error;

use crate::core::ecdsa::{Digest, KeyPair, PublicKey, Signature};

/// The [CurveOps] trait specifies how a P-256 curve back-end compatible with
/// the wire formats in [wire](crate::core::wire) should be implemented. This
/// allows the adaptation layer to operate over more than one underlying
/// elliptic-curve library, selected at compile time (see
/// [DefaultOps](crate::algos::DefaultOps)).
///
/// Back-ends translate between the fixed-width byte representations
/// ([PublicKey], [Signature]) and their own native key/point values, and map
/// every library failure into exactly one [Error] kind at the call site.
pub trait CurveOps {
    /// The library-native private key value produced by [CurveOps::parse].
    ///
    /// Owned by the caller's frame and dropped at the end of each operation,
    /// so no live library context outlasts the call that created it.
    type ParsedKey;

    /// Generates a fresh P-256 key pair and stores it DER-encoded.
    fn generate() -> Result<KeyPair, Error>;

    /// Loads a SEC1 DER private key blob into a native key value.
    ///
    /// The key algorithm is fixed to EC/P-256; it is never inferred from the
    /// blob. Undecodable input (or a key on another curve) is
    /// [Error::MalformedInput].
    fn parse(der: &[u8]) -> Result<Self::ParsedKey, Error>;

    /// Extracts the affine public-point coordinates as fixed-width X ‖ Y.
    fn public_key(key: &Self::ParsedKey) -> Result<PublicKey, Error>;

    /// Signs a 32-byte digest, producing a fixed-width R ‖ S signature.
    fn sign(key: &Self::ParsedKey, digest: &Digest) -> Result<Signature, Error>;

    /// Checks a fixed-width signature against a raw public key.
    ///
    /// Every failure surfaces as [Error::SecurityVerificationFailed]:
    /// callers cannot tell a malformed signature from a wrong one.
    fn verify(public: &PublicKey, digest: &Digest, signature: &Signature) -> Result<(), Error>;

    /// Signs a caller-length digest with a PEM private key, writing a
    /// variable-length R ‖ S into `output` and returning the written length.
    ///
    /// This is the loose wire format: components carry their natural
    /// big-endian length with no padding.
    fn sign_prehash(pem: &str, digest: &[u8], output: &mut [u8]) -> Result<usize, Error>;
}
