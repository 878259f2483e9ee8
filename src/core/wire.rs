//! Byte-layout contract for the fixed-width wire formats.
//!
//! Every multi-precision value leaving this crate is big-endian and
//! zero-padded to exactly one field element: X then Y for public keys, R
//! then S for signatures. The width never floats with the value. The
//! stateless sign helper is the one exception and uses natural (unpadded)
//! component lengths.

/// Width of one P-256 field element / big-integer component.
pub const FIELD_LEN: usize = 32;

/// Raw public key: X ‖ Y.
pub const PUBLIC_KEY_LEN: usize = 2 * FIELD_LEN;

/// Fixed-width signature: R ‖ S.
pub const SIGNATURE_LEN: usize = 2 * FIELD_LEN;

/// SHA-256 digest length. Digests are computed by the caller, never here.
pub const DIGEST_LEN: usize = 32;

/// Upper bound for a SEC1 DER-encoded P-256 private key, including the
/// embedded public key and ASN.1 overhead.
pub const MAX_DER_LEN: usize = 125;

/// Strips leading zero bytes, yielding the natural big-endian encoding.
/// An all-zero value trims to the empty slice.
pub(crate) fn trim_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}
