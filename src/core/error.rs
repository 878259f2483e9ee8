use thiserror::Error;

/// Every fallible operation in this crate maps the underlying library's
/// failure into exactly one of these kinds, at the point of the call.
/// Nothing in this layer retries: a failure is either a programming/input
/// error or an authentically invalid signature, neither of which is
/// transient.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// Key material could not be decoded (DER/PEM parse failure, or an EC
    /// key on a curve other than P-256).
    #[error("malformed key material")]
    MalformedInput,

    /// The back-end could not allocate or prepare a context, as opposed to
    /// rejecting the input. Distinguishes resource exhaustion from a bad
    /// stored key.
    #[error("curve back-end context setup failed")]
    ResourceSetupFailed,

    /// Verify-path failure. Covers both structurally invalid and
    /// cryptographically wrong signatures; callers cannot tell them apart.
    #[error("security/verification failed")]
    SecurityVerificationFailed,

    /// The caller's output buffer cannot hold the signature. Carries the
    /// required length.
    #[error("output buffer too small, {needed} bytes required")]
    BufferTooSmall { needed: usize },

    /// The supplied key decodes, but is not an EC private key (helper sign
    /// path, e.g. an RSA key).
    #[error("key is not an elliptic-curve private key")]
    InvalidArgument,

    /// Any other library failure, carrying the library's message for
    /// logging. Callers should not branch on the contents.
    #[error("curve back-end failure: {0}")]
    Backend(String),
}
