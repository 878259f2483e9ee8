#[cfg(feature="rustcrypto")]
pub mod rustcrypto;

#[cfg(feature="ossl")]
pub mod ossl;

#[cfg(not(any(feature = "rustcrypto", feature = "ossl")))]
compile_error!("a curve back-end is required: enable the `rustcrypto` or `ossl` feature");

/// The back-end driving [KeyPair](crate::KeyPair), [PublicKey](crate::PublicKey)
/// and [sign_prehash_pem](crate::sign_prehash_pem).
///
/// This alias is the only place the build-time choice lives; nothing else in
/// the crate branches on the enabled back-end. `rustcrypto` wins when both
/// features are on, which also decides whether signing is deterministic: the
/// RustCrypto back-end derives nonces per RFC 6979, the OpenSSL one draws
/// them at random.
#[cfg(feature="rustcrypto")]
pub type DefaultOps = rustcrypto::RustCryptoOps;

#[cfg(all(feature = "ossl", not(feature = "rustcrypto")))]
pub type DefaultOps = ossl::OsslOps;
