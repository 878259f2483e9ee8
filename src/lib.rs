pub mod core;
pub mod algos;

pub use self::algos::DefaultOps;
pub use self::core::ecdsa::{Digest, KeyPair, PublicKey, Signature, sign_prehash_pem};
pub use self::core::{CurveOps, Error};

#[cfg(test)]
pub mod testutil;
pub mod ext;
