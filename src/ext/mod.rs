#[cfg(feature="serde")]
pub mod serde;
