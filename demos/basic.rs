use sha2::{Digest as _, Sha256};
use wiresig::{Digest, KeyPair, PublicKey, Signature};

pub fn main() {
    // The signer generates a key pair and exports the raw public key for
    // the verifier (to bytes).
    let pair = KeyPair::generate().unwrap();
    let public_bytes = *pair.public_key().unwrap().as_bytes();

    // Hashing happens on the caller's side; sign and verify only ever see
    // the 32-byte digest.
    let digest = Digest(Sha256::digest(b"activate the relay").into());

    // Sign, then ship digest + signature + public key over the wire.
    let signature = pair.sign(&digest).unwrap();
    let signature_bytes = *signature.as_bytes();

    // The verifier rebuilds both values from raw bytes and checks them.
    let public = PublicKey::from_bytes(&public_bytes).unwrap();
    let signature = Signature::from_bytes(&signature_bytes).unwrap();

    signature
        .r()
        .iter()
        .for_each(|byte| print!("{byte:02x}"));
    println!(" <- R");

    public.verify(&digest, &signature).unwrap();
    println!("signature verified");
}
