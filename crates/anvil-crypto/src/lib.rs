pub mod hashing;
pub mod signer;

pub use hashing::{sha3_256, sha3_256_pair, sha3_512, Digest, DIGEST_SIZE};
pub use signer::{verify_signature, Ed25519Signer, PublicKey, Signer};
