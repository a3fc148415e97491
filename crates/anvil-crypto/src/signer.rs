use ed25519_dalek::{Signature, Signer as _, SigningKey, Verifier, VerifyingKey};
use rand::RngCore;

/// Raw ed25519 public key bytes. Node identity throughout the consensus
/// core is this value, not a derived address.
pub type PublicKey = [u8; 32];

/// Signing capability consumed by the receipt issuer.
///
/// The consensus core never touches key material directly; callers inject an
/// implementation and the core only sees `sign` plus the public identity.
pub trait Signer: Send + Sync {
    /// The public key all signatures from this signer verify against.
    fn public_key(&self) -> PublicKey;

    /// Sign an arbitrary message, returning the detached signature bytes.
    fn sign(&self, message: &[u8]) -> Vec<u8>;
}

/// Ed25519 implementation of [`Signer`].
pub struct Ed25519Signer {
    signing_key: SigningKey,
}

impl Ed25519Signer {
    /// Build a signer from 32 bytes of secret key material.
    pub fn from_secret_bytes(secret: [u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&secret),
        }
    }

    /// Generate a signer from OS randomness. Intended for tests and tooling;
    /// production nodes load their key from the wallet layer.
    pub fn generate() -> Self {
        let mut secret = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut secret);
        Self::from_secret_bytes(secret)
    }

    /// Hex rendering of the public key, for logs.
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key())
    }
}

impl Signer for Ed25519Signer {
    fn public_key(&self) -> PublicKey {
        self.signing_key.verifying_key().to_bytes()
    }

    fn sign(&self, message: &[u8]) -> Vec<u8> {
        self.signing_key.sign(message).to_vec()
    }
}

/// Verify a detached signature against a message and public key.
///
/// Malformed keys or signatures verify as false rather than erroring; a
/// peer that sends garbage bytes gets a plain rejection.
pub fn verify_signature(message: &[u8], signature: &[u8], public_key: &PublicKey) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(public_key) else {
        return false;
    };
    let Ok(signature) = Signature::from_slice(signature) else {
        return false;
    };
    verifying_key.verify(message, &signature).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_verify_round_trip() {
        let signer = Ed25519Signer::generate();
        let sig = signer.sign(b"receipt bytes");
        assert!(verify_signature(b"receipt bytes", &sig, &signer.public_key()));
    }

    #[test]
    fn test_verify_rejects_wrong_message() {
        let signer = Ed25519Signer::generate();
        let sig = signer.sign(b"receipt bytes");
        assert!(!verify_signature(b"other bytes", &sig, &signer.public_key()));
    }

    #[test]
    fn test_verify_rejects_wrong_key() {
        let signer = Ed25519Signer::generate();
        let other = Ed25519Signer::generate();
        let sig = signer.sign(b"receipt bytes");
        assert!(!verify_signature(b"receipt bytes", &sig, &other.public_key()));
    }

    #[test]
    fn test_verify_rejects_garbage_signature() {
        let signer = Ed25519Signer::generate();
        assert!(!verify_signature(b"msg", &[0u8; 10], &signer.public_key()));
    }

    #[test]
    fn test_deterministic_from_secret() {
        let a = Ed25519Signer::from_secret_bytes([7u8; 32]);
        let b = Ed25519Signer::from_secret_bytes([7u8; 32]);
        assert_eq!(a.public_key(), b.public_key());
    }
}
