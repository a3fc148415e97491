use sha3::{Digest as _, Sha3_256, Sha3_512};

/// Size in bytes of every digest produced by the consensus core.
pub const DIGEST_SIZE: usize = 32;

/// A SHA3-256 digest. Blocks, receipts and Merkle nodes are all keyed by
/// this type.
pub type Digest = [u8; DIGEST_SIZE];

/// SHA3-256 of an arbitrary byte string.
pub fn sha3_256(data: &[u8]) -> Digest {
    let mut hasher = Sha3_256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// SHA3-256 over the concatenation of two sibling digests.
///
/// Left/right order is significant: swapping siblings produces a different
/// parent, which is what makes Merkle inclusion proofs position-binding.
pub fn sha3_256_pair(left: &Digest, right: &Digest) -> Digest {
    let mut hasher = Sha3_256::new();
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// SHA3-512 of an arbitrary byte string. Used for blocksmith seed
/// derivation, where 64 bytes of output keep the leading-8-byte extraction
/// well clear of the digest tail.
pub fn sha3_512(data: &[u8]) -> [u8; 64] {
    let mut hasher = Sha3_512::new();
    hasher.update(data);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha3_256_deterministic() {
        assert_eq!(sha3_256(b"anvil"), sha3_256(b"anvil"));
        assert_ne!(sha3_256(b"anvil"), sha3_256(b"advil"));
    }

    #[test]
    fn test_pair_order_sensitive() {
        let a = sha3_256(b"a");
        let b = sha3_256(b"b");
        assert_ne!(sha3_256_pair(&a, &b), sha3_256_pair(&b, &a));
    }

    #[test]
    fn test_pair_matches_concatenation() {
        let a = sha3_256(b"a");
        let b = sha3_256(b"b");
        let mut buf = Vec::with_capacity(DIGEST_SIZE * 2);
        buf.extend_from_slice(&a);
        buf.extend_from_slice(&b);
        assert_eq!(sha3_256_pair(&a, &b), sha3_256(&buf));
    }

    #[test]
    fn test_sha3_512_width() {
        let d = sha3_512(b"seed material");
        assert_eq!(d.len(), 64);
    }
}
