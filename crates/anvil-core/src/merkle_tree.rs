use anvil_crypto::{sha3_256_pair, Digest, DIGEST_SIZE};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MerkleError {
    #[error("leaf count {0} is not a power of two >= 1")]
    InvalidLeafCount(usize),

    #[error("leaf index {index} out of range for {leaves} leaves")]
    LeafIndexOutOfRange { index: usize, leaves: usize },

    #[error("malformed tree bytes: {0}")]
    MalformedBytes(&'static str),
}

/// Binary Merkle tree over a batch of receipt digests.
///
/// Level 0 holds the leaves, each higher level the pairwise SHA3-256 of its
/// children, the last level the single root. The leaf count must be an
/// exact power of two; there is no padding, a short batch is the caller's
/// problem to fill before building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashTree {
    levels: Vec<Vec<Digest>>,
}

impl HashTree {
    /// Build the full tree bottom-up, retaining every intermediate level so
    /// inclusion proofs can be answered for the batch's lifetime.
    pub fn build(leaves: Vec<Digest>) -> Result<Self, MerkleError> {
        if leaves.is_empty() || !leaves.len().is_power_of_two() {
            return Err(MerkleError::InvalidLeafCount(leaves.len()));
        }

        let mut levels = vec![leaves];
        while levels[levels.len() - 1].len() > 1 {
            let parents: Vec<Digest> = levels[levels.len() - 1]
                .chunks_exact(2)
                .map(|pair| sha3_256_pair(&pair[0], &pair[1]))
                .collect();
            levels.push(parents);
        }
        Ok(HashTree { levels })
    }

    pub fn root(&self) -> Digest {
        self.levels[self.levels.len() - 1][0]
    }

    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    pub fn leaves(&self) -> &[Digest] {
        &self.levels[0]
    }

    /// Sibling path from a leaf up to (excluding) the root: at each level
    /// the neighbor completing the pair, index halving per step. O(log n).
    pub fn proof_for(&self, leaf_index: usize) -> Result<Vec<Digest>, MerkleError> {
        if leaf_index >= self.leaf_count() {
            return Err(MerkleError::LeafIndexOutOfRange {
                index: leaf_index,
                leaves: self.leaf_count(),
            });
        }

        let mut proof = Vec::with_capacity(self.levels.len() - 1);
        let mut index = leaf_index;
        for level in &self.levels[..self.levels.len() - 1] {
            proof.push(level[index ^ 1]);
            index /= 2;
        }
        Ok(proof)
    }

    /// Recompute the root from a leaf and its sibling path. The leaf index
    /// determines concatenation order at each level: an even index hashes
    /// as the left child, an odd one as the right.
    pub fn verify(leaf: &Digest, leaf_index: usize, proof: &[Digest], root: &Digest) -> bool {
        let mut current = *leaf;
        let mut index = leaf_index;
        for sibling in proof {
            current = if index % 2 == 0 {
                sha3_256_pair(&current, sibling)
            } else {
                sha3_256_pair(sibling, &current)
            };
            index /= 2;
        }
        current == *root
    }

    /// Serialize as root digest followed by every non-root node, level 0
    /// upward. Round-trips exactly through [`HashTree::from_bytes`].
    pub fn to_bytes(&self) -> Vec<u8> {
        let node_count: usize = self.levels.iter().map(Vec::len).sum();
        let mut buf = Vec::with_capacity(node_count * DIGEST_SIZE);
        buf.extend_from_slice(&self.root());
        for level in &self.levels[..self.levels.len() - 1] {
            for node in level {
                buf.extend_from_slice(node);
            }
        }
        buf
    }

    /// Reconstruct a tree from [`HashTree::to_bytes`] output. The leaf
    /// count is inferred from the non-root node count `k` as `(k + 2) / 2`;
    /// buffers whose length does not describe a complete power-of-two tree,
    /// or whose nodes do not hash up to the prefixed root, are rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MerkleError> {
        if bytes.len() < DIGEST_SIZE || bytes.len() % DIGEST_SIZE != 0 {
            return Err(MerkleError::MalformedBytes(
                "length is not a positive multiple of the digest size",
            ));
        }

        let mut digests = Vec::with_capacity(bytes.len() / DIGEST_SIZE);
        for chunk in bytes.chunks_exact(DIGEST_SIZE) {
            let mut digest = [0u8; DIGEST_SIZE];
            digest.copy_from_slice(chunk);
            digests.push(digest);
        }
        let root = digests[0];
        let nodes = &digests[1..];

        let leaf_count = (nodes.len() + 2) / 2;
        if !leaf_count.is_power_of_two() || nodes.len() + 2 != leaf_count * 2 {
            return Err(MerkleError::MalformedBytes(
                "node count does not describe a complete tree",
            ));
        }

        // Single-leaf tree: the root is the leaf, no interior nodes travel.
        if nodes.is_empty() {
            return Ok(HashTree {
                levels: vec![vec![root]],
            });
        }

        let mut levels = Vec::new();
        let mut offset = 0usize;
        let mut width = leaf_count;
        while width >= 2 {
            levels.push(nodes[offset..offset + width].to_vec());
            offset += width;
            width /= 2;
        }
        levels.push(vec![root]);

        let tree = HashTree { levels };
        let rebuilt = HashTree::build(tree.levels[0].clone())?;
        if rebuilt != tree {
            return Err(MerkleError::MalformedBytes(
                "interior nodes do not hash up to the stated root",
            ));
        }
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anvil_crypto::sha3_256;

    fn leaves(n: usize) -> Vec<Digest> {
        (0..n).map(|i| sha3_256(&(i as u64).to_le_bytes())).collect()
    }

    #[test]
    fn test_build_rejects_bad_leaf_counts() {
        for n in [0usize, 3, 5, 6, 7] {
            assert_eq!(
                HashTree::build(leaves(n)).unwrap_err(),
                MerkleError::InvalidLeafCount(n)
            );
        }
    }

    #[test]
    fn test_every_leaf_proves_inclusion() {
        for n in [1usize, 2, 4, 8, 32] {
            let tree = HashTree::build(leaves(n)).unwrap();
            let root = tree.root();
            for i in 0..n {
                let leaf = tree.leaves()[i];
                let proof = tree.proof_for(i).unwrap();
                assert_eq!(proof.len(), n.trailing_zeros() as usize);
                assert!(HashTree::verify(&leaf, i, &proof, &root), "leaf {i} of {n}");
            }
        }
    }

    #[test]
    fn test_tampered_leaf_fails_verification() {
        let tree = HashTree::build(leaves(8)).unwrap();
        let proof = tree.proof_for(3).unwrap();
        let bogus = sha3_256(b"not in the tree");
        assert!(!HashTree::verify(&bogus, 3, &proof, &tree.root()));
    }

    #[test]
    fn test_proof_index_out_of_range() {
        let tree = HashTree::build(leaves(4)).unwrap();
        assert_eq!(
            tree.proof_for(4).unwrap_err(),
            MerkleError::LeafIndexOutOfRange { index: 4, leaves: 4 }
        );
    }

    #[test]
    fn test_bytes_round_trip() {
        for n in [1usize, 2, 4, 8, 32] {
            let tree = HashTree::build(leaves(n)).unwrap();
            let bytes = tree.to_bytes();
            assert_eq!(bytes.len(), (2 * n - 1) * DIGEST_SIZE);
            assert_eq!(HashTree::from_bytes(&bytes).unwrap(), tree);
        }
    }

    #[test]
    fn test_from_bytes_rejects_bad_lengths() {
        let tree = HashTree::build(leaves(4)).unwrap();
        let bytes = tree.to_bytes();
        assert!(HashTree::from_bytes(&bytes[..bytes.len() - 1]).is_err());
        assert!(HashTree::from_bytes(&[]).is_err());
        // 4 digests = root + 3 nodes, implying (3 + 2) / 2 = 2 leaves but
        // 3 != 2 * 2 - 2, so the node count is inconsistent.
        assert!(HashTree::from_bytes(&vec![0u8; 4 * DIGEST_SIZE]).is_err());
    }

    #[test]
    fn test_from_bytes_rejects_tampered_interior() {
        let tree = HashTree::build(leaves(4)).unwrap();
        let mut bytes = tree.to_bytes();
        bytes[DIGEST_SIZE] ^= 0xff; // first leaf
        assert!(matches!(
            HashTree::from_bytes(&bytes),
            Err(MerkleError::MalformedBytes(_))
        ));
    }
}
