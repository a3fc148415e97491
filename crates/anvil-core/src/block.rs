use std::cmp::Ordering;

use anvil_crypto::{sha3_256, Digest, PublicKey};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BlockError {
    #[error("cumulative difficulty is not a decimal integer: {0:?}")]
    InvalidCumulativeDifficulty(String),
}

/// Reference fields of a block as seen by the consensus core.
///
/// Invariants along any valid chain: `height` increases by exactly 1 per
/// block, `cumulative_difficulty` never decreases, and `smith_scale` stays
/// positive and within `[prev / 2, prev * 2]` (capped globally).
///
/// Transaction payloads, signatures beyond the blocksmith key, and storage
/// concerns live with external collaborators; this type is what candidate
/// selection, difficulty adjustment and timing validation read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Chain-unique identifier, the first 8 bytes of the block hash.
    pub id: i64,

    /// Height in the chain, genesis = 0.
    pub height: u32,

    /// Unix seconds at which the block was smithed.
    pub timestamp: i64,

    /// Seed material mixed into the next height's blocksmith seeds.
    pub block_seed: Vec<u8>,

    /// Hash of the previous block.
    pub previous_block_hash: Vec<u8>,

    /// Fork-choice weight, decimal-string encoded arbitrary-precision
    /// integer. The heaviest chain wins, not the longest.
    pub cumulative_difficulty: String,

    /// Difficulty target for this block. Always > 0.
    pub smith_scale: i64,

    /// Public key of the node that produced this block.
    pub blocksmith_public_key: PublicKey,
}

impl Block {
    /// Decode the fork-choice weight. Blocks arriving from peers may carry
    /// arbitrary strings here, so this is a fallible parse, not a panic.
    pub fn cumulative_difficulty(&self) -> Result<BigUint, BlockError> {
        self.cumulative_difficulty
            .parse::<BigUint>()
            .map_err(|_| BlockError::InvalidCumulativeDifficulty(self.cumulative_difficulty.clone()))
    }

    /// Fork choice between two blocks claiming the same ancestor height:
    /// greater cumulative difficulty wins.
    pub fn fork_choice(&self, other: &Block) -> Result<Ordering, BlockError> {
        Ok(self
            .cumulative_difficulty()?
            .cmp(&other.cumulative_difficulty()?))
    }

    /// Derive a block id from a block hash: the hash's first 8 bytes,
    /// big-endian, reinterpreted as a signed 64-bit value.
    pub fn id_from_hash(hash: &Digest) -> i64 {
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&hash[..8]);
        i64::from_be_bytes(prefix)
    }

    /// Convenience for tests and genesis tooling: id straight from the raw
    /// preimage bytes.
    pub fn id_from_bytes(bytes: &[u8]) -> i64 {
        Self::id_from_hash(&sha3_256(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_with_difficulty(cd: &str) -> Block {
        Block {
            id: 1,
            height: 1,
            timestamp: 0,
            block_seed: vec![1, 2, 3],
            previous_block_hash: vec![0; 32],
            cumulative_difficulty: cd.to_string(),
            smith_scale: 156_000,
            blocksmith_public_key: [0u8; 32],
        }
    }

    #[test]
    fn test_cumulative_difficulty_parses_decimal() {
        let block = block_with_difficulty("123456789012345678901234567890");
        assert_eq!(
            block.cumulative_difficulty().unwrap(),
            "123456789012345678901234567890".parse::<BigUint>().unwrap()
        );
    }

    #[test]
    fn test_cumulative_difficulty_rejects_garbage() {
        let block = block_with_difficulty("0x1234");
        assert!(matches!(
            block.cumulative_difficulty(),
            Err(BlockError::InvalidCumulativeDifficulty(_))
        ));
    }

    #[test]
    fn test_fork_choice_prefers_heavier() {
        let light = block_with_difficulty("100");
        let heavy = block_with_difficulty("101");
        assert_eq!(heavy.fork_choice(&light).unwrap(), Ordering::Greater);
        assert_eq!(light.fork_choice(&heavy).unwrap(), Ordering::Less);
    }

    #[test]
    fn test_id_from_hash_uses_leading_bytes() {
        let mut hash = [0u8; 32];
        hash[..8].copy_from_slice(&[0x7f, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(Block::id_from_hash(&hash), 0x7f00_0000_0000_0001);
    }
}
