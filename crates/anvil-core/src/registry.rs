use anvil_crypto::PublicKey;
use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::chain::ChainType;

/// One row of the node registry as of a given block height.
///
/// Owned by the external registry collaborator; the consensus core only ever
/// reads snapshots of these and proposes score deltas, it never mutates a
/// row in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRegistryEntry {
    pub node_id: u64,
    pub public_key: PublicKey,
    pub participation_score: i64,
    pub locked_balance: i64,
}

/// Snapshot supplier for the node registry.
///
/// The returned list carries no ordering guarantee; deterministic ordering
/// is the candidate selector's job. Implementations must answer for the
/// height requested, not the latest height they know about: timing
/// validation against a newer snapshot than the previous block's height is
/// a protocol violation.
pub trait NodeRegistry: Send + Sync {
    fn active_nodes(&self, height: u32) -> Vec<NodeRegistryEntry>;
}

/// Read access to the chain tip, supplied by the external block store.
pub trait BlockStore: Send + Sync {
    fn previous_block(&self, chain_type: ChainType) -> Option<Block>;
}
