use anvil_core::{Block, ChainParameters, NodeRegistry, NodeRegistryEntry};
use anvil_crypto::{sha3_512, PublicKey};
use log::debug;
use num_bigint::BigInt;
use parking_lot::RwLock;

use crate::errors::ConsensusError;

/// One eligible blocksmith for the next block height. Ephemeral: derived
/// from the previous block and a registry snapshot, recomputed per height,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub node_id: u64,
    pub public_key: PublicKey,
    /// First 8 bytes (big-endian) of SHA3-512(previous seed || public key),
    /// as a signed value. The ascending sort over this field is the smith
    /// order.
    pub block_seed: i64,
    /// Stake-weighted reward ordering: `score * |seed| + node_id`. Consulted
    /// for reward distribution only, never for leader selection.
    pub node_order: BigInt,
}

struct CachedOrder {
    previous_block_id: i64,
    order: Vec<Candidate>,
}

/// Deterministic blocksmith ranking for one chain type.
///
/// The sorted order is a pure function of (previous block id, registry
/// snapshot); the cache below is an optimization, never a correctness
/// dependency. Readers copy the order under a shared lock; a caller that
/// observes a stale block id recomputes under the write lock. Redundant
/// recomputation by racing callers is harmless because computation is
/// idempotent and side-effect-free.
pub struct CandidateSelector {
    params: ChainParameters,
    cache: RwLock<Option<CachedOrder>>,
}

impl CandidateSelector {
    pub fn new(params: ChainParameters) -> Self {
        Self {
            params,
            cache: RwLock::new(None),
        }
    }

    pub fn params(&self) -> &ChainParameters {
        &self.params
    }

    /// The smith order for the block following `previous`, computed from
    /// the registry snapshot as of `previous.height`.
    ///
    /// Index 0 is the first node eligible to produce the next block.
    pub fn smith_order(
        &self,
        previous: &Block,
        registry: &dyn NodeRegistry,
    ) -> Result<Vec<Candidate>, ConsensusError> {
        // Genesis reprocessing always invalidates: a fresh chain must not
        // inherit an order computed before a rollback.
        if previous.id != self.params.genesis_block_id {
            let cache = self.cache.read();
            if let Some(cached) = cache.as_ref() {
                if cached.previous_block_id == previous.id {
                    return Ok(cached.order.clone());
                }
            }
        }

        let snapshot = registry.active_nodes(previous.height);
        let order = Self::compute_order(previous, &snapshot);
        if order.is_empty() {
            return Err(ConsensusError::NoEligibleCandidates {
                chain_type: self.params.chain_type,
                height: previous.height,
            });
        }

        debug!(
            "recomputed {} smith order for block {}: {} candidates",
            self.params.chain_type.as_str(),
            previous.id,
            order.len()
        );
        *self.cache.write() = Some(CachedOrder {
            previous_block_id: previous.id,
            order: order.clone(),
        });
        Ok(order)
    }

    /// Pure ranking over a snapshot: seed each node from the previous
    /// block, drop non-positive scores, sort ascending by seed with node id
    /// as the tie-break. Insertion order of the snapshot never leaks into
    /// the result.
    fn compute_order(previous: &Block, snapshot: &[NodeRegistryEntry]) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> = snapshot
            .iter()
            .filter(|entry| entry.participation_score > 0)
            .map(|entry| {
                let block_seed = Self::derive_seed(&previous.block_seed, &entry.public_key);
                let node_order = BigInt::from(entry.participation_score)
                    * BigInt::from(block_seed.unsigned_abs())
                    + BigInt::from(entry.node_id);
                Candidate {
                    node_id: entry.node_id,
                    public_key: entry.public_key,
                    block_seed,
                    node_order,
                }
            })
            .collect();

        candidates.sort_by(|a, b| {
            a.block_seed
                .cmp(&b.block_seed)
                .then_with(|| a.node_id.cmp(&b.node_id))
        });
        candidates
    }

    /// Per-node seed: leading 8 bytes of SHA3-512 over the previous block
    /// seed concatenated with the node's public key, big-endian signed.
    fn derive_seed(previous_seed: &[u8], public_key: &PublicKey) -> i64 {
        let mut preimage = Vec::with_capacity(previous_seed.len() + public_key.len());
        preimage.extend_from_slice(previous_seed);
        preimage.extend_from_slice(public_key);
        let digest = sha3_512(&preimage);
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        i64::from_be_bytes(prefix)
    }
}
