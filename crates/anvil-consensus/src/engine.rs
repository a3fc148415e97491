use std::sync::Arc;

use anvil_core::{
    Block, BlockError, ChainParameters, ChainType, DatumType, HashTree, NodeRegistry,
    SignedReceipt,
};
use anvil_crypto::{Digest, PublicKey, Signer};
use num_bigint::BigUint;

use crate::difficulty::DifficultyAdjuster;
use crate::errors::ConsensusError;
use crate::receipt_issuer::ReceiptIssuer;
use crate::smith_order::{Candidate, CandidateSelector};
use crate::timing::SmithTimingValidator;

/// Everything consensus needs for one chain: selector, timing validator
/// and difficulty adjuster share the same parameter set.
struct ChainConsensus {
    selector: CandidateSelector,
    timing: SmithTimingValidator,
    difficulty: DifficultyAdjuster,
}

impl ChainConsensus {
    fn new(params: ChainParameters) -> Self {
        Self {
            selector: CandidateSelector::new(params),
            timing: SmithTimingValidator::new(params),
            difficulty: DifficultyAdjuster::new(params.base_period),
        }
    }
}

/// Facade over the consensus core, one instance per node.
///
/// Owns a [`ChainConsensus`] per chain type (main and spine) plus the
/// receipt issuer; collaborators are injected, never reached for through
/// globals. Both the local smithing loop and the remote block validator
/// call through here; the only shared mutable state underneath is the
/// selector's cache, which tolerates concurrent readers.
pub struct ConsensusEngine {
    registry: Arc<dyn NodeRegistry>,
    issuer: ReceiptIssuer,
    local_key: PublicKey,
    main: ChainConsensus,
    spine: ChainConsensus,
}

impl ConsensusEngine {
    pub fn new(
        registry: Arc<dyn NodeRegistry>,
        signer: Arc<dyn Signer>,
        main_params: ChainParameters,
        spine_params: ChainParameters,
    ) -> Self {
        let local_key = signer.public_key();
        Self {
            registry,
            issuer: ReceiptIssuer::new(signer),
            local_key,
            main: ChainConsensus::new(main_params),
            spine: ChainConsensus::new(spine_params),
        }
    }

    fn chain(&self, chain_type: ChainType) -> &ChainConsensus {
        match chain_type {
            ChainType::Main => &self.main,
            ChainType::Spine => &self.spine,
        }
    }

    /// Public key this node smiths and signs receipts under.
    pub fn local_public_key(&self) -> PublicKey {
        self.local_key
    }

    /// Deterministic candidate ranking for the block following `previous`.
    pub fn get_smith_order(
        &self,
        chain_type: ChainType,
        previous: &Block,
    ) -> Result<Vec<Candidate>, ConsensusError> {
        self.chain(chain_type)
            .selector
            .smith_order(previous, self.registry.as_ref())
    }

    /// Accept or reject an incoming block's claimed producer and timestamp.
    pub fn validate_block_timing(
        &self,
        chain_type: ChainType,
        previous: &Block,
        candidate_block: &Block,
    ) -> Result<(), ConsensusError> {
        let order = self.get_smith_order(chain_type, previous)?;
        self.chain(chain_type)
            .timing
            .is_valid_timestamp(&order, previous, candidate_block)
    }

    /// Whether this node may author a block right now; `Some(index)` while
    /// its own smith window is open.
    pub fn can_smith_now(
        &self,
        chain_type: ChainType,
        previous: &Block,
        local_timestamp: i64,
    ) -> Result<Option<usize>, ConsensusError> {
        let order = self.get_smith_order(chain_type, previous)?;
        Ok(self.chain(chain_type).timing.can_smith(
            &order,
            previous,
            &self.local_key,
            local_timestamp,
        ))
    }

    /// Smith scale and cumulative difficulty for a block following
    /// `previous`, smithed at `timestamp`.
    pub fn next_block_difficulty(
        &self,
        chain_type: ChainType,
        previous: &Block,
        timestamp: i64,
    ) -> Result<(i64, BigUint), BlockError> {
        self.chain(chain_type).difficulty.adjust(previous, timestamp)
    }

    /// Issue a signed receipt for data received from a peer.
    pub fn issue_receipt(
        &self,
        datum_hash: Digest,
        datum_type: DatumType,
        sender_public_key: PublicKey,
        reference_block_height: u32,
        reference_block_hash: Digest,
        last_merkle_root: Option<Digest>,
    ) -> SignedReceipt {
        self.issuer.issue(
            datum_hash,
            datum_type,
            sender_public_key,
            reference_block_height,
            reference_block_hash,
            last_merkle_root,
        )
    }

    /// Check a Merkle inclusion proof against a published root.
    pub fn verify_inclusion(
        leaf: &Digest,
        leaf_index: usize,
        proof: &[Digest],
        root: &Digest,
    ) -> bool {
        HashTree::verify(leaf, leaf_index, proof, root)
    }
}
