use anvil_core::{Block, ChainParameters};
use anvil_crypto::PublicKey;

use crate::errors::ConsensusError;
use crate::smith_order::Candidate;

/// Where a candidate stands relative to its production window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmithSlot {
    /// The candidate's window has not opened yet.
    WaitingForTurn,
    /// The window is open; the candidate is the sole legitimate producer.
    Eligible,
    /// The window elapsed unused. The round is forfeited; production
    /// rights do not return to this index at this height.
    Expired,
}

/// Block-timing state machine for one chain.
///
/// Smith-order index `i` owns the window opening at
/// `previous.timestamp + (i + 1) * base_period` and closing
/// `block_creation_time + network_tolerance` seconds later.
/// `ChainParameters` guarantees windows never overlap, so this is a
/// sequential round-robin with expiry, not a race.
pub struct SmithTimingValidator {
    params: ChainParameters,
}

impl SmithTimingValidator {
    pub fn new(params: ChainParameters) -> Self {
        Self { params }
    }

    /// Half-open window `[open, close)` owned by smith-order index `index`.
    pub fn window(&self, previous_timestamp: i64, index: usize) -> (i64, i64) {
        let open = previous_timestamp + (index as i64 + 1) * self.params.base_period;
        (open, open + self.params.window_length())
    }

    /// Slot state of `index` at instant `at`.
    pub fn slot_state(&self, previous_timestamp: i64, index: usize, at: i64) -> SmithSlot {
        let (open, close) = self.window(previous_timestamp, index);
        if at < open {
            SmithSlot::WaitingForTurn
        } else if at < close {
            SmithSlot::Eligible
        } else {
            SmithSlot::Expired
        }
    }

    /// Validate an incoming block's claimed producer and timestamp against
    /// the smith order computed for `previous`.
    ///
    /// The order passed in must come from the registry snapshot as of the
    /// previous block's height; evaluating against a newer snapshot is a
    /// protocol violation, not a performance bug.
    pub fn is_valid_timestamp(
        &self,
        order: &[Candidate],
        previous: &Block,
        candidate_block: &Block,
    ) -> Result<(), ConsensusError> {
        let index = Self::index_of(order, &candidate_block.blocksmith_public_key)?;
        let (open, close) = self.window(previous.timestamp, index);
        if candidate_block.timestamp < open || candidate_block.timestamp >= close {
            return Err(ConsensusError::PrematureOrExpiredTimestamp {
                index,
                timestamp: candidate_block.timestamp,
                window_open: open,
                window_close: close,
            });
        }
        Ok(())
    }

    /// Whether the local node may author a block right now: its smith-order
    /// index, only while its own window is open.
    pub fn can_smith(
        &self,
        order: &[Candidate],
        previous: &Block,
        local_key: &PublicKey,
        now: i64,
    ) -> Option<usize> {
        let index = Self::index_of(order, local_key).ok()?;
        match self.slot_state(previous.timestamp, index, now) {
            SmithSlot::Eligible => Some(index),
            SmithSlot::WaitingForTurn | SmithSlot::Expired => None,
        }
    }

    fn index_of(order: &[Candidate], key: &PublicKey) -> Result<usize, ConsensusError> {
        order
            .iter()
            .position(|candidate| &candidate.public_key == key)
            .ok_or_else(|| ConsensusError::BlocksmithNotInCandidateList {
                public_key_hex: hex::encode(key),
            })
    }
}
