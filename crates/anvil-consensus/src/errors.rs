use anvil_core::ChainType;
use thiserror::Error;

/// Errors surfaced by the consensus core.
///
/// `NoEligibleCandidates` is fatal for block production on its chain until
/// the registry recovers; the validation variants reject a single candidate
/// block or computation and leave local chain state untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConsensusError {
    #[error("no eligible blocksmith candidates on {chain_type:?} at height {height}")]
    NoEligibleCandidates { chain_type: ChainType, height: u32 },

    #[error("claimed blocksmith {public_key_hex} is not in the candidate list")]
    BlocksmithNotInCandidateList { public_key_hex: String },

    #[error(
        "block timestamp {timestamp} outside window [{window_open}, {window_close}) \
         for smith-order index {index}"
    )]
    PrematureOrExpiredTimestamp {
        index: usize,
        timestamp: i64,
        window_open: i64,
        window_close: i64,
    },

    #[error("receipt count {linked} linked + {unlinked} unlinked exceeds maximum {max}")]
    ReceiptCountExceeded { linked: u32, unlinked: u32, max: u32 },
}
