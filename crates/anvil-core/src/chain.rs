use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The two block chains an Anvil node maintains. The spine chain runs on a
/// shorter period and anchors the main chain; both use the same consensus
/// machinery with different [`ChainParameters`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChainType {
    Main,
    Spine,
}

impl ChainType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChainType::Main => "MAIN",
            ChainType::Spine => "SPINE",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChainConfigError {
    #[error("base_period must be > 0, got {0}")]
    NonPositiveBasePeriod(i64),

    #[error("negative timing parameter: {0}")]
    NegativeParameter(&'static str),

    #[error(
        "block_creation_time + network_tolerance ({got}) exceeds base_period ({base_period}); \
         smith windows would overlap"
    )]
    OverlappingWindows { got: i64, base_period: i64 },
}

/// Per-chain timing constants, immutable after construction.
///
/// Invariant: `block_creation_time + network_tolerance <= base_period`.
/// This is what guarantees that at any instant at most one smith-order index
/// holds an open production window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainParameters {
    /// Chain this parameter set belongs to.
    pub chain_type: ChainType,

    /// Seconds between consecutive smith-order turns.
    pub base_period: i64,

    /// Seconds a blocksmith is granted to assemble and sign a block.
    pub block_creation_time: i64,

    /// Extra seconds tolerated for propagation before a window closes.
    pub network_tolerance: i64,

    /// Identifier of the chain's genesis block; a selector cache observing
    /// this id must always recompute.
    pub genesis_block_id: i64,
}

impl ChainParameters {
    pub fn new(
        chain_type: ChainType,
        base_period: i64,
        block_creation_time: i64,
        network_tolerance: i64,
        genesis_block_id: i64,
    ) -> Result<Self, ChainConfigError> {
        if base_period <= 0 {
            return Err(ChainConfigError::NonPositiveBasePeriod(base_period));
        }
        if block_creation_time < 0 {
            return Err(ChainConfigError::NegativeParameter("block_creation_time"));
        }
        if network_tolerance < 0 {
            return Err(ChainConfigError::NegativeParameter("network_tolerance"));
        }
        let window = block_creation_time + network_tolerance;
        if window > base_period {
            return Err(ChainConfigError::OverlappingWindows {
                got: window,
                base_period,
            });
        }
        Ok(ChainParameters {
            chain_type,
            base_period,
            block_creation_time,
            network_tolerance,
            genesis_block_id,
        })
    }

    /// Mainnet main-chain timing: one turn per 15 seconds.
    pub fn main(genesis_block_id: i64) -> Self {
        ChainParameters {
            chain_type: ChainType::Main,
            base_period: 15,
            block_creation_time: 10,
            network_tolerance: 5,
            genesis_block_id,
        }
    }

    /// Mainnet spine-chain timing: one turn per 5 seconds.
    pub fn spine(genesis_block_id: i64) -> Self {
        ChainParameters {
            chain_type: ChainType::Spine,
            base_period: 5,
            block_creation_time: 3,
            network_tolerance: 2,
            genesis_block_id,
        }
    }

    /// Seconds a single smith window stays open once it starts.
    pub fn window_length(&self) -> i64 {
        self.block_creation_time + self.network_tolerance
    }
}
