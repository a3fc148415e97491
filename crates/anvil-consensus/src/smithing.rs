use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use anvil_core::{Block, BlockStore, ChainType};
use chrono::Utc;
use log::{info, warn};
use tokio::time::MissedTickBehavior;

use crate::engine::ConsensusEngine;
use crate::errors::ConsensusError;

/// Handed to the production callback when the local node's smith window is
/// open at the current tick.
#[derive(Debug, Clone)]
pub struct SmithTurn {
    pub chain_type: ChainType,
    /// The local node's index in the current smith order.
    pub index: usize,
    /// Chain tip the new block must extend.
    pub previous: Block,
}

/// Periodic driver of local block production for one chain.
///
/// A plain timer task invoking a fixed callback; scheduling carries no
/// dynamic dispatch beyond the injected collaborators. Each tick asks the
/// engine whether the local window is open and otherwise does nothing, so
/// a missed tick costs at most one poll interval of latency.
pub struct SmithingLoop {
    engine: Arc<ConsensusEngine>,
    block_store: Arc<dyn BlockStore>,
    chain_type: ChainType,
    tick: Duration,
}

impl SmithingLoop {
    pub fn new(
        engine: Arc<ConsensusEngine>,
        block_store: Arc<dyn BlockStore>,
        chain_type: ChainType,
        tick: Duration,
    ) -> Self {
        Self {
            engine,
            block_store,
            chain_type,
            tick,
        }
    }

    /// Run until the callback breaks. The callback decides what producing
    /// a block actually means; this loop only decides *when* it is legal.
    ///
    /// `NoEligibleCandidates` stops production but not the loop: the
    /// registry may recover, and skipping a height silently is exactly
    /// what must never happen, so every halted tick is logged.
    pub async fn run<F>(&self, mut on_turn: F)
    where
        F: FnMut(SmithTurn) -> ControlFlow<()>,
    {
        let mut interval = tokio::time::interval(self.tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;

            let Some(previous) = self.block_store.previous_block(self.chain_type) else {
                warn!(
                    "{} smithing: no chain tip available, waiting",
                    self.chain_type.as_str()
                );
                continue;
            };

            let now = Utc::now().timestamp();
            match self.engine.can_smith_now(self.chain_type, &previous, now) {
                Ok(Some(index)) => {
                    info!(
                        "{} smithing: window open at index {} on top of block {}",
                        self.chain_type.as_str(),
                        index,
                        previous.id
                    );
                    let turn = SmithTurn {
                        chain_type: self.chain_type,
                        index,
                        previous,
                    };
                    if on_turn(turn).is_break() {
                        return;
                    }
                }
                Ok(None) => {}
                Err(err @ ConsensusError::NoEligibleCandidates { .. }) => {
                    warn!(
                        "{} smithing halted until registry recovers: {err}",
                        self.chain_type.as_str()
                    );
                }
                Err(err) => {
                    warn!("{} smithing tick failed: {err}", self.chain_type.as_str());
                }
            }
        }
    }
}
