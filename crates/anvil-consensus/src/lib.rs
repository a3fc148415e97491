//! Consensus core for the Anvil proof-of-participation chain.
//!
//! Decides who may produce the next block, when, and how their reward
//! weight evolves: deterministic stake-weighted blocksmith selection
//! ([`smith_order`]), the smith-scale difficulty state machine
//! ([`difficulty`]), block-timing validation ([`timing`]), and the
//! receipt/participation-score feedback loop ([`receipt_issuer`],
//! [`scoring`]). [`engine`] ties one instance of each together per chain
//! type; [`smithing`] drives the local production loop.

pub mod difficulty;
pub mod engine;
pub mod errors;
pub mod receipt_issuer;
pub mod scoring;
pub mod smith_order;
pub mod smithing;
pub mod timing;

pub use difficulty::DifficultyAdjuster;
pub use engine::ConsensusEngine;
pub use errors::ConsensusError;
pub use receipt_issuer::ReceiptIssuer;
pub use scoring::score_receipts;
pub use smith_order::{Candidate, CandidateSelector};
pub use smithing::{SmithTurn, SmithingLoop};
pub use timing::{SmithSlot, SmithTimingValidator};
