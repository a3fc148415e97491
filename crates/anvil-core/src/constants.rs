//! Protocol constants shared by the consensus core.
//!
//! These values are consensus-critical: every node must agree on them or
//! honest nodes will compute divergent smith orders and score deltas.

/// Upper bound on the smith scale (difficulty target). Half of `i64::MAX`
/// so that doubling the previous scale can never wrap when expressed as a
/// fixed-width value on a block.
pub const MAX_SMITH_SCALE: i64 = i64::MAX / 2;

/// Smith scale assigned to the genesis block of each chain.
pub const GENESIS_SMITH_SCALE: i64 = 156_000;

/// Hard cap on the number of receipts a node may submit for scoring in one
/// window. Exceeding it is an error, never a silent saturation.
pub const MAX_RECEIPT: u32 = 20;

/// Fixed-point scale applied to all receipt score arithmetic. Scores are
/// plain `i64`s carrying six implied decimal places.
pub const SCALAR_RECEIPT_SCORE: i64 = 1_000_000;

/// Credit for a receipt that references a published Merkle root.
pub const LINKED_RECEIPT_SCORE: i64 = SCALAR_RECEIPT_SCORE;

/// Credit for a receipt with no Merkle root reference. Worth strictly less
/// than half a linked receipt, so an all-unlinked batch scores negative.
pub const UNLINKED_RECEIPT_SCORE: i64 = SCALAR_RECEIPT_SCORE / 4;

/// Largest participation-score delta a single scoring window may apply,
/// in either direction.
pub const MAX_SCORE_CHANGE: i64 = 10_000_000;
