use anvil_core::constants::MAX_SMITH_SCALE;
use anvil_core::{Block, BlockError};
use num_bigint::{BigInt, BigUint};
use num_traits::{One, ToPrimitive, Zero};

/// Smith-scale difficulty adjustment for one chain.
///
/// The smith scale is the difficulty target: lower values make block
/// production easier. All intermediate arithmetic runs on arbitrary
/// precision integers so no clamp can be bypassed by fixed-width overflow.
pub struct DifficultyAdjuster {
    /// Target seconds between blocks on this chain.
    target_delay: i64,
}

impl DifficultyAdjuster {
    pub fn new(target_delay: i64) -> Self {
        debug_assert!(target_delay > 0);
        Self { target_delay }
    }

    /// Next difficulty target given the previous block's scale and the
    /// actual seconds elapsed producing it.
    ///
    /// `prev_scale * delta / target` (truncating), then clamped in order:
    /// out-of-range values snap to `MAX_SMITH_SCALE`, the result never
    /// falls below `prev / 2`, never reads zero, and never exceeds
    /// `prev * 2` (or the global cap when doubling would pass it).
    pub fn next_smith_scale(&self, prev_scale: i64, timestamp_delta: i64) -> i64 {
        let prev = BigInt::from(prev_scale);
        let max = BigInt::from(MAX_SMITH_SCALE);

        let mut scale =
            &prev * BigInt::from(timestamp_delta) / BigInt::from(self.target_delay);

        if scale < BigInt::zero() || scale > max {
            scale = max.clone();
        }
        let floor = &prev / 2;
        if scale < floor {
            scale = floor;
        }
        if scale.is_zero() {
            scale = BigInt::one();
        }
        let ceiling = {
            let doubled = &prev * 2;
            if doubled > max {
                max
            } else {
                doubled
            }
        };
        if scale > ceiling {
            scale = ceiling;
        }

        scale.to_i64().unwrap_or(MAX_SMITH_SCALE)
    }

    /// Fork-choice weight for a block produced at `new_scale`:
    /// `prev_cumulative + 2^64 / new_scale`.
    pub fn cumulative_difficulty(&self, prev_cumulative: &BigUint, new_scale: i64) -> BigUint {
        let scale = new_scale.max(1) as u64;
        prev_cumulative + (BigUint::one() << 64u32) / BigUint::from(scale)
    }

    /// Scale and weight for the block following `previous`, smithed at
    /// `timestamp`. Fails only if the previous block carries a malformed
    /// cumulative-difficulty string.
    pub fn adjust(&self, previous: &Block, timestamp: i64) -> Result<(i64, BigUint), BlockError> {
        let delta = timestamp - previous.timestamp;
        let scale = self.next_smith_scale(previous.smith_scale, delta);
        let cumulative = self.cumulative_difficulty(&previous.cumulative_difficulty()?, scale);
        Ok((scale, cumulative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn adjuster() -> DifficultyAdjuster {
        DifficultyAdjuster::new(15)
    }

    #[test]
    fn test_on_target_delay_keeps_scale() {
        assert_eq!(adjuster().next_smith_scale(156_000, 15), 156_000);
    }

    #[test]
    fn test_fast_block_halves_at_most() {
        // delta 0 would drive the scale to zero; the floor catches it.
        assert_eq!(adjuster().next_smith_scale(156_000, 0), 78_000);
        assert_eq!(adjuster().next_smith_scale(156_000, 1), 78_000);
    }

    #[test]
    fn test_slow_block_doubles_at_most() {
        assert_eq!(adjuster().next_smith_scale(156_000, 3_600), 312_000);
    }

    #[test]
    fn test_scale_one_floor_when_prev_is_one() {
        // prev / 2 == 0, raw scale 0: the zero clamp yields 1.
        assert_eq!(adjuster().next_smith_scale(1, 0), 1);
    }

    #[test]
    fn test_negative_delta_snaps_to_max_then_ceiling() {
        // A negative product trips the MAX clamp, then the prev * 2 ceiling.
        assert_eq!(adjuster().next_smith_scale(156_000, -30), 312_000);
    }

    #[test]
    fn test_huge_prev_caps_at_global_max() {
        let scale = adjuster().next_smith_scale(MAX_SMITH_SCALE, 3_600);
        assert_eq!(scale, MAX_SMITH_SCALE);
    }

    #[test]
    fn test_cumulative_difficulty_accumulates() {
        let adjuster = adjuster();
        let base = BigUint::from(1000u32);
        let next = adjuster.cumulative_difficulty(&base, 156_000);
        let expected = &base + (BigUint::one() << 64u32) / BigUint::from(156_000u32);
        assert_eq!(next, expected);
        assert!(next > base);
    }

    #[test]
    fn test_adjust_reads_previous_block() {
        let previous = Block {
            id: 1,
            height: 5,
            timestamp: 1_000,
            block_seed: vec![1],
            previous_block_hash: vec![0; 32],
            cumulative_difficulty: "5000".to_string(),
            smith_scale: 156_000,
            blocksmith_public_key: [0u8; 32],
        };
        let (scale, cumulative) = adjuster().adjust(&previous, 1_015).unwrap();
        assert_eq!(scale, 156_000);
        assert!(cumulative > BigUint::from(5000u32));
    }

    #[test]
    fn test_adjust_propagates_malformed_difficulty() {
        let previous = Block {
            id: 1,
            height: 5,
            timestamp: 1_000,
            block_seed: vec![1],
            previous_block_hash: vec![0; 32],
            cumulative_difficulty: "not a number".to_string(),
            smith_scale: 156_000,
            blocksmith_public_key: [0u8; 32],
        };
        assert!(adjuster().adjust(&previous, 1_015).is_err());
    }

    proptest! {
        #[test]
        fn prop_scale_stays_within_clamp_bounds(
            prev in 1i64..=MAX_SMITH_SCALE,
            delta in 0i64..=1_000_000,
        ) {
            let scale = adjuster().next_smith_scale(prev, delta);
            prop_assert!(scale >= (prev / 2).max(1));
            prop_assert!(scale <= prev.saturating_mul(2).min(MAX_SMITH_SCALE));
        }

        #[test]
        fn prop_cumulative_difficulty_monotone(
            base in 0u64..u64::MAX,
            scale in 1i64..=MAX_SMITH_SCALE,
        ) {
            let adjuster = adjuster();
            let prev = BigUint::from(base);
            let next = adjuster.cumulative_difficulty(&prev, scale);
            prop_assert!(next > prev);
        }
    }
}
