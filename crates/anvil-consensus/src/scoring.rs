use anvil_core::constants::{
    LINKED_RECEIPT_SCORE, MAX_RECEIPT, MAX_SCORE_CHANGE, UNLINKED_RECEIPT_SCORE,
};

use crate::errors::ConsensusError;

/// Participation-score delta for one scoring window.
///
/// Fixed-point i64 arithmetic throughout (see `SCALAR_RECEIPT_SCORE`); the
/// historical f32 path was a cross-platform determinism hazard for an
/// on-chain value and is not reproduced.
///
/// The delta is centered on half credit: a window holding `MAX_RECEIPT`
/// linked receipts earns `+MAX_SCORE_CHANGE`, half that many linked
/// receipts and nothing else earns zero, and an empty or all-unlinked
/// window goes negative. Output is always within
/// `[-MAX_SCORE_CHANGE, +MAX_SCORE_CHANGE]`.
pub fn score_receipts(linked_count: u32, unlinked_count: u32) -> Result<i64, ConsensusError> {
    let total = linked_count.checked_add(unlinked_count);
    if total.map_or(true, |total| total > MAX_RECEIPT) {
        return Err(ConsensusError::ReceiptCountExceeded {
            linked: linked_count,
            unlinked: unlinked_count,
            max: MAX_RECEIPT,
        });
    }

    let max_score = MAX_RECEIPT as i64 * LINKED_RECEIPT_SCORE;
    let half = max_score / 2;
    let block_score = linked_count as i64 * LINKED_RECEIPT_SCORE
        + unlinked_count as i64 * UNLINKED_RECEIPT_SCORE;

    Ok((block_score - half) * MAX_SCORE_CHANGE / half)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_all_linked_earns_max_change() {
        assert_eq!(score_receipts(MAX_RECEIPT, 0).unwrap(), MAX_SCORE_CHANGE);
    }

    #[test]
    fn test_half_linked_is_neutral() {
        assert_eq!(score_receipts(MAX_RECEIPT / 2, 0).unwrap(), 0);
    }

    #[test]
    fn test_no_receipts_earns_min_change() {
        assert_eq!(score_receipts(0, 0).unwrap(), -MAX_SCORE_CHANGE);
    }

    #[test]
    fn test_all_unlinked_is_negative() {
        let delta = score_receipts(0, MAX_RECEIPT).unwrap();
        assert!(delta < 0);
        assert!(delta > -MAX_SCORE_CHANGE);
    }

    #[test]
    fn test_unlinked_worth_less_than_linked() {
        let linked = score_receipts(10, 0).unwrap();
        let unlinked = score_receipts(0, 10).unwrap();
        assert!(linked > unlinked);
    }

    #[test]
    fn test_over_cap_fails_rather_than_saturating() {
        let err = score_receipts(15, 6).unwrap_err();
        assert_eq!(
            err,
            ConsensusError::ReceiptCountExceeded {
                linked: 15,
                unlinked: 6,
                max: MAX_RECEIPT
            }
        );
    }

    proptest! {
        #[test]
        fn prop_delta_always_bounded(
            linked in 0u32..=MAX_RECEIPT,
            unlinked in 0u32..=MAX_RECEIPT,
        ) {
            prop_assume!(linked + unlinked <= MAX_RECEIPT);
            let delta = score_receipts(linked, unlinked).unwrap();
            prop_assert!((-MAX_SCORE_CHANGE..=MAX_SCORE_CHANGE).contains(&delta));
        }

        #[test]
        fn prop_more_linked_never_scores_less(
            linked in 0u32..MAX_RECEIPT,
            unlinked in 0u32..MAX_RECEIPT,
        ) {
            prop_assume!(linked + 1 + unlinked <= MAX_RECEIPT);
            let lower = score_receipts(linked, unlinked).unwrap();
            let higher = score_receipts(linked + 1, unlinked).unwrap();
            prop_assert!(higher > lower);
        }
    }
}
