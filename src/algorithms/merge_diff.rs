//! Merge-diff counter and tail absorption.
//!
//! The counter is the classic two-pointer walk over two sorted sequences.
//! An element that is strictly smaller than the one it faces cannot appear
//! later in the other sequence, so it is a difference. Once either side is
//! exhausted, everything left on the other side is a difference too, and
//! [`absorb_tails`] adds it in one step.

use core::cmp::Ordering;

use crate::types::DiffElement;

/// Where the merge loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MergeState {
    /// Next unvisited index in the first sequence.
    pub ii: usize,
    /// Next unvisited index in the second sequence.
    pub ji: usize,
    /// Differences counted so far.
    pub diffs: usize,
}

/// Runs the two-pointer merge from `start` in both sequences until `limit`
/// differences are counted or either sequence is exhausted.
///
/// Only the common length of `a` and `b` is visited.
#[inline]
pub fn merge_count<T: DiffElement>(a: &[T], b: &[T], start: usize, limit: usize) -> MergeState {
    let n = a.len().min(b.len());
    let mut ii = start.min(n);
    let mut ji = ii;
    let mut diffs = 0;

    while diffs < limit && ii < n && ji < n {
        // SAFETY: ii < n <= a.len() and ji < n <= b.len()
        let av = unsafe { *a.get_unchecked(ii) };
        let bv = unsafe { *b.get_unchecked(ji) };

        match av.cmp(&bv) {
            Ordering::Equal => {
                ii += 1;
                ji += 1;
            }
            Ordering::Less => {
                ii += 1;
                diffs += 1;
            }
            Ordering::Greater => {
                ji += 1;
                diffs += 1;
            }
        }
    }

    MergeState { ii, ji, diffs }
}

/// Adds the unvisited remainder of each sequence to the count, clipping to
/// `limit` after each addition.
///
/// Both tails are checked independently; the one belonging to an exhausted
/// sequence contributes nothing.
#[inline]
#[must_use]
pub fn absorb_tails(state: MergeState, n: usize, limit: usize) -> usize {
    let mut diffs = state.diffs;

    if diffs < limit && state.ii < n {
        diffs = (diffs + (n - state.ii)).min(limit);
    }
    if diffs < limit && state.ji < n {
        diffs = (diffs + (n - state.ji)).min(limit);
    }

    diffs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_stops_on_exhaustion() {
        let a = [1i32, 2, 3, 4];
        let b = [1i32, 2, 3, 5];
        let state = merge_count(&a, &b, 0, usize::MAX);
        // 4 < 5 is counted, then a runs out with 5 still unvisited in b
        assert_eq!(state, MergeState { ii: 4, ji: 3, diffs: 1 });
        assert_eq!(absorb_tails(state, 4, usize::MAX), 2);
    }

    #[test]
    fn test_merge_stops_at_limit() {
        let a = [1i32, 2, 3, 4];
        let b = [2i32, 3, 4, 5];
        let state = merge_count(&a, &b, 0, 1);
        assert_eq!(state.diffs, 1);
        assert_eq!(state.ii, 1);
        assert_eq!(absorb_tails(state, 4, 1), 1);
    }

    #[test]
    fn test_merge_multiset() {
        let a = [5i64, 5, 6];
        let b = [5i64, 6, 6];
        let state = merge_count(&a, &b, 0, 6);
        assert_eq!(absorb_tails(state, 3, 6), 2);
    }

    #[test]
    fn test_merge_resumes_from_start() {
        let a = [1i32, 2, 3, 10];
        let b = [1i32, 2, 3, 11];
        let state = merge_count(&a, &b, 3, 8);
        assert_eq!(state, MergeState { ii: 4, ji: 3, diffs: 1 });
    }

    #[test]
    fn test_start_past_end_is_clamped() {
        let a = [1i32, 2];
        let state = merge_count(&a, &a, 99, 4);
        assert_eq!(state, MergeState { ii: 2, ji: 2, diffs: 0 });
    }

    #[test]
    fn test_extreme_values_do_not_overflow() {
        let a = [i32::MIN, 0];
        let b = [0, i32::MAX];
        let state = merge_count(&a, &b, 0, 4);
        assert_eq!(absorb_tails(state, 2, 4), 2);
    }

    #[test]
    fn test_tails_clip_after_each_addition() {
        let state = MergeState { ii: 2, ji: 10, diffs: 3 };
        assert_eq!(absorb_tails(state, 10, 5), 5);

        let state = MergeState { ii: 10, ji: 4, diffs: 0 };
        assert_eq!(absorb_tails(state, 10, 100), 6);
    }

    #[test]
    fn test_zero_limit() {
        let a = [1i32, 2];
        let b = [3i32, 4];
        let state = merge_count(&a, &b, 0, 0);
        assert_eq!(state.diffs, 0);
        assert_eq!(absorb_tails(state, 2, 0), 0);
    }
}
