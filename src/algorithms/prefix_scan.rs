//! Prefix equality scan.
//!
//! Skips the leading run on which two sorted sequences agree so the merge
//! only has to walk what follows. The scan is purely an optimization: a merge
//! started at any index no later than the first mismatch gives the same count.

use crate::types::DiffElement;
use crate::utils::simd::{common_prefix_scalar, ScanTier};

/// Outcome of a prefix scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrefixScan {
    /// Every element compared equal; the sequences have no differences.
    Identical,
    /// Index of the first mismatch; the merge resumes here.
    ResumeAt(usize),
}

impl PrefixScan {
    /// Index the merge should start from. `Identical` maps to `len`.
    #[inline]
    #[must_use]
    pub const fn resume_index(self, len: usize) -> usize {
        match self {
            Self::Identical => len,
            Self::ResumeAt(index) => index,
        }
    }

    /// Whether the scan proved the sequences identical.
    #[inline]
    #[must_use]
    pub const fn is_identical(self) -> bool {
        matches!(self, Self::Identical)
    }
}

/// Scans `a` and `b` (already trimmed to the same length) with `tier`.
///
/// # Safety
///
/// `tier.is_supported()` must hold.
#[inline]
pub(crate) unsafe fn scan_prefix_unchecked<T: DiffElement>(
    tier: ScanTier,
    a: &[T],
    b: &[T],
) -> PrefixScan {
    debug_assert_eq!(a.len(), b.len());

    // Blocks first, then the partial block (or the single element at a
    // block-level mismatch) element by element
    let blocks = T::common_prefix(tier, a, b);
    let prefix = blocks + common_prefix_scalar(&a[blocks..], &b[blocks..]);

    if prefix == a.len() {
        PrefixScan::Identical
    } else {
        PrefixScan::ResumeAt(prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_index() {
        assert_eq!(PrefixScan::Identical.resume_index(8), 8);
        assert_eq!(PrefixScan::ResumeAt(3).resume_index(8), 3);
        assert!(PrefixScan::Identical.is_identical());
        assert!(!PrefixScan::ResumeAt(0).is_identical());
    }

    #[test]
    fn test_scalar_scan() {
        let a = [1i32, 2, 3, 4];
        let b = [1i32, 2, 3, 5];
        let scan = unsafe { scan_prefix_unchecked(ScanTier::Scalar, &a, &b) };
        assert_eq!(scan, PrefixScan::ResumeAt(3));

        let scan = unsafe { scan_prefix_unchecked(ScanTier::Scalar, &a, &a) };
        assert_eq!(scan, PrefixScan::Identical);
    }

    #[test]
    fn test_partial_block_mismatch() {
        let a = [7i64; 5];
        let mut b = [7i64; 5];
        b[4] = 8;
        for tier in ScanTier::supported() {
            let scan = unsafe { scan_prefix_unchecked(tier, &a, &b) };
            assert_eq!(scan, PrefixScan::ResumeAt(4), "{tier}");
        }
    }

    #[test]
    fn test_partial_block_identical() {
        let a: [i32; 19] = core::array::from_fn(|i| i as i32);
        for tier in ScanTier::supported() {
            let scan = unsafe { scan_prefix_unchecked(tier, &a, &a) };
            assert_eq!(scan, PrefixScan::Identical, "{tier}");
        }
    }

    #[test]
    fn test_reports_exact_first_mismatch() {
        let a: [i32; 40] = core::array::from_fn(|i| i as i32);
        for pos in 0..40 {
            let mut b = a;
            b[pos] = -1;
            for tier in ScanTier::supported() {
                let scan = unsafe { scan_prefix_unchecked(tier, &a, &b) };
                assert_eq!(scan, PrefixScan::ResumeAt(pos), "{tier} pos {pos}");
            }
        }
    }
}
