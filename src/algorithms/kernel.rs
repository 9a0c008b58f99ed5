//! Diff kernel: prefix scan, merge and tail absorption in one call.

use std::sync::OnceLock;

use crate::config::DiffConfig;
use crate::error::{Result, SortDiffError};
use crate::types::{Cap, DiffElement};
use crate::utils::simd::ScanTier;

use super::merge_diff::{absorb_tails, merge_count};
use super::prefix_scan::{scan_prefix_unchecked, PrefixScan};

/// A resolved diff counter.
///
/// Holds the scan tier chosen for this process, or none when the prefix scan
/// is disabled. A kernel can only be built with a tier the CPU supports, which
/// is what makes [`DiffKernel::count`] safe to call.
///
/// # Example
///
/// ```rust
/// use sortdiff::prelude::*;
///
/// let kernel = DiffKernel::with_tier(ScanTier::Scalar).unwrap();
/// assert_eq!(kernel.count(&[5, 5, 6], &[5, 6, 6], Cap::Unbounded), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiffKernel {
    tier: Option<ScanTier>,
}

impl DiffKernel {
    /// Kernel that skips the prefix scan and merges from index 0.
    #[must_use]
    pub const fn merge_only() -> Self {
        Self { tier: None }
    }

    /// Kernel using the widest vector tier this CPU supports, or no scan if
    /// there is none.
    #[must_use]
    pub fn detect() -> Self {
        Self {
            tier: ScanTier::detect(),
        }
    }

    /// Kernel pinned to `tier`.
    ///
    /// # Errors
    ///
    /// Returns [`SortDiffError::UnsupportedTier`] if the CPU (or this build)
    /// cannot run the tier.
    pub fn with_tier(tier: ScanTier) -> Result<Self> {
        if tier.is_supported() {
            Ok(Self { tier: Some(tier) })
        } else {
            Err(SortDiffError::UnsupportedTier { tier })
        }
    }

    /// The scan tier in use, `None` when scanning is disabled.
    #[must_use]
    pub const fn tier(&self) -> Option<ScanTier> {
        self.tier
    }

    /// Runs only the prefix scan.
    ///
    /// Without a tier this reports `ResumeAt(0)`. Sequences of different
    /// length are compared over their common length.
    pub fn scan<T: DiffElement>(&self, a: &[T], b: &[T]) -> PrefixScan {
        let n = a.len().min(b.len());
        match self.tier {
            // SAFETY: tiers are only stored after `is_supported` succeeded
            Some(tier) => unsafe { scan_prefix_unchecked(tier, &a[..n], &b[..n]) },
            None => PrefixScan::ResumeAt(0),
        }
    }

    /// Counts elements of `a` and `b` that are unmatched in the other
    /// sequence, stopping at `cap`.
    ///
    /// Both sequences must be sorted ascending and have the same length.
    /// Debug builds assert this; release builds compare only the common
    /// length and return an unspecified count for unsorted input.
    pub fn count<T: DiffElement>(&self, a: &[T], b: &[T], cap: Cap) -> usize {
        debug_assert_eq!(a.len(), b.len(), "sequences must have equal length");
        debug_assert!(a.is_sorted(), "first sequence is not sorted ascending");
        debug_assert!(b.is_sorted(), "second sequence is not sorted ascending");

        let n = a.len().min(b.len());
        let (a, b) = (&a[..n], &b[..n]);
        let limit = cap.limit(n);

        let scan = self.scan(a, b);
        if scan.is_identical() {
            return 0;
        }
        let start = scan.resume_index(n);
        log::trace!("prefix scan resumes merge at {start} of {n}");

        let state = merge_count(a, b, start, limit);
        absorb_tails(state, n, limit)
    }
}

impl Default for DiffKernel {
    fn default() -> Self {
        Self::detect()
    }
}

/// Process-wide kernel, resolved once from the `SORTDIFF_SCAN` environment
/// variable and falling back to auto detection.
pub fn default_kernel() -> DiffKernel {
    static DEFAULT: OnceLock<DiffKernel> = OnceLock::new();

    *DEFAULT.get_or_init(|| {
        let kernel = kernel_or_detect(DiffConfig::from_env());
        log::debug!(
            "sortdiff kernel: scan tier {}, {} x i32 / {} x i64 lanes",
            kernel.tier().map_or("disabled", ScanTier::name),
            kernel.tier().map_or(0, |t| t.lanes(32)),
            kernel.tier().map_or(0, |t| t.lanes(64)),
        );
        kernel
    })
}

/// Kernel for `config`, or auto detection when the configuration could not
/// be read or names a tier this CPU cannot run.
fn kernel_or_detect(config: Result<DiffConfig>) -> DiffKernel {
    config
        .and_then(|config| config.kernel())
        .unwrap_or_else(|err| {
            log::warn!("{err}; falling back to automatic scan tier detection");
            DiffKernel::detect()
        })
}

/// Counts differences between two sorted sequences with [`default_kernel`].
///
/// ```rust
/// use sortdiff::prelude::*;
///
/// assert_eq!(count_diffs(&[1, 2, 3, 4], &[2, 3, 4, 5], Cap::AtMost(1)), 1);
/// assert_eq!(count_diffs(&[1i64, 2], &[3, 4], Cap::Unbounded), 4);
/// ```
#[inline]
pub fn count_diffs<T: DiffElement>(a: &[T], b: &[T], cap: Cap) -> usize {
    default_kernel().count(a, b, cap)
}
