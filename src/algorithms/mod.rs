//! Diff counting algorithms.
//!
//! - **Prefix Scan**: SIMD skip over the leading run both sequences share
//! - **Merge Diff**: two-pointer merge count with tail absorption
//! - **Kernel**: the three phases chained behind one entry point

mod kernel;
mod merge_diff;
mod prefix_scan;

pub use kernel::{count_diffs, default_kernel, DiffKernel};
pub use merge_diff::{absorb_tails, merge_count, MergeState};
pub use prefix_scan::PrefixScan;
