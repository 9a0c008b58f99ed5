//! # sortdiff - capped diff counting for sorted integer vectors
//!
//! `sortdiff` counts how many elements of two ascending-sorted integer vectors
//! of equal length are *not* shared between them, treating repeated values as
//! distinct elements (a multiset symmetric difference). The count can be capped
//! so that callers who only care whether "at least k things changed" pay for
//! roughly `k` comparisons instead of `N`.
//!
//! ## Overview
//!
//! Each call runs three phases:
//!
//! - **Prefix scan**: a SIMD block compare skips the leading run on which both
//!   vectors agree. If the vectors are identical the call returns here.
//! - **Merge count**: a two-pointer merge from the first mismatch, counting
//!   unmatched elements until the cap is met or one vector runs out.
//! - **Tail absorption**: whatever is left of the other vector is unmatched
//!   by sortedness and is added in one step, clipped to the cap.
//!
//! ## Quick Start
//!
//! ```rust
//! use sortdiff::prelude::*;
//!
//! let a = [1, 2, 3, 4];
//! let b = [1, 2, 3, 5];
//!
//! assert_eq!(count_diffs(&a, &b, Cap::Unbounded), 2);
//! assert_eq!(count_diffs(&a, &b, Cap::AtMost(1)), 1);
//!
//! // Pin the scan tier explicitly instead of using the cached default.
//! let kernel = DiffKernel::merge_only();
//! assert_eq!(kernel.count(&a, &b, Cap::from_raw(0)), 2);
//! ```
//!
//! ## Feature Flags
//!
//! - `simd` (default): compile the vector scan tiers
//! - `cli` (default): the `diff_throughput` measurement binary
//! - `big_integer`: 64-bit integers at the C ABI boundary (Fortran `-i8`)
//! - `avx512-ymm`: prefer 256-bit AVX-512 compares over 512-bit ones
//! - `serde`: serialization of the configuration types

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::similar_names)]

pub mod algorithms;
pub mod config;
pub mod ffi;
pub mod types;
pub mod utils;

/// Re-export of commonly used types and functions for convenience.
pub mod prelude {
    pub use crate::algorithms::{count_diffs, default_kernel, DiffKernel, PrefixScan};
    pub use crate::config::{DiffConfig, ScanMode};
    pub use crate::types::{Cap, DiffElement, FInt};
    pub use crate::utils::simd::ScanTier;
    pub use crate::utils::Random;
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error types for the library.
pub mod error {
    use thiserror::Error;

    use crate::utils::simd::ScanTier;

    /// Main error type for sortdiff configuration.
    ///
    /// The diff computation itself never fails; errors only come from
    /// building a kernel out of user supplied settings.
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum SortDiffError {
        /// A scan mode string did not name a known mode or tier.
        #[error("Unknown scan mode '{0}' (expected auto, off, scalar, sse4.1, avx2, avx512, avx512-ymm or neon)")]
        UnknownScanMode(String),

        /// The requested tier cannot run on this CPU or build.
        #[error("Scan tier {tier} is not supported on this CPU or build")]
        UnsupportedTier {
            /// The tier that was requested.
            tier: ScanTier,
        },

        /// Invalid parameter value.
        #[error("Invalid parameter '{name}': {message}")]
        InvalidParameter {
            /// Name of the invalid parameter.
            name: &'static str,
            /// Description of the error.
            message: String,
        },
    }

    /// Result type alias using `SortDiffError`.
    pub type Result<T> = core::result::Result<T, SortDiffError>;
}

pub use error::{Result, SortDiffError};
