//! Utility modules.
//!
//! SIMD kernels with CPU feature detection, and the seeded generator used to
//! build sorted inputs for tests and benchmarks.

mod random;
pub mod simd;

pub use random::Random;
