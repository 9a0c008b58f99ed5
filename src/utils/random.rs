//! Deterministic generator for sorted test and benchmark inputs.
//!
//! Wraps a seeded ChaCha20 stream so that benchmarks, the throughput harness
//! and tests see the same sequences on every platform for a given seed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::types::DiffElement;

/// A seeded pseudo-random number generator.
///
/// # Example
///
/// ```rust
/// use sortdiff::utils::Random;
///
/// let mut rng = Random::new(42);
///
/// // Two ascending i32 sequences of length 100 agreeing on the first 60
/// let (a, b) = rng.sequence_pair::<i32>(100, 60, 3);
/// assert_eq!(a[..60], b[..60]);
/// assert!(a.is_sorted() && b.is_sorted());
/// ```
#[derive(Clone)]
pub struct Random {
    rng: ChaCha20Rng,
    seed: u64,
    /// Number of random values generated.
    steps: u64,
}

impl Random {
    /// Creates a new random number generator with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            seed,
            steps: 0,
        }
    }

    /// Returns the seed used for this generator.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the number of random values generated.
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Generates a random u64 in the range [min, max).
    pub fn get_uint64_range(&mut self, min: u64, max: u64) -> u64 {
        self.steps += 1;
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..max)
    }

    /// Generates a random usize in the range [0, n).
    pub fn get_usize(&mut self, n: usize) -> usize {
        self.steps += 1;
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    /// Ascending sequence of `len` values with gaps drawn from
    /// `0..=max_step`. A step of 0 produces a duplicate.
    ///
    /// Values start below 1000 and grow by at most `len * max_step`, so keep
    /// that within the range of `T`.
    pub fn sorted_sequence<T: DiffElement>(&mut self, len: usize, max_step: u64) -> Vec<T> {
        let mut values = Vec::with_capacity(len);
        let start = self.start_value();
        self.extend_sorted(&mut values, start, len, max_step);
        values
    }

    /// Two ascending sequences of length `len` that agree on at least the
    /// first `shared` elements and continue independently after that.
    pub fn sequence_pair<T: DiffElement>(
        &mut self,
        len: usize,
        shared: usize,
        max_step: u64,
    ) -> (Vec<T>, Vec<T>) {
        let shared = shared.min(len);

        let mut a = Vec::with_capacity(len);
        let start = self.start_value();
        let last = self.extend_sorted(&mut a, start, shared, max_step);

        let mut b = a.clone();
        self.extend_sorted(&mut a, last, len - shared, max_step);
        self.extend_sorted(&mut b, last, len - shared, max_step);

        (a, b)
    }

    fn start_value(&mut self) -> i64 {
        // Non-negative and below 1000
        self.get_uint64_range(0, 1000).cast_signed()
    }

    /// Pushes `count` ascending values continuing from `current`; returns
    /// the last value pushed (or `current` when `count` is 0).
    fn extend_sorted<T: DiffElement>(
        &mut self,
        values: &mut Vec<T>,
        mut current: i64,
        count: usize,
        max_step: u64,
    ) -> i64 {
        for _ in 0..count {
            let step = self.get_uint64_range(0, max_step.saturating_add(1));
            current = current.saturating_add_unsigned(step);
            values.push(T::from_i64(current));
        }
        current
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::new(0)
    }
}

impl core::fmt::Debug for Random {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Random")
            .field("seed", &self.seed)
            .field("steps", &self.steps)
            .finish_non_exhaustive()
    }
}
