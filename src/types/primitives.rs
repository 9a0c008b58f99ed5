//! Primitive element types for diff counting.
//!
//! This module fixes the integer width used at the C ABI boundary and defines
//! the [`DiffElement`] trait through which the scan and merge phases are
//! monomorphised for 32-bit and 64-bit elements.

use core::fmt;

use crate::utils::simd::{self, ScanTier};

/// 32-bit signed integer.
pub type Int32 = i32;

/// 64-bit signed integer.
pub type Int64 = i64;

/// Integer type of the Fortran-callable entry point.
/// Uses 32-bit by default, can be changed to 64-bit with feature flag.
#[cfg(not(feature = "big_integer"))]
pub type FInt = Int32;

/// Integer type of the Fortran-callable entry point (64-bit variant, for
/// host code compiled with 8-byte default integers).
#[cfg(feature = "big_integer")]
pub type FInt = Int64;

mod sealed {
    pub trait Sealed {}
    impl Sealed for i32 {}
    impl Sealed for i64 {}
}

/// Signed integer element that can be diff-counted.
///
/// Implemented for `i32` and `i64` only. Each implementation routes the
/// prefix scan to the kernels specialised for its lane width, so the width is
/// resolved at compile time rather than by a runtime branch.
pub trait DiffElement: Copy + Ord + fmt::Debug + Send + Sync + 'static + sealed::Sealed {
    /// Width of one element in bits.
    const BITS: u32;

    /// Converts a raw count or length to `usize`, mapping negatives to 0 and
    /// saturating values that do not fit.
    fn to_count(self) -> usize;

    /// Converts a count back to the element type, saturating at `Self::MAX`.
    fn from_count(count: usize) -> Self;

    /// Truncating conversion used by the sequence generators.
    fn from_i64(value: i64) -> Self;

    /// Length of the common prefix of `a` and `b` as established by `tier`.
    ///
    /// Vector tiers only look at whole blocks, so the result is either the
    /// index of the first mismatch or the end of the last full block.
    ///
    /// # Safety
    ///
    /// `tier.is_supported()` must be true on the running CPU.
    #[doc(hidden)]
    unsafe fn common_prefix(tier: ScanTier, a: &[Self], b: &[Self]) -> usize;
}

impl DiffElement for i32 {
    const BITS: u32 = 32;

    #[inline]
    fn to_count(self) -> usize {
        usize::try_from(self).unwrap_or(0)
    }

    #[inline]
    fn from_count(count: usize) -> Self {
        i32::try_from(count).unwrap_or(i32::MAX)
    }

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    fn from_i64(value: i64) -> Self {
        value as i32
    }

    #[inline]
    unsafe fn common_prefix(tier: ScanTier, a: &[Self], b: &[Self]) -> usize {
        simd::common_prefix_i32(tier, a, b)
    }
}

impl DiffElement for i64 {
    const BITS: u32 = 64;

    #[inline]
    fn to_count(self) -> usize {
        if self <= 0 {
            0
        } else {
            usize::try_from(self).unwrap_or(usize::MAX)
        }
    }

    #[inline]
    fn from_count(count: usize) -> Self {
        i64::try_from(count).unwrap_or(i64::MAX)
    }

    #[inline]
    fn from_i64(value: i64) -> Self {
        value
    }

    #[inline]
    unsafe fn common_prefix(tier: ScanTier, a: &[Self], b: &[Self]) -> usize {
        simd::common_prefix_i64(tier, a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_sizes() {
        assert_eq!(core::mem::size_of::<Int32>() as u32 * 8, <Int32 as DiffElement>::BITS);
        assert_eq!(core::mem::size_of::<Int64>() as u32 * 8, <Int64 as DiffElement>::BITS);
    }

    #[cfg(not(feature = "big_integer"))]
    #[test]
    fn test_default_fint_is_32_bit() {
        assert_eq!(core::mem::size_of::<FInt>(), 4);
    }

    #[cfg(feature = "big_integer")]
    #[test]
    fn test_big_integer_fint_is_64_bit() {
        assert_eq!(core::mem::size_of::<FInt>(), 8);
    }

    #[test]
    fn test_to_count_clamps_negatives() {
        assert_eq!((-5i32).to_count(), 0);
        assert_eq!((-5i64).to_count(), 0);
        assert_eq!(0i32.to_count(), 0);
        assert_eq!(17i64.to_count(), 17);
    }

    #[test]
    fn test_from_count_saturates() {
        assert_eq!(i32::from_count(12), 12);
        assert_eq!(i32::from_count(usize::MAX), i32::MAX);
        assert_eq!(i64::from_count(99), 99);
    }
}
