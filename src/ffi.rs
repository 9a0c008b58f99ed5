//! Fortran/C entry point.
//!
//! Exposes `ij_count_diffs_` with every argument passed by reference, which
//! is how gfortran and ifort call an external `INTEGER FUNCTION` compiled
//! with default name mangling:
//!
//! ```fortran
//! INTEGER, EXTERNAL :: ij_count_diffs
//! ndiff = ij_count_diffs(i, j, n, max_count)
//! ```
//!
//! The integer kind is [`FInt`], 32-bit unless the crate is built with the
//! `big_integer` feature to match host code compiled with `-i8`.

use core::slice;

use crate::algorithms::count_diffs;
use crate::types::{Cap, DiffElement, FInt};

/// Counts elements of `i` and `j` not contained in both, stopping at
/// `*max_count` (`<= 0` means no cap).
///
/// Returns 0 when any pointer is null or `*n <= 0`. The count saturates at
/// `FInt::MAX`.
///
/// # Safety
///
/// When non-null, `n` and `max_count` must point to readable integers, and
/// `i` and `j` must each point to `*n` readable, initialised integers sorted
/// ascending. No alignment beyond that of `FInt` is required.
#[no_mangle]
pub unsafe extern "C" fn ij_count_diffs_(
    i: *const FInt,
    j: *const FInt,
    n: *const FInt,
    max_count: *const FInt,
) -> FInt {
    if n.is_null() || max_count.is_null() {
        return 0;
    }

    let len = (*n).to_count();
    if len == 0 || i.is_null() || j.is_null() {
        return 0;
    }

    let a = slice::from_raw_parts(i, len);
    let b = slice::from_raw_parts(j, len);

    FInt::from_count(count_diffs(a, b, Cap::from_raw(*max_count)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::ptr;

    fn call(a: &[FInt], b: &[FInt], max_count: FInt) -> FInt {
        let n = FInt::from_count(a.len());
        unsafe { ij_count_diffs_(a.as_ptr(), b.as_ptr(), &n, &max_count) }
    }

    #[test]
    fn test_scenarios() {
        assert_eq!(call(&[1, 2, 3, 4], &[1, 2, 3, 5], 0), 2);
        assert_eq!(call(&[1, 2, 3, 4], &[2, 3, 4, 5], 1), 1);
        assert_eq!(call(&[5, 5, 6], &[5, 6, 6], -1), 2);
    }

    #[test]
    fn test_benchmark_fixture() {
        // 48 shared values, then 8 that are offset by one
        let mut i: Vec<FInt> = (41..=88).collect();
        let mut j = i.clone();
        i.extend(89..=96);
        j.extend(90..=97);
        let n = FInt::from_count(i.len());
        assert_eq!(n, 56);
        let got = unsafe { ij_count_diffs_(i.as_ptr(), j.as_ptr(), &n, &n) };
        assert_eq!(got, 2);
    }

    #[test]
    fn test_null_and_empty() {
        let a = [1 as FInt];
        let one: FInt = 1;
        let zero: FInt = 0;
        let neg: FInt = -4;
        unsafe {
            assert_eq!(ij_count_diffs_(ptr::null(), a.as_ptr(), &one, &zero), 0);
            assert_eq!(ij_count_diffs_(a.as_ptr(), a.as_ptr(), ptr::null(), &zero), 0);
            assert_eq!(ij_count_diffs_(a.as_ptr(), a.as_ptr(), &one, ptr::null()), 0);
            assert_eq!(ij_count_diffs_(a.as_ptr(), a.as_ptr(), &zero, &zero), 0);
            assert_eq!(ij_count_diffs_(a.as_ptr(), a.as_ptr(), &neg, &zero), 0);
        }
    }
}
