//! Upper bound on the number of differences a call reports.

use super::DiffElement;

/// Maximum number of differences the caller wants reported.
///
/// Counting stops as soon as the cap is met, which bounds the merge at
/// roughly `cap` comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Cap {
    /// Count every difference.
    #[default]
    Unbounded,
    /// Stop after this many differences.
    AtMost(usize),
}

impl Cap {
    /// Interprets a raw `max_count` argument: anything `<= 0` is unbounded.
    #[inline]
    pub fn from_raw<T: DiffElement>(max_count: T) -> Self {
        match max_count.to_count() {
            0 => Self::Unbounded,
            k => Self::AtMost(k),
        }
    }

    /// Effective limit for two sequences of length `len`.
    ///
    /// Two sequences of length `len` differ in at most `2 * len` elements,
    /// so an unbounded cap resolves to that.
    #[inline]
    #[must_use]
    pub const fn limit(self, len: usize) -> usize {
        match self {
            Self::Unbounded => len.saturating_mul(2),
            Self::AtMost(k) => k,
        }
    }
}
