//! SIMD prefix-equality kernels and CPU feature detection.
//!
//! Every kernel answers the same question: how long is the run of equal
//! elements at the start of two slices? Vector kernels compare one register
//! of lanes at a time and stop at the first block containing a mismatch,
//! reporting the exact lane. A trailing partial block is left to the caller.
//!
//! All loads are unaligned, so callers do not need to align their buffers.

#[cfg(all(feature = "simd", target_arch = "x86_64"))]
use core::arch::x86_64::*;

#[cfg(all(feature = "simd", target_arch = "aarch64"))]
use core::arch::aarch64::*;

use core::fmt;
use core::str::FromStr;

use crate::error::SortDiffError;

// =============================================================================
// RUNTIME FEATURE DETECTION
// =============================================================================

/// Generates a runtime probe for one x86 feature, constant `false` on other
/// architectures or without `simd`.
macro_rules! x86_feature_probe {
    ($(#[$doc:meta])* $name:ident, $feature:tt) => {
        $(#[$doc])*
        #[cfg(all(feature = "simd", target_arch = "x86_64"))]
        #[inline]
        pub fn $name() -> bool {
            std::is_x86_feature_detected!($feature)
        }

        $(#[$doc])*
        #[cfg(not(all(feature = "simd", target_arch = "x86_64")))]
        #[inline]
        pub fn $name() -> bool {
            false
        }
    };
}

x86_feature_probe!(
    /// Check if SSE4.1 is available.
    has_sse41, "sse4.1"
);
x86_feature_probe!(
    /// Check if AVX2 is available.
    has_avx2, "avx2"
);
x86_feature_probe!(
    /// Check if AVX-512 Foundation is available.
    has_avx512f, "avx512f"
);
x86_feature_probe!(
    /// Check if the AVX-512 vector length extensions are available.
    has_avx512vl, "avx512vl"
);

/// Check if NEON is available (always true on aarch64).
#[cfg(all(feature = "simd", target_arch = "aarch64"))]
#[inline]
pub fn has_neon() -> bool {
    true
}

/// Check if NEON is available (always false on non-ARM).
#[cfg(not(all(feature = "simd", target_arch = "aarch64")))]
#[inline]
pub fn has_neon() -> bool {
    false
}

// =============================================================================
// SCAN TIERS
// =============================================================================

/// Instruction set tier used for the prefix scan.
///
/// Tiers are listed widest first. `Scalar` compares one element at a time
/// and serves as the reference the vector tiers are checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ScanTier {
    /// 512-bit AVX-512F compares.
    Avx512,
    /// 256-bit AVX-512VL mask compares.
    Avx512Ymm,
    /// 256-bit AVX2 compares.
    Avx2,
    /// 128-bit SSE4.1 compares.
    #[cfg_attr(feature = "serde", serde(rename = "sse4.1"))]
    Sse41,
    /// 128-bit NEON compares.
    Neon,
    /// Element-by-element reference scan.
    Scalar,
}

/// Accepted spellings, matched case-insensitively.
const TIER_NAMES: &[(&str, ScanTier)] = &[
    ("avx512", ScanTier::Avx512),
    ("avx512-zmm", ScanTier::Avx512),
    ("avx512-ymm", ScanTier::Avx512Ymm),
    ("avx512-256", ScanTier::Avx512Ymm),
    ("avx2", ScanTier::Avx2),
    ("sse4.1", ScanTier::Sse41),
    ("sse41", ScanTier::Sse41),
    ("neon", ScanTier::Neon),
    ("scalar", ScanTier::Scalar),
];

impl ScanTier {
    /// Every tier, widest first.
    pub const ALL: [ScanTier; 6] = [
        ScanTier::Avx512,
        ScanTier::Avx512Ymm,
        ScanTier::Avx2,
        ScanTier::Sse41,
        ScanTier::Neon,
        ScanTier::Scalar,
    ];

    /// Canonical lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Avx512 => "avx512",
            Self::Avx512Ymm => "avx512-ymm",
            Self::Avx2 => "avx2",
            Self::Sse41 => "sse4.1",
            Self::Neon => "neon",
            Self::Scalar => "scalar",
        }
    }

    /// Register width in bits, `None` for the scalar tier.
    #[must_use]
    pub const fn register_bits(self) -> Option<u32> {
        match self {
            Self::Avx512 => Some(512),
            Self::Avx512Ymm | Self::Avx2 => Some(256),
            Self::Sse41 | Self::Neon => Some(128),
            Self::Scalar => None,
        }
    }

    /// Number of elements of `element_bits` width compared per block.
    #[must_use]
    pub const fn lanes(self, element_bits: u32) -> usize {
        match self.register_bits() {
            Some(bits) => (bits / element_bits) as usize,
            None => 1,
        }
    }

    /// Whether this tier's kernels can run on the current CPU and build.
    #[must_use]
    pub fn is_supported(self) -> bool {
        match self {
            Self::Avx512 => has_avx512f(),
            Self::Avx512Ymm => has_avx512f() && has_avx512vl(),
            Self::Avx2 => has_avx2(),
            Self::Sse41 => has_sse41(),
            Self::Neon => has_neon(),
            Self::Scalar => true,
        }
    }

    /// Widest vector tier supported here, or `None` when the prefix scan
    /// should be skipped entirely.
    ///
    /// With the `avx512-ymm` feature the 256-bit AVX-512 tier is preferred
    /// over the 512-bit one.
    #[must_use]
    pub fn detect() -> Option<Self> {
        if cfg!(feature = "avx512-ymm") && Self::Avx512Ymm.is_supported() {
            return Some(Self::Avx512Ymm);
        }
        [Self::Avx512, Self::Avx2, Self::Sse41, Self::Neon]
            .into_iter()
            .find(|tier| tier.is_supported())
    }

    /// Tiers supported on the current CPU, widest first.
    pub fn supported() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(|tier| tier.is_supported())
    }
}

impl fmt::Display for ScanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScanTier {
    type Err = SortDiffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        TIER_NAMES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|&(_, tier)| tier)
            .ok_or_else(|| SortDiffError::UnknownScanMode(s.into()))
    }
}

// =============================================================================
// PREFIX DISPATCH
// =============================================================================

/// Common prefix length of two `i32` slices using `tier`.
///
/// # Safety
///
/// `tier.is_supported()` must hold.
#[inline]
pub(crate) unsafe fn common_prefix_i32(tier: ScanTier, a: &[i32], b: &[i32]) -> usize {
    match tier {
        #[cfg(all(feature = "simd", target_arch = "x86_64"))]
        ScanTier::Avx512 => common_prefix_i32_avx512(a, b),
        #[cfg(all(feature = "simd", target_arch = "x86_64"))]
        ScanTier::Avx512Ymm => common_prefix_i32_avx512_ymm(a, b),
        #[cfg(all(feature = "simd", target_arch = "x86_64"))]
        ScanTier::Avx2 => common_prefix_i32_avx2(a, b),
        #[cfg(all(feature = "simd", target_arch = "x86_64"))]
        ScanTier::Sse41 => common_prefix_i32_sse41(a, b),
        #[cfg(all(feature = "simd", target_arch = "aarch64"))]
        ScanTier::Neon => common_prefix_i32_neon(a, b),
        _ => common_prefix_scalar(a, b),
    }
}

/// Common prefix length of two `i64` slices using `tier`.
///
/// # Safety
///
/// `tier.is_supported()` must hold.
#[inline]
pub(crate) unsafe fn common_prefix_i64(tier: ScanTier, a: &[i64], b: &[i64]) -> usize {
    match tier {
        #[cfg(all(feature = "simd", target_arch = "x86_64"))]
        ScanTier::Avx512 => common_prefix_i64_avx512(a, b),
        #[cfg(all(feature = "simd", target_arch = "x86_64"))]
        ScanTier::Avx512Ymm => common_prefix_i64_avx512_ymm(a, b),
        #[cfg(all(feature = "simd", target_arch = "x86_64"))]
        ScanTier::Avx2 => common_prefix_i64_avx2(a, b),
        #[cfg(all(feature = "simd", target_arch = "x86_64"))]
        ScanTier::Sse41 => common_prefix_i64_sse41(a, b),
        #[cfg(all(feature = "simd", target_arch = "aarch64"))]
        ScanTier::Neon => common_prefix_i64_neon(a, b),
        _ => common_prefix_scalar(a, b),
    }
}

/// Scalar common prefix length. Exact, no block granularity.
#[inline]
pub fn common_prefix_scalar<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    a.iter()
        .zip(b)
        .position(|(x, y)| x != y)
        .unwrap_or_else(|| a.len().min(b.len()))
}

/// Index of the lowest lane whose equality bit is clear.
#[inline(always)]
#[allow(dead_code)]
fn first_unequal_lane(eq_bits: u32) -> usize {
    (!eq_bits).trailing_zeros() as usize
}

// =============================================================================
// AVX-512 KERNELS
// =============================================================================

/// AVX-512F prefix scan, 16 x i32 per block.
#[cfg(all(feature = "simd", target_arch = "x86_64"))]
#[target_feature(enable = "avx512f")]
unsafe fn common_prefix_i32_avx512(a: &[i32], b: &[i32]) -> usize {
    const LANES: usize = 16;
    let rows = a.len().min(b.len()) / LANES;

    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    for row in 0..rows {
        let offset = row * LANES;
        let va = _mm512_loadu_epi32(a_ptr.add(offset));
        let vb = _mm512_loadu_epi32(b_ptr.add(offset));
        let eq: __mmask16 = _mm512_cmpeq_epi32_mask(va, vb);
        if eq != u16::MAX {
            return offset + first_unequal_lane(u32::from(eq));
        }
    }

    rows * LANES
}

/// AVX-512F prefix scan, 8 x i64 per block.
#[cfg(all(feature = "simd", target_arch = "x86_64"))]
#[target_feature(enable = "avx512f")]
unsafe fn common_prefix_i64_avx512(a: &[i64], b: &[i64]) -> usize {
    const LANES: usize = 8;
    let rows = a.len().min(b.len()) / LANES;

    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    for row in 0..rows {
        let offset = row * LANES;
        let va = _mm512_loadu_epi64(a_ptr.add(offset));
        let vb = _mm512_loadu_epi64(b_ptr.add(offset));
        let eq: __mmask8 = _mm512_cmpeq_epi64_mask(va, vb);
        if eq != u8::MAX {
            return offset + first_unequal_lane(u32::from(eq));
        }
    }

    rows * LANES
}

/// AVX-512VL prefix scan on 256-bit registers, 8 x i32 per block.
#[cfg(all(feature = "simd", target_arch = "x86_64"))]
#[target_feature(enable = "avx512f,avx512vl")]
unsafe fn common_prefix_i32_avx512_ymm(a: &[i32], b: &[i32]) -> usize {
    const LANES: usize = 8;
    let rows = a.len().min(b.len()) / LANES;

    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    for row in 0..rows {
        let offset = row * LANES;
        let va = _mm256_loadu_epi32(a_ptr.add(offset));
        let vb = _mm256_loadu_epi32(b_ptr.add(offset));
        let eq: __mmask8 = _mm256_cmpeq_epi32_mask(va, vb);
        if eq != u8::MAX {
            return offset + first_unequal_lane(u32::from(eq));
        }
    }

    rows * LANES
}

/// AVX-512VL prefix scan on 256-bit registers, 4 x i64 per block.
#[cfg(all(feature = "simd", target_arch = "x86_64"))]
#[target_feature(enable = "avx512f,avx512vl")]
unsafe fn common_prefix_i64_avx512_ymm(a: &[i64], b: &[i64]) -> usize {
    const LANES: usize = 4;
    const ALL_EQUAL: u8 = 0b1111;
    let rows = a.len().min(b.len()) / LANES;

    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    for row in 0..rows {
        let offset = row * LANES;
        let va = _mm256_loadu_epi64(a_ptr.add(offset));
        let vb = _mm256_loadu_epi64(b_ptr.add(offset));
        let eq: __mmask8 = _mm256_cmpeq_epi64_mask(va, vb);
        if eq != ALL_EQUAL {
            return offset + first_unequal_lane(u32::from(eq));
        }
    }

    rows * LANES
}

// =============================================================================
// AVX2 KERNELS
// =============================================================================

/// AVX2 prefix scan, 8 x i32 per block.
#[cfg(all(feature = "simd", target_arch = "x86_64"))]
#[target_feature(enable = "avx2")]
#[allow(clippy::cast_sign_loss)]
unsafe fn common_prefix_i32_avx2(a: &[i32], b: &[i32]) -> usize {
    const LANES: usize = 8;
    const ALL_EQUAL: u32 = 0xFF;
    let rows = a.len().min(b.len()) / LANES;

    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    for row in 0..rows {
        let offset = row * LANES;
        let va = _mm256_loadu_si256(a_ptr.add(offset).cast());
        let vb = _mm256_loadu_si256(b_ptr.add(offset).cast());

        // One sign bit per 32-bit lane
        let eq = _mm256_movemask_ps(_mm256_castsi256_ps(_mm256_cmpeq_epi32(va, vb))) as u32;
        if eq != ALL_EQUAL {
            return offset + first_unequal_lane(eq);
        }
    }

    rows * LANES
}

/// AVX2 prefix scan, 4 x i64 per block.
#[cfg(all(feature = "simd", target_arch = "x86_64"))]
#[target_feature(enable = "avx2")]
#[allow(clippy::cast_sign_loss)]
unsafe fn common_prefix_i64_avx2(a: &[i64], b: &[i64]) -> usize {
    const LANES: usize = 4;
    const ALL_EQUAL: u32 = 0xF;
    let rows = a.len().min(b.len()) / LANES;

    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    for row in 0..rows {
        let offset = row * LANES;
        let va = _mm256_loadu_si256(a_ptr.add(offset).cast());
        let vb = _mm256_loadu_si256(b_ptr.add(offset).cast());

        // One sign bit per 64-bit lane
        let eq = _mm256_movemask_pd(_mm256_castsi256_pd(_mm256_cmpeq_epi64(va, vb))) as u32;
        if eq != ALL_EQUAL {
            return offset + first_unequal_lane(eq);
        }
    }

    rows * LANES
}

// =============================================================================
// SSE4.1 KERNELS
// =============================================================================

/// SSE4.1 prefix scan, 4 x i32 per block.
#[cfg(all(feature = "simd", target_arch = "x86_64"))]
#[target_feature(enable = "sse4.1")]
#[allow(clippy::cast_sign_loss)]
unsafe fn common_prefix_i32_sse41(a: &[i32], b: &[i32]) -> usize {
    const LANES: usize = 4;
    const ALL_EQUAL: u32 = 0xF;
    let rows = a.len().min(b.len()) / LANES;

    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    for row in 0..rows {
        let offset = row * LANES;
        let va = _mm_loadu_si128(a_ptr.add(offset).cast());
        let vb = _mm_loadu_si128(b_ptr.add(offset).cast());
        let eq = _mm_movemask_ps(_mm_castsi128_ps(_mm_cmpeq_epi32(va, vb))) as u32;
        if eq != ALL_EQUAL {
            return offset + first_unequal_lane(eq);
        }
    }

    rows * LANES
}

/// SSE4.1 prefix scan, 2 x i64 per block. `pcmpeqq` is the reason this tier
/// needs 4.1 rather than plain SSE2.
#[cfg(all(feature = "simd", target_arch = "x86_64"))]
#[target_feature(enable = "sse4.1")]
#[allow(clippy::cast_sign_loss)]
unsafe fn common_prefix_i64_sse41(a: &[i64], b: &[i64]) -> usize {
    const LANES: usize = 2;
    const ALL_EQUAL: u32 = 0b11;
    let rows = a.len().min(b.len()) / LANES;

    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    for row in 0..rows {
        let offset = row * LANES;
        let va = _mm_loadu_si128(a_ptr.add(offset).cast());
        let vb = _mm_loadu_si128(b_ptr.add(offset).cast());
        let eq = _mm_movemask_pd(_mm_castsi128_pd(_mm_cmpeq_epi64(va, vb))) as u32;
        if eq != ALL_EQUAL {
            return offset + first_unequal_lane(eq);
        }
    }

    rows * LANES
}

// =============================================================================
// NEON KERNELS
// =============================================================================

/// NEON prefix scan, 4 x i32 per block.
#[cfg(all(feature = "simd", target_arch = "aarch64"))]
#[target_feature(enable = "neon")]
unsafe fn common_prefix_i32_neon(a: &[i32], b: &[i32]) -> usize {
    const LANES: usize = 4;
    let rows = a.len().min(b.len()) / LANES;

    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    for row in 0..rows {
        let offset = row * LANES;
        let eq = vceqq_s32(vld1q_s32(a_ptr.add(offset)), vld1q_s32(b_ptr.add(offset)));

        // Any zero lane pulls the horizontal minimum to zero
        if vminvq_u32(eq) != u32::MAX {
            let end = offset + LANES;
            return offset + common_prefix_scalar(&a[offset..end], &b[offset..end]);
        }
    }

    rows * LANES
}

/// NEON prefix scan, 2 x i64 per block.
#[cfg(all(feature = "simd", target_arch = "aarch64"))]
#[target_feature(enable = "neon")]
unsafe fn common_prefix_i64_neon(a: &[i64], b: &[i64]) -> usize {
    const LANES: usize = 2;
    let rows = a.len().min(b.len()) / LANES;

    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    for row in 0..rows {
        let offset = row * LANES;
        let eq = vceqq_s64(vld1q_s64(a_ptr.add(offset)), vld1q_s64(b_ptr.add(offset)));
        if vminvq_u32(vreinterpretq_u32_u64(eq)) != u32::MAX {
            let end = offset + LANES;
            return offset + common_prefix_scalar(&a[offset..end], &b[offset..end]);
        }
    }

    rows * LANES
}

// =============================================================================
// TESTS
// =============================================================================
