//! Kernel configuration.
//!
//! The scan tier can be left to auto detection, disabled, or forced to a
//! specific instruction set. The `SORTDIFF_SCAN` environment variable feeds
//! the process-wide default kernel:
//!
//! ```text
//! SORTDIFF_SCAN=auto        widest supported vector tier (default)
//! SORTDIFF_SCAN=off         merge only, no prefix scan
//! SORTDIFF_SCAN=avx2        force a tier: scalar, sse4.1, avx2, avx512, avx512-ymm, neon
//! ```

use std::ffi::OsStr;
use std::fmt;
use std::str::FromStr;

use crate::algorithms::DiffKernel;
use crate::error::{Result, SortDiffError};
use crate::utils::simd::ScanTier;

/// How the prefix scan tier is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ScanMode {
    /// Widest vector tier the CPU supports; no scan if there is none.
    #[default]
    Auto,
    /// Skip the prefix scan and merge from index 0.
    Disabled,
    /// Use exactly this tier.
    Force(ScanTier),
}

impl ScanMode {
    /// Builds the kernel this mode describes.
    ///
    /// # Errors
    ///
    /// Returns [`SortDiffError::UnsupportedTier`] when a forced tier cannot
    /// run here.
    pub fn resolve(self) -> Result<DiffKernel> {
        match self {
            Self::Auto => Ok(DiffKernel::detect()),
            Self::Disabled => Ok(DiffKernel::merge_only()),
            Self::Force(tier) => DiffKernel::with_tier(tier),
        }
    }
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Disabled => f.write_str("off"),
            Self::Force(tier) => fmt::Display::fmt(tier, f),
        }
    }
}

impl FromStr for ScanMode {
    type Err = SortDiffError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        if ["off", "none", "disabled"].iter().any(|m| m.eq_ignore_ascii_case(s)) {
            return Ok(Self::Disabled);
        }
        s.parse().map(Self::Force)
    }
}

/// Kernel configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DiffConfig {
    /// Prefix scan tier selection.
    pub scan: ScanMode,
}

impl DiffConfig {
    /// Environment variable read by [`DiffConfig::from_env`].
    pub const ENV_VAR: &'static str = "SORTDIFF_SCAN";

    /// Creates a configuration with the given scan mode.
    #[must_use]
    pub const fn new(scan: ScanMode) -> Self {
        Self { scan }
    }

    /// Returns a copy with `scan` replaced.
    #[must_use]
    pub const fn with_scan(mut self, scan: ScanMode) -> Self {
        self.scan = scan;
        self
    }

    /// Reads the configuration from `SORTDIFF_SCAN`.
    ///
    /// # Errors
    ///
    /// See [`DiffConfig::from_env_value`].
    pub fn from_env() -> Result<Self> {
        Self::from_env_value(std::env::var_os(Self::ENV_VAR).as_deref())
    }

    /// Parses a raw `SORTDIFF_SCAN` value. `None` is an unset variable and
    /// gives the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SortDiffError::UnknownScanMode`] for an unrecognised value
    /// and [`SortDiffError::InvalidParameter`] for a non-UTF-8 one.
    pub fn from_env_value(value: Option<&OsStr>) -> Result<Self> {
        let Some(value) = value else {
            return Ok(Self::default());
        };
        let value = value.to_str().ok_or_else(|| SortDiffError::InvalidParameter {
            name: Self::ENV_VAR,
            message: "value is not valid UTF-8".into(),
        })?;
        Ok(Self::new(value.parse()?))
    }

    /// Builds the kernel for this configuration.
    ///
    /// # Errors
    ///
    /// See [`ScanMode::resolve`].
    pub fn kernel(&self) -> Result<DiffKernel> {
        self.scan.resolve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modes() {
        assert_eq!("auto".parse::<ScanMode>().unwrap(), ScanMode::Auto);
        assert_eq!("".parse::<ScanMode>().unwrap(), ScanMode::Auto);
        assert_eq!("OFF".parse::<ScanMode>().unwrap(), ScanMode::Disabled);
        assert_eq!("none".parse::<ScanMode>().unwrap(), ScanMode::Disabled);
        assert_eq!("avx2".parse::<ScanMode>().unwrap(), ScanMode::Force(ScanTier::Avx2));
        assert_eq!("sse41".parse::<ScanMode>().unwrap(), ScanMode::Force(ScanTier::Sse41));
        assert!("avx1024".parse::<ScanMode>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        let modes = [
            ScanMode::Auto,
            ScanMode::Disabled,
            ScanMode::Force(ScanTier::Avx512Ymm),
            ScanMode::Force(ScanTier::Scalar),
        ];
        for mode in modes {
            assert_eq!(mode.to_string().parse::<ScanMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_resolve() {
        assert_eq!(ScanMode::Disabled.resolve().unwrap().tier(), None);
        assert_eq!(
            ScanMode::Force(ScanTier::Scalar).resolve().unwrap().tier(),
            Some(ScanTier::Scalar)
        );
        assert_eq!(ScanMode::Auto.resolve().unwrap(), DiffKernel::detect());
    }

    #[test]
    fn test_builder() {
        let config = DiffConfig::default().with_scan(ScanMode::Disabled);
        assert_eq!(config, DiffConfig::new(ScanMode::Disabled));
        assert_eq!(config.kernel().unwrap(), DiffKernel::merge_only());
    }

    #[test]
    fn test_env_value_unset_is_default() {
        assert_eq!(DiffConfig::from_env_value(None).unwrap(), DiffConfig::default());
    }

    #[test]
    fn test_env_value_forces_mode() {
        let config = DiffConfig::from_env_value(Some(OsStr::new("avx512-ymm"))).unwrap();
        assert_eq!(config.scan, ScanMode::Force(ScanTier::Avx512Ymm));

        let config = DiffConfig::from_env_value(Some(OsStr::new("off"))).unwrap();
        assert_eq!(config.kernel().unwrap(), DiffKernel::merge_only());
    }

    #[test]
    fn test_env_value_unknown_mode() {
        let err = DiffConfig::from_env_value(Some(OsStr::new("bogus"))).unwrap_err();
        assert_eq!(err, SortDiffError::UnknownScanMode("bogus".into()));
    }

    #[cfg(unix)]
    #[test]
    fn test_env_value_not_utf8() {
        use std::os::unix::ffi::OsStrExt;

        let err = DiffConfig::from_env_value(Some(OsStr::from_bytes(b"avx\xff"))).unwrap_err();
        assert!(matches!(
            err,
            SortDiffError::InvalidParameter { name, .. } if name == DiffConfig::ENV_VAR
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_round_trip() {
        let config = DiffConfig::new(ScanMode::Force(ScanTier::Sse41));
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"scan":{"force":"sse4.1"}}"#);
        let back: DiffConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
