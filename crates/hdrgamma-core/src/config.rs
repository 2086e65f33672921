//! Correction settings
//!
//! Every field has a default, so an empty JSON object is a valid config.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::curve::{DEFAULT_SDR_WHITE_NITS, HDR_LUT_SIZE, LEGACY_LUT_SIZE};
use crate::math::TARGET_GAMMA;
use crate::profile::{
    DEFAULT_COPYRIGHT, DEFAULT_DESCRIPTION, DEFAULT_PROFILE_FILE_NAME, RedColorantTag,
};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionConfig {
    /// File name the profile is installed under
    #[serde(default = "default_profile_file_name")]
    pub profile_file_name: String,

    #[serde(default = "default_description")]
    pub description: String,

    #[serde(default = "default_copyright")]
    pub copyright: String,

    /// Gamma the desktop is corrected to
    #[serde(default = "default_target_gamma")]
    pub target_gamma: f64,

    #[serde(default = "default_hdr_lut_size")]
    pub hdr_lut_size: usize,

    #[serde(default = "default_legacy_lut_size")]
    pub legacy_lut_size: usize,

    /// Used when the display does not report an SDR white level
    #[serde(default = "default_white_level")]
    pub default_white_level_nits: f64,

    #[serde(default)]
    pub black_level_nits: f64,

    #[serde(default)]
    pub red_colorant_tag: RedColorantTag,

    /// Derive colorants from the reported primaries instead of Rec.709
    #[serde(default = "default_true")]
    pub use_display_primaries: bool,

    #[serde(default = "default_true")]
    pub cache_curves: bool,
}

fn default_profile_file_name() -> String {
    DEFAULT_PROFILE_FILE_NAME.to_string()
}

fn default_description() -> String {
    DEFAULT_DESCRIPTION.to_string()
}

fn default_copyright() -> String {
    DEFAULT_COPYRIGHT.to_string()
}

fn default_target_gamma() -> f64 {
    TARGET_GAMMA
}

fn default_hdr_lut_size() -> usize {
    HDR_LUT_SIZE
}

fn default_legacy_lut_size() -> usize {
    LEGACY_LUT_SIZE
}

fn default_white_level() -> f64 {
    DEFAULT_SDR_WHITE_NITS
}

fn default_true() -> bool {
    true
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            profile_file_name: default_profile_file_name(),
            description: default_description(),
            copyright: default_copyright(),
            target_gamma: default_target_gamma(),
            hdr_lut_size: default_hdr_lut_size(),
            legacy_lut_size: default_legacy_lut_size(),
            default_white_level_nits: default_white_level(),
            black_level_nits: 0.0,
            red_colorant_tag: RedColorantTag::default(),
            use_display_primaries: true,
            cache_curves: true,
        }
    }
}

impl CorrectionConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config = Self::from_json_str(&text).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })?;
        info!(path = %path.display(), profile = %config.profile_file_name, "loaded correction config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.profile_file_name.is_empty() {
            return Err(Error::Config("profile_file_name is empty".to_string()));
        }
        if !self.target_gamma.is_finite() || self.target_gamma <= 0.0 {
            return Err(Error::Config(format!(
                "target_gamma must be positive, got {}",
                self.target_gamma
            )));
        }
        for (name, size) in [
            ("hdr_lut_size", self.hdr_lut_size),
            ("legacy_lut_size", self.legacy_lut_size),
        ] {
            if size < 2 {
                return Err(Error::Config(format!(
                    "{} must be at least 2, got {}",
                    name, size
                )));
            }
        }
        if !self.default_white_level_nits.is_finite() || self.default_white_level_nits <= 0.0 {
            return Err(Error::Config(format!(
                "default_white_level_nits must be positive, got {}",
                self.default_white_level_nits
            )));
        }
        if !self.black_level_nits.is_finite()
            || self.black_level_nits < 0.0
            || self.black_level_nits >= self.default_white_level_nits
        {
            return Err(Error::Config(format!(
                "black_level_nits must be in [0, {}), got {}",
                self.default_white_level_nits, self.black_level_nits
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        let config = CorrectionConfig::from_json_str("{}").unwrap();
        assert_eq!(config, CorrectionConfig::default());
        assert_eq!(config.hdr_lut_size, 4096);
        assert_eq!(config.legacy_lut_size, 1024);
        assert_eq!(config.red_colorant_tag, RedColorantTag::Legacy);
    }

    #[test]
    fn test_partial_override() {
        let config = CorrectionConfig::from_json_str(
            r#"{ "hdr_lut_size": 1024, "red_colorant_tag": "conventional" }"#,
        )
        .unwrap();
        assert_eq!(config.hdr_lut_size, 1024);
        assert_eq!(config.red_colorant_tag, RedColorantTag::Conventional);
        assert_eq!(config.target_gamma, 2.2);
    }

    #[test]
    fn test_rejects_invalid() {
        for json in [
            r#"{ "hdr_lut_size": 1 }"#,
            r#"{ "target_gamma": 0.0 }"#,
            r#"{ "black_level_nits": -1.0 }"#,
            r#"{ "default_white_level_nits": 0.0 }"#,
            r#"{ "profile_file_name": "" }"#,
            r#"{ "red_colorant_tag": "typo" }"#,
            "not json",
        ] {
            let err = CorrectionConfig::from_json_str(json).unwrap_err();
            assert!(matches!(err, Error::Config(_)), "{}: {}", json, err);
        }
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "profile_file_name": "custom.icm" }"#).unwrap();
        let config = CorrectionConfig::load(&path).unwrap();
        assert_eq!(config.profile_file_name, "custom.icm");

        assert!(CorrectionConfig::load(&dir.path().join("missing.json")).is_err());
    }
}
