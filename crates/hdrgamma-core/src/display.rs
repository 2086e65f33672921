//! Display characteristics
//!
//! Immutable snapshot of one display as reported by the platform's
//! enumeration layer. Profiles are derived from it; nothing here is mutated
//! after construction.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::color::{Colorants, Primaries};
use crate::{Error, Result};

/// Identifies a display source on an adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DisplayId {
    /// 64-bit adapter LUID, high part in the upper 32 bits
    pub adapter_luid: i64,
    pub source_id: u32,
}

impl DisplayId {
    pub const fn new(adapter_luid: i64, source_id: u32) -> Self {
        Self {
            adapter_luid,
            source_id,
        }
    }

    /// Combine the LUID halves as the platform reports them
    pub fn from_luid_parts(low: u32, high: i32, source_id: u32) -> Self {
        Self {
            adapter_luid: ((high as i64) << 32) | low as i64,
            source_id,
        }
    }
}

impl fmt::Display for DisplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}:{}", self.adapter_luid, self.source_id)
    }
}

/// What the enumeration layer knows about one display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayCharacteristics {
    pub name: String,
    pub id: DisplayId,
    pub hdr_enabled: bool,
    pub bits_per_channel: u32,
    /// Nits
    pub min_luminance: f64,
    pub max_luminance: f64,
    pub max_full_frame_luminance: f64,
    /// Current SDR reference white; zero when unknown
    pub sdr_white_level_nits: f64,
    pub primaries: Option<Primaries>,
}

impl Default for DisplayCharacteristics {
    fn default() -> Self {
        Self {
            name: String::new(),
            id: DisplayId::default(),
            hdr_enabled: false,
            bits_per_channel: 8,
            min_luminance: 0.0,
            max_luminance: 80.0,
            max_full_frame_luminance: 80.0,
            sdr_white_level_nits: 0.0,
            primaries: None,
        }
    }
}

impl DisplayCharacteristics {
    /// Reject snapshots the profile cannot be built from
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("min_luminance", self.min_luminance),
            ("max_luminance", self.max_luminance),
            ("max_full_frame_luminance", self.max_full_frame_luminance),
            ("sdr_white_level_nits", self.sdr_white_level_nits),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(Error::InvalidInput(format!(
                    "{} of display {} is not finite",
                    name, self.id
                )));
            }
            if value < 0.0 {
                return Err(Error::InvalidInput(format!(
                    "{} of display {} is negative ({})",
                    name, self.id, value
                )));
            }
        }
        if self.max_luminance < self.min_luminance {
            return Err(Error::InvalidInput(format!(
                "display {} reports max luminance {} below min {}",
                self.id, self.max_luminance, self.min_luminance
            )));
        }
        Ok(())
    }

    /// SDR white level to correct against, or `fallback` when unreported
    pub fn effective_sdr_white_nits(&self, fallback: f64) -> f64 {
        if self.sdr_white_level_nits.is_finite() && self.sdr_white_level_nits > 0.0 {
            self.sdr_white_level_nits
        } else {
            warn!(
                display = %self.id,
                reported = self.sdr_white_level_nits,
                fallback,
                "SDR white level unavailable, using default"
            );
            fallback
        }
    }

    /// D50 colorants from the reported primaries, Rec.709 if absent or unusable
    pub fn colorants(&self) -> Colorants {
        match self.primaries.as_ref().and_then(Primaries::colorants_d50) {
            Some(c) if c.is_finite() => c,
            _ => Colorants::REC709_D50,
        }
    }
}

/// The OS stores SDR white as a multiple of 80 nits, scaled by 1000
pub mod sdr_white_level {
    const REFERENCE_NITS: f64 = 80.0;
    const SCALE: f64 = 1000.0;

    pub fn raw_to_nits(raw: u32) -> f64 {
        raw as f64 / SCALE * REFERENCE_NITS
    }

    /// Rounded to nearest; negative and non-finite input saturate
    pub fn nits_to_raw(nits: f64) -> u32 {
        (nits / REFERENCE_NITS * SCALE).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Chromaticity;
    use crate::curve::DEFAULT_SDR_WHITE_NITS;

    #[test]
    fn test_display_id_format() {
        let id = DisplayId::new(0x1_0000_abcd, 3);
        assert_eq!(id.to_string(), "000000010000abcd:3");

        let parts = DisplayId::from_luid_parts(0xabcd, 1, 3);
        assert_eq!(parts, id);
    }

    #[test]
    fn test_sdr_white_level_conversion() {
        for (raw, nits) in [(1000, 80.0), (2000, 160.0), (2500, 200.0), (5000, 400.0)] {
            assert!((sdr_white_level::raw_to_nits(raw) - nits).abs() < 1e-9);
            assert_eq!(sdr_white_level::nits_to_raw(nits), raw);
        }
        assert_eq!(sdr_white_level::nits_to_raw(-5.0), 0);
    }

    #[test]
    fn test_validate() {
        let mut display = DisplayCharacteristics::default();
        display.validate().unwrap();

        display.max_luminance = f64::NAN;
        assert!(display.validate().unwrap_err().is_invalid_input());

        display.max_luminance = 10.0;
        display.min_luminance = 20.0;
        assert!(display.validate().is_err());
    }

    #[test]
    fn test_white_level_fallback() {
        let mut display = DisplayCharacteristics::default();
        assert_eq!(
            display.effective_sdr_white_nits(DEFAULT_SDR_WHITE_NITS),
            DEFAULT_SDR_WHITE_NITS
        );
        display.sdr_white_level_nits = 240.0;
        assert_eq!(display.effective_sdr_white_nits(DEFAULT_SDR_WHITE_NITS), 240.0);
    }

    #[test]
    fn test_colorants_fallback() {
        let mut display = DisplayCharacteristics::default();
        assert_eq!(display.colorants(), Colorants::REC709_D50);

        let mut broken = Primaries::REC709;
        broken.green = Chromaticity::new(0.0, 0.0);
        display.primaries = Some(broken);
        assert_eq!(display.colorants(), Colorants::REC709_D50);

        display.primaries = Some(Primaries::REC709);
        let derived = display.colorants();
        assert!(derived.red.approx_eq(&Colorants::REC709_D50.red, 1e-3));
    }

    #[test]
    fn test_json_snapshot() {
        let json = r#"{
            "name": "DELL U2720Q",
            "id": { "adapter_luid": 4660, "source_id": 1 },
            "hdr_enabled": true,
            "max_luminance": 600.0,
            "sdr_white_level_nits": 200.0
        }"#;
        let display: DisplayCharacteristics = serde_json::from_str(json).unwrap();
        assert!(display.hdr_enabled);
        assert_eq!(display.bits_per_channel, 8);
        assert_eq!(display.id.to_string(), "0000000000001234:1");
    }
}
