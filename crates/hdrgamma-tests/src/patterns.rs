//! Display fixtures
//!
//! Snapshots shaped like what the platform enumeration reports, from a plain
//! SDR office monitor to HDR panels with partial information.

use hdrgamma_core::color::Chromaticity;
use hdrgamma_core::{DisplayCharacteristics, DisplayId, Primaries};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Fixture display types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayPattern {
    /// 8-bit SDR monitor, HDR off
    SdrOffice,
    /// HDR on at the default 200 nit SDR white
    HdrDefault,
    /// Bright HDR panel with SDR white turned up
    HdrBright,
    /// HDR on, white level not reported
    HdrNoWhiteLevel,
    /// HDR on with wide-gamut primaries
    HdrWideGamut,
}

impl DisplayPattern {
    pub const ALL: [Self; 5] = [
        Self::SdrOffice,
        Self::HdrDefault,
        Self::HdrBright,
        Self::HdrNoWhiteLevel,
        Self::HdrWideGamut,
    ];
}

/// Display P3 primaries with a D65 white
pub const DISPLAY_P3: Primaries = Primaries {
    red: Chromaticity::new(0.680, 0.320),
    green: Chromaticity::new(0.265, 0.690),
    blue: Chromaticity::new(0.150, 0.060),
    white: Chromaticity::new(0.3127, 0.3290),
};

/// Build the fixture snapshot for `pattern`
pub fn display_for(pattern: DisplayPattern) -> DisplayCharacteristics {
    let base = DisplayCharacteristics {
        name: format!("{:?}", pattern),
        id: DisplayId::new(0x0001_2345, pattern as u32),
        ..Default::default()
    };

    match pattern {
        DisplayPattern::SdrOffice => DisplayCharacteristics {
            max_luminance: 250.0,
            max_full_frame_luminance: 250.0,
            min_luminance: 0.3,
            ..base
        },
        DisplayPattern::HdrDefault => DisplayCharacteristics {
            hdr_enabled: true,
            bits_per_channel: 10,
            min_luminance: 0.05,
            max_luminance: 600.0,
            max_full_frame_luminance: 350.0,
            sdr_white_level_nits: 200.0,
            ..base
        },
        DisplayPattern::HdrBright => DisplayCharacteristics {
            hdr_enabled: true,
            bits_per_channel: 10,
            min_luminance: 0.01,
            max_luminance: 1400.0,
            max_full_frame_luminance: 600.0,
            sdr_white_level_nits: 480.0,
            ..base
        },
        DisplayPattern::HdrNoWhiteLevel => DisplayCharacteristics {
            hdr_enabled: true,
            bits_per_channel: 10,
            max_luminance: 400.0,
            max_full_frame_luminance: 400.0,
            ..base
        },
        DisplayPattern::HdrWideGamut => DisplayCharacteristics {
            hdr_enabled: true,
            bits_per_channel: 12,
            min_luminance: 0.0005,
            max_luminance: 1000.0,
            max_full_frame_luminance: 250.0,
            sdr_white_level_nits: 280.0,
            primaries: Some(DISPLAY_P3),
            ..base
        },
    }
}

/// Seeded random snapshots that always pass validation
pub fn random_displays(seed: u64, count: usize) -> Vec<DisplayCharacteristics> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let min_luminance = rng.gen_range(0.0..0.5);
            let max_luminance = rng.gen_range(100.0..2000.0);
            DisplayCharacteristics {
                name: format!("random-{}", i),
                id: DisplayId::new(rng.r#gen::<u32>() as i64, i as u32),
                hdr_enabled: rng.gen_bool(0.7),
                bits_per_channel: *[8u32, 10, 12].choose(&mut rng).unwrap_or(&8),
                min_luminance,
                max_luminance,
                max_full_frame_luminance: rng.gen_range(min_luminance..=max_luminance),
                sdr_white_level_nits: if rng.gen_bool(0.9) {
                    rng.gen_range(80.0..480.0)
                } else {
                    0.0
                },
                primaries: None,
            }
        })
        .collect()
}
