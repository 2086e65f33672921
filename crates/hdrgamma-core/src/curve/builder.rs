//! Regamma curve generation
//!
//! Two curves are produced, one per desktop mode:
//!
//! - **Legacy** (SDR desktop): the compositor sends sRGB-encoded values; the
//!   curve re-encodes them so a gamma 2.2 display shows what a gamma 2.2
//!   display would have shown for the same content.
//! - **HDR-aware** (HDR desktop): the compositor sends PQ-encoded values with
//!   SDR white pinned at the user's SDR white level. Below that level the
//!   piecewise sRGB decode is replaced by a pure 2.2 power law; above it the
//!   signal passes through untouched so HDR highlights are preserved.

use tracing::debug;

use super::{CurveKind, TransferCurve};
use crate::error::{Error, Result};
use crate::math::transfer::{
    TARGET_GAMMA, gamma_eotf, gamma_inverse_eotf, pq_eotf, pq_inverse_eotf, srgb_eotf,
    srgb_inverse_eotf,
};

/// Table size for the SDR-desktop curve
pub const LEGACY_LUT_SIZE: usize = 1024;

/// Table size for the HDR-desktop curve
pub const HDR_LUT_SIZE: usize = 4096;

/// SDR white level assumed when the display does not report one
pub const DEFAULT_SDR_WHITE_NITS: f64 = 200.0;

/// Decoded luminance at or below this maps straight to zero
const NEAR_BLACK_NITS: f64 = 1e-4;

/// Inputs of the HDR-aware curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HdrCurveParams {
    pub size: usize,
    /// SDR reference white in nits
    pub white_level_nits: f64,
    pub black_level_nits: f64,
    pub gamma: f64,
}

impl HdrCurveParams {
    pub fn new(white_level_nits: f64) -> Self {
        Self {
            white_level_nits,
            ..Self::default()
        }
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn with_black_level(mut self, black_level_nits: f64) -> Self {
        self.black_level_nits = black_level_nits;
        self
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_size(self.size)?;
        check_gamma(self.gamma)?;
        if !self.black_level_nits.is_finite() || self.black_level_nits < 0.0 {
            return Err(Error::InvalidInput(format!(
                "black level must be finite and non-negative, got {}",
                self.black_level_nits
            )));
        }
        if !self.white_level_nits.is_finite() || self.white_level_nits <= self.black_level_nits {
            return Err(Error::InvalidInput(format!(
                "white level must be finite and above the black level ({}), got {}",
                self.black_level_nits, self.white_level_nits
            )));
        }
        Ok(())
    }
}

impl Default for HdrCurveParams {
    fn default() -> Self {
        Self {
            size: HDR_LUT_SIZE,
            white_level_nits: DEFAULT_SDR_WHITE_NITS,
            black_level_nits: 0.0,
            gamma: TARGET_GAMMA,
        }
    }
}

/// A fully specified curve, usable as a build recipe and a cache key source
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurveRequest {
    Legacy { size: usize, gamma: f64 },
    HdrAware(HdrCurveParams),
}

impl CurveRequest {
    pub fn legacy() -> Self {
        Self::Legacy {
            size: LEGACY_LUT_SIZE,
            gamma: TARGET_GAMMA,
        }
    }

    pub fn kind(&self) -> CurveKind {
        match self {
            Self::Legacy { .. } => CurveKind::Legacy,
            Self::HdrAware(_) => CurveKind::HdrAware,
        }
    }

    pub fn size(&self) -> usize {
        match self {
            Self::Legacy { size, .. } => *size,
            Self::HdrAware(params) => params.size,
        }
    }

    pub fn build(&self) -> Result<TransferCurve> {
        match self {
            Self::Legacy { size, gamma } => legacy_curve_with_gamma(*size, *gamma),
            Self::HdrAware(params) => hdr_curve(params),
        }
    }
}

/// SDR-desktop curve with the standard 2.2 target
pub fn legacy_curve(size: usize) -> Result<TransferCurve> {
    legacy_curve_with_gamma(size, TARGET_GAMMA)
}

/// `table[i] = gamma_inverse(srgb_eotf(i / (N-1)), gamma)`
pub fn legacy_curve_with_gamma(size: usize, gamma: f64) -> Result<TransferCurve> {
    check_size(size)?;
    check_gamma(gamma)?;

    let last = (size - 1) as f64;
    let samples: Vec<f64> = (0..size)
        .map(|i| gamma_inverse_eotf(srgb_eotf(i as f64 / last), gamma))
        .collect();

    debug!(kind = "legacy", size, gamma, "generated regamma curve");
    Ok(TransferCurve::from_generated(samples))
}

/// HDR-desktop curve, PQ signal in and out
pub fn hdr_curve(params: &HdrCurveParams) -> Result<TransferCurve> {
    params.validate()?;

    let HdrCurveParams {
        size,
        white_level_nits: white,
        black_level_nits: black,
        gamma,
    } = *params;

    let last = (size - 1) as f64;
    let mut passthrough = 0usize;
    let samples: Vec<f64> = (0..size)
        .map(|i| {
            let signal = i as f64 / last;
            let nits = pq_eotf(signal);

            if nits <= NEAR_BLACK_NITS {
                return 0.0;
            }
            if nits > white {
                passthrough += 1;
                return signal;
            }

            let sdr = srgb_inverse_eotf(nits / white);
            let corrected = (white - black) * gamma_eotf(sdr, gamma) + black;
            pq_inverse_eotf(corrected)
        })
        .collect();

    debug!(
        kind = "hdr",
        size,
        white_level_nits = white,
        black_level_nits = black,
        passthrough,
        "generated regamma curve"
    );
    Ok(TransferCurve::from_generated(samples))
}

fn check_size(size: usize) -> Result<()> {
    if size < TransferCurve::MIN_LEN {
        return Err(Error::InvalidInput(format!(
            "table size must be at least {}, got {}",
            TransferCurve::MIN_LEN,
            size
        )));
    }
    Ok(())
}

fn check_gamma(gamma: f64) -> Result<()> {
    if !gamma.is_finite() || gamma <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "gamma must be finite and positive, got {}",
            gamma
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-6;

    #[test]
    fn test_legacy_endpoints() {
        let curve = legacy_curve(LEGACY_LUT_SIZE).unwrap();
        assert_eq!(curve.len(), LEGACY_LUT_SIZE);
        assert_eq!(curve.samples()[0], 0.0);
        assert!((curve.samples()[LEGACY_LUT_SIZE - 1] - 1.0).abs() < EPSILON);
        assert!(curve.is_monotonic());
    }

    #[test]
    fn test_legacy_lifts_shadows() {
        // sRGB decodes brighter than 2.2 near black, so the regamma raises the
        // signal there to reproduce the sRGB light level on a 2.2 display.
        let curve = legacy_curve(LEGACY_LUT_SIZE).unwrap();
        let x = 0.02;
        let expected = gamma_inverse_eotf(srgb_eotf(x), 2.2);
        assert!((curve.eval(x) - expected).abs() < 1e-4);
        assert!(curve.eval(x) > x);
    }

    #[test]
    fn test_legacy_small_sizes() {
        let curve = legacy_curve(2).unwrap();
        assert_eq!(curve.samples()[0], 0.0);
        assert!((curve.samples()[1] - 1.0).abs() < EPSILON);
        assert!(legacy_curve(1).is_err());
        assert!(legacy_curve(0).is_err());
    }

    #[test]
    fn test_hdr_passthrough_above_white() {
        let params = HdrCurveParams::new(200.0);
        let curve = hdr_curve(&params).unwrap();
        let last = (HDR_LUT_SIZE - 1) as f64;

        let mut checked = 0;
        for (i, &value) in curve.samples().iter().enumerate() {
            let signal = i as f64 / last;
            if pq_eotf(signal) > 200.0 {
                assert_eq!(value, signal, "sample {} modified above white", i);
                checked += 1;
            }
        }
        assert!(checked > 1000, "only {} samples above white", checked);
    }

    #[test]
    fn test_hdr_monotonic_through_knee() {
        for white in [80.0, 120.0, 200.0, 300.0, 480.0] {
            for black in [0.0, 0.1, 0.5] {
                let params = HdrCurveParams::new(white).with_black_level(black);
                let curve = hdr_curve(&params).unwrap();
                assert!(
                    curve.is_monotonic(),
                    "white {} black {} not monotonic",
                    white,
                    black
                );
            }
        }
    }

    #[test]
    fn test_hdr_white_maps_to_white() {
        // At SDR white the 2.2 and sRGB decodes agree, so the signal is unchanged.
        let white = 200.0;
        let curve = hdr_curve(&HdrCurveParams::new(white)).unwrap();
        let signal = pq_inverse_eotf(white);
        assert!((curve.eval(signal) - signal).abs() < 1e-3);
    }

    #[test]
    fn test_hdr_near_black_is_zero() {
        let curve = hdr_curve(&HdrCurveParams::new(200.0)).unwrap();
        assert_eq!(curve.samples()[0], 0.0);
        assert_eq!(curve.samples()[1], 0.0);
    }

    #[test]
    fn test_hdr_rejects_bad_levels() {
        assert!(hdr_curve(&HdrCurveParams::new(0.0)).is_err());
        assert!(hdr_curve(&HdrCurveParams::new(f64::NAN)).is_err());
        assert!(hdr_curve(&HdrCurveParams::new(100.0).with_black_level(-1.0)).is_err());
        assert!(hdr_curve(&HdrCurveParams::new(100.0).with_black_level(100.0)).is_err());
        assert!(hdr_curve(&HdrCurveParams::new(100.0).with_size(1)).is_err());
        assert!(hdr_curve(&HdrCurveParams::new(100.0).with_gamma(0.0)).is_err());
    }

    #[test]
    fn test_request_dispatch() {
        let legacy = CurveRequest::legacy();
        assert_eq!(legacy.kind(), CurveKind::Legacy);
        assert_eq!(legacy.size(), LEGACY_LUT_SIZE);
        assert_eq!(legacy.build().unwrap(), legacy_curve(LEGACY_LUT_SIZE).unwrap());

        let hdr = CurveRequest::HdrAware(HdrCurveParams::new(250.0).with_size(512));
        assert_eq!(hdr.kind(), CurveKind::HdrAware);
        assert_eq!(hdr.build().unwrap().len(), 512);
    }
}
