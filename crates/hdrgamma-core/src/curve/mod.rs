//! Calibration curves
//!
//! A [`TransferCurve`] is a 1D lookup table sampled on a uniform grid over
//! `[0,1]`. The builders in [`builder`] produce the regamma curves embedded in
//! the MHC2 tag; [`cache`] memoizes them per display setting.

pub mod builder;
pub mod cache;

pub use builder::{
    CurveRequest, DEFAULT_SDR_WHITE_NITS, HDR_LUT_SIZE, HdrCurveParams, LEGACY_LUT_SIZE,
    hdr_curve, legacy_curve, legacy_curve_with_gamma,
};
pub use cache::CurveCache;

use crate::error::{Error, Result};

/// Which correction a curve implements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurveKind {
    /// SDR desktop: sRGB-encoded signal re-encoded for a gamma 2.2 display
    Legacy,
    /// HDR desktop: PQ signal, correcting only the range below SDR white
    HdrAware,
}

/// An immutable, monotonically non-decreasing lookup table
#[derive(Debug, Clone, PartialEq)]
pub struct TransferCurve {
    samples: Vec<f64>,
}

impl TransferCurve {
    /// Minimum number of samples (the grid divisor is `len - 1`)
    pub const MIN_LEN: usize = 2;

    /// Wrap caller-supplied samples
    ///
    /// Rejects tables shorter than two entries, non-finite samples and any
    /// local decrease.
    pub fn new(samples: Vec<f64>) -> Result<Self> {
        if samples.len() < Self::MIN_LEN {
            return Err(Error::InvalidInput(format!(
                "curve needs at least {} samples, got {}",
                Self::MIN_LEN,
                samples.len()
            )));
        }
        if let Some(i) = samples.iter().position(|v| !v.is_finite()) {
            return Err(Error::InvalidInput(format!(
                "curve sample {} is not finite",
                i
            )));
        }
        if let Some(i) = first_decrease(&samples) {
            return Err(Error::InvalidInput(format!(
                "curve decreases at sample {}: {} < {}",
                i,
                samples[i],
                samples[i - 1]
            )));
        }
        Ok(Self { samples })
    }

    /// Built by this crate's generators, which are non-decreasing by construction
    pub(crate) fn from_generated(samples: Vec<f64>) -> Self {
        debug_assert!(samples.len() >= Self::MIN_LEN);
        debug_assert!(first_decrease(&samples).is_none());
        Self { samples }
    }

    /// Straight ramp from 0 to 1
    pub fn identity(size: usize) -> Result<Self> {
        if size < Self::MIN_LEN {
            return Err(Error::InvalidInput(format!(
                "curve needs at least {} samples, got {}",
                Self::MIN_LEN,
                size
            )));
        }
        let last = (size - 1) as f64;
        Ok(Self::from_generated(
            (0..size).map(|i| i as f64 / last).collect(),
        ))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[inline]
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// True if no sample is smaller than its predecessor
    pub fn is_monotonic(&self) -> bool {
        first_decrease(&self.samples).is_none()
    }

    /// Evaluate at `x` in `[0,1]` with linear interpolation
    pub fn eval(&self, x: f64) -> f64 {
        let x = x.clamp(0.0, 1.0);
        let last = self.samples.len() - 1;
        let pos = x * last as f64;
        let idx = pos.floor() as usize;

        if idx >= last {
            return self.samples[last];
        }

        let frac = pos - idx as f64;
        let v0 = self.samples[idx];
        let v1 = self.samples[idx + 1];
        v0 + frac * (v1 - v0)
    }
}

fn first_decrease(samples: &[f64]) -> Option<usize> {
    samples
        .windows(2)
        .position(|w| w[1] < w[0])
        .map(|i| i + 1)
}
