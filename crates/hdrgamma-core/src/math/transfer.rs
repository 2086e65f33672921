//! Transfer functions (EOTF and inverse EOTF)
//!
//! This module provides:
//! - sRGB (IEC 61966-2-1) piecewise EOTF and its inverse
//! - Pure power-law gamma
//! - PQ (SMPTE ST 2084), mapping signal to absolute luminance in nits
//!
//! All functions are pure. sRGB and gamma work on normalized `[0,1]` values;
//! the PQ EOTF returns nits in `[0, 10000]` and its inverse takes nits.

#![allow(clippy::excessive_precision)]

// ============================================================================
// sRGB (IEC 61966-2-1)
// ============================================================================

/// Encoded value below which the sRGB EOTF is linear
pub const SRGB_LINEAR_THRESHOLD: f64 = 0.04045;
/// Linear value below which the inverse sRGB EOTF is linear
pub const SRGB_INVERSE_LINEAR_THRESHOLD: f64 = 0.0031308;
const SRGB_LINEAR_SCALE: f64 = 12.92;
const SRGB_GAMMA_OFFSET: f64 = 0.055;
const SRGB_GAMMA_BASE: f64 = 1.055;
const SRGB_GAMMA_EXPONENT: f64 = 2.4;

/// sRGB EOTF: encoded `[0,1]` → linear `[0,1]`
#[inline]
pub fn srgb_eotf(encoded: f64) -> f64 {
    if encoded <= SRGB_LINEAR_THRESHOLD {
        encoded / SRGB_LINEAR_SCALE
    } else {
        ((encoded + SRGB_GAMMA_OFFSET) / SRGB_GAMMA_BASE).powf(SRGB_GAMMA_EXPONENT)
    }
}

/// Inverse sRGB EOTF: linear `[0,1]` → encoded `[0,1]`
#[inline]
pub fn srgb_inverse_eotf(linear: f64) -> f64 {
    if linear <= SRGB_INVERSE_LINEAR_THRESHOLD {
        linear * SRGB_LINEAR_SCALE
    } else {
        SRGB_GAMMA_BASE * linear.powf(1.0 / SRGB_GAMMA_EXPONENT) - SRGB_GAMMA_OFFSET
    }
}

// ============================================================================
// Pure power gamma
// ============================================================================

/// Gamma the OS should have used for SDR content
pub const TARGET_GAMMA: f64 = 2.2;

/// Power-law EOTF: y = v^gamma
#[inline]
pub fn gamma_eotf(encoded: f64, gamma: f64) -> f64 {
    if encoded <= 0.0 {
        0.0
    } else {
        encoded.powf(gamma)
    }
}

/// Inverse power-law EOTF: v = y^(1/gamma)
#[inline]
pub fn gamma_inverse_eotf(linear: f64, gamma: f64) -> f64 {
    if linear <= 0.0 {
        0.0
    } else {
        linear.powf(1.0 / gamma)
    }
}

// ============================================================================
// PQ (SMPTE ST 2084 / ITU-R BT.2100)
// ============================================================================

/// Peak luminance representable by PQ
pub const PQ_MAX_NITS: f64 = 10000.0;

const PQ_M1: f64 = 2610.0 / 16384.0; // 0.1593017578125
const PQ_M2: f64 = 128.0 * 2523.0 / 4096.0; // 78.84375
const PQ_C1: f64 = 3424.0 / 4096.0; // 0.8359375
const PQ_C2: f64 = 32.0 * 2413.0 / 4096.0; // 18.8515625
const PQ_C3: f64 = 32.0 * 2392.0 / 4096.0; // 18.6875

/// PQ EOTF: signal `[0,1]` → absolute luminance in nits `[0, 10000]`
///
/// Signals at or below 0 (and NaN) give 0 nits; signals at or above 1, or any
/// value whose denominator degenerates, give 10000 nits.
#[inline]
pub fn pq_eotf(signal: f64) -> f64 {
    if signal.is_nan() || signal <= 0.0 {
        return 0.0;
    }
    if signal >= 1.0 {
        return PQ_MAX_NITS;
    }

    let vp = signal.powf(1.0 / PQ_M2);
    let numerator = (vp - PQ_C1).max(0.0);
    let denominator = PQ_C2 - PQ_C3 * vp;

    if denominator <= 0.0 {
        return PQ_MAX_NITS;
    }

    PQ_MAX_NITS * (numerator / denominator).powf(1.0 / PQ_M1)
}

/// Inverse PQ EOTF: absolute luminance in nits → signal `[0,1]`
#[inline]
pub fn pq_inverse_eotf(nits: f64) -> f64 {
    if nits.is_nan() || nits <= 0.0 {
        return 0.0;
    }
    if nits >= PQ_MAX_NITS {
        return 1.0;
    }

    let y = (nits / PQ_MAX_NITS).powf(PQ_M1);
    ((PQ_C1 + PQ_C2 * y) / (1.0 + PQ_C3 * y)).powf(PQ_M2)
}

/// A transfer function selectable at runtime
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransferFunction {
    /// IEC 61966-2-1 piecewise curve
    Srgb,
    /// Pure power law with the given exponent
    Gamma(f64),
    /// SMPTE ST 2084; linear side is absolute nits
    Pq,
}

impl TransferFunction {
    /// Encoded signal → linear light (nits for PQ)
    #[inline]
    pub fn eotf(&self, encoded: f64) -> f64 {
        match self {
            Self::Srgb => srgb_eotf(encoded),
            Self::Gamma(g) => gamma_eotf(encoded, *g),
            Self::Pq => pq_eotf(encoded),
        }
    }

    /// Linear light (nits for PQ) → encoded signal
    #[inline]
    pub fn inverse_eotf(&self, linear: f64) -> f64 {
        match self {
            Self::Srgb => srgb_inverse_eotf(linear),
            Self::Gamma(g) => gamma_inverse_eotf(linear, *g),
            Self::Pq => pq_inverse_eotf(linear),
        }
    }
}
