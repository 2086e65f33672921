//! Curve Tag Type (curv)
//!
//! Tone reproduction curves. Calibration profiles only emit the single-gamma
//! form; the full calibration curves live in the MHC2 tag instead.
//!
//! See ICC.1:2022 Section 10.6

use super::{TAG_PREAMBLE_SIZE, build_tag, read_u32};
use crate::icc::error::IccError;
use crate::icc::types::{TypeSignature, U8Fixed8};

/// Curve tag data (curv type)
#[derive(Debug, Clone, PartialEq)]
pub enum CurveData {
    /// Identity curve (count = 0)
    Identity,
    /// Simple gamma (count = 1, value is u8Fixed8)
    Gamma(f64),
    /// Lookup table (count > 1, values are u16)
    Table(Vec<u16>),
}

impl CurveData {
    /// Parse a full 'curv' tag body
    pub fn parse(data: &[u8]) -> Result<Self, IccError> {
        let count = read_u32(data, TAG_PREAMBLE_SIZE)? as usize;
        let values = &data[TAG_PREAMBLE_SIZE + 4..];

        let required_len = count.saturating_mul(2);
        if values.len() < required_len {
            return Err(IccError::TooSmall {
                expected: TAG_PREAMBLE_SIZE + 4 + required_len,
                actual: data.len(),
            });
        }

        let entries: Vec<u16> = values[..required_len]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();

        Ok(match count {
            0 => Self::Identity,
            1 => Self::Gamma(U8Fixed8(entries[0]).to_f64()),
            _ => Self::Table(entries),
        })
    }

    /// Evaluate at `x` in `[0,1]`
    pub fn eval(&self, x: f64) -> f64 {
        let x = x.clamp(0.0, 1.0);

        match self {
            Self::Identity => x,
            Self::Gamma(g) => x.powf(*g),
            Self::Table(table) => {
                let last = table.len() - 1;
                let pos = x * last as f64;
                let idx = (pos.floor() as usize).min(last - 1);
                let frac = pos - idx as f64;
                let v0 = table[idx] as f64 / 65535.0;
                let v1 = table[idx + 1] as f64 / 65535.0;
                v0 + frac * (v1 - v0)
            }
        }
    }
}

/// 16-byte 'curv' tag: count 1, u8Fixed8 gamma, 2 reserved bytes
pub fn gamma_curve_tag(gamma: f64) -> Result<Vec<u8>, IccError> {
    let fixed = U8Fixed8::try_from_f64(gamma)?;
    build_tag(TypeSignature::CURVE, |w| {
        w.write_u32(1);
        w.write_u16(fixed.0);
        w.write_u16(0);
        Ok(())
    })
}
