//! MHC2 hardware calibration tag
//!
//! Consumed by the Windows display pipeline, not by colour management. Layout
//! (offsets from the start of the tag):
//!
//! | Offset | Field                                   |
//! |--------|-----------------------------------------|
//! | 0      | 'MHC2', 4 reserved bytes                |
//! | 8      | u32 LUT entry count N                   |
//! | 12     | s15Fixed16 min luminance (nits)         |
//! | 16     | s15Fixed16 max luminance (nits)         |
//! | 20     | u32 matrix offset (36)                  |
//! | 24..36 | u32 offsets of the red, green, blue LUT |
//! | 36     | 3×4 matrix, 12 × s15Fixed16, row major  |
//! | 84     | red, green, blue LUTs ('sf32' elements) |
//!
//! Each LUT element is 'sf32', 4 reserved bytes, then N × s15Fixed16.

use super::{TAG_PREAMBLE_SIZE, build_tag, read_u32};
use crate::curve::TransferCurve;
use crate::icc::error::IccError;
use crate::icc::types::{S15Fixed16, TypeSignature};
use crate::math::CalibrationMatrix;

/// Offset of the matrix from the start of the tag
pub const MHC2_MATRIX_OFFSET: u32 = 36;

const MATRIX_SIZE: u32 = (CalibrationMatrix::LEN * 4) as u32;
const CURVES_OFFSET: u32 = MHC2_MATRIX_OFFSET + MATRIX_SIZE;

/// Inputs of one MHC2 tag
#[derive(Debug, Clone, Copy)]
pub struct Mhc2Tag<'a> {
    pub min_luminance: f64,
    pub max_luminance: f64,
    pub matrix: &'a CalibrationMatrix,
    pub red: &'a TransferCurve,
    pub green: &'a TransferCurve,
    pub blue: &'a TransferCurve,
}

impl Mhc2Tag<'_> {
    /// Check everything the encoding depends on
    pub fn validate(&self) -> Result<(), IccError> {
        let expected = self.red.len();
        if expected < TransferCurve::MIN_LEN {
            return Err(IccError::InvalidInput(format!(
                "calibration curves need at least {} entries, got {}",
                TransferCurve::MIN_LEN,
                expected
            )));
        }
        for (channel, curve) in [("green", self.green), ("blue", self.blue)] {
            if curve.len() != expected {
                return Err(IccError::CurveLengthMismatch {
                    channel,
                    expected,
                    actual: curve.len(),
                });
            }
        }
        if !self.matrix.is_finite() {
            return Err(IccError::InvalidInput(
                "calibration matrix has non-finite coefficients".to_string(),
            ));
        }
        for (name, value) in [("min", self.min_luminance), ("max", self.max_luminance)] {
            if !value.is_finite() || value < 0.0 {
                return Err(IccError::InvalidInput(format!(
                    "{} luminance must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    pub fn entry_count(&self) -> usize {
        self.red.len()
    }

    /// Encoded size, excluding padding (always a multiple of four)
    pub fn encoded_len(&self) -> usize {
        CURVES_OFFSET as usize + 3 * curve_element_len(self.entry_count())
    }

    pub fn encode(&self) -> Result<Vec<u8>, IccError> {
        self.validate()?;

        let n = self.entry_count();
        let count = u32::try_from(n)
            .map_err(|_| IccError::InvalidInput(format!("{} LUT entries is too many", n)))?;
        let element = u32::try_from(curve_element_len(n))
            .map_err(|_| IccError::InvalidInput(format!("{} LUT entries is too many", n)))?;

        let tag = build_tag(TypeSignature::MHC2, |w| {
            w.write_u32(count);
            w.write_s15f16(self.min_luminance)?;
            w.write_s15f16(self.max_luminance)?;
            w.write_u32(MHC2_MATRIX_OFFSET);
            for i in 0..3 {
                w.write_u32(CURVES_OFFSET + i * element);
            }

            if w.len() != MHC2_MATRIX_OFFSET as usize {
                return Err(IccError::LayoutInvariant(format!(
                    "MHC2 matrix at {}, expected {}",
                    w.len(),
                    MHC2_MATRIX_OFFSET
                )));
            }
            for value in self.matrix.to_row_major() {
                w.write_s15f16(value)?;
            }

            for curve in [self.red, self.green, self.blue] {
                w.write_type_signature(TypeSignature::SF32);
                w.write_zeros(4);
                for &value in curve.samples() {
                    w.write_s15f16(value)?;
                }
            }
            Ok(())
        })?;

        if tag.len() != self.encoded_len() {
            return Err(IccError::LayoutInvariant(format!(
                "MHC2 tag is {} bytes, expected {}",
                tag.len(),
                self.encoded_len()
            )));
        }
        Ok(tag)
    }
}

fn curve_element_len(entries: usize) -> usize {
    TAG_PREAMBLE_SIZE + entries * 4
}

/// Decoded MHC2 tag, for read-back
#[derive(Debug, Clone, PartialEq)]
pub struct Mhc2Data {
    pub min_luminance: f64,
    pub max_luminance: f64,
    pub matrix: CalibrationMatrix,
    pub red: Vec<f64>,
    pub green: Vec<f64>,
    pub blue: Vec<f64>,
}

impl Mhc2Data {
    /// Parse a full MHC2 tag body
    pub fn parse(data: &[u8]) -> Result<Self, IccError> {
        let count = read_u32(data, 8)? as usize;
        let s15 = |offset: usize| read_u32(data, offset).map(|v| S15Fixed16(v as i32).to_f64());

        let min_luminance = s15(12)?;
        let max_luminance = s15(16)?;
        let matrix_offset = read_u32(data, 20)? as usize;

        let mut values = Vec::with_capacity(CalibrationMatrix::LEN);
        for i in 0..CalibrationMatrix::LEN {
            values.push(s15(matrix_offset + i * 4)?);
        }
        let matrix = CalibrationMatrix::from_row_major(&values)
            .map_err(|e| IccError::InvalidInput(e.to_string()))?;

        let mut curves = Vec::with_capacity(3);
        for channel in 0..3 {
            let offset = read_u32(data, 24 + channel * 4)? as usize;
            let sig = read_u32(data, offset)?;
            if sig != TypeSignature::SF32.0 {
                return Err(IccError::InvalidInput(format!(
                    "MHC2 curve {} has type 0x{:08X}, expected 'sf32'",
                    channel, sig
                )));
            }
            let start = offset + TAG_PREAMBLE_SIZE;
            let curve = (0..count)
                .map(|i| s15(start + i * 4))
                .collect::<Result<Vec<_>, _>>()?;
            curves.push(curve);
        }
        let blue = curves.pop().unwrap_or_default();
        let green = curves.pop().unwrap_or_default();
        let red = curves.pop().unwrap_or_default();

        Ok(Self {
            min_luminance,
            max_luminance,
            matrix,
            red,
            green,
            blue,
        })
    }
}
