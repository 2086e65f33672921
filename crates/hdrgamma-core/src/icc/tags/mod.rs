//! ICC tag bodies
//!
//! Every tag body starts with a 4-byte type signature and 4 reserved zero
//! bytes, followed by type-specific data and zero padding to a 4-byte
//! boundary. Only the types a display calibration profile needs are
//! supported: `XYZ `, `curv` (gamma form), `mluc` and the `MHC2` vendor tag.
//!
//! See ICC.1:2022 Section 10.

mod curves;
mod mhc2;
mod text;
mod xyz;

pub use curves::{CurveData, gamma_curve_tag};
pub use mhc2::{MHC2_MATRIX_OFFSET, Mhc2Data, Mhc2Tag};
pub use text::{mluc_tag, parse_mluc};
pub use xyz::{parse_xyz, xyz_tag};

use super::error::IccError;
use super::types::{TagSignature, TypeSignature};
use super::writer::IccWriter;
use crate::color::Xyz;

/// Size of the type signature plus reserved bytes
pub const TAG_PREAMBLE_SIZE: usize = 8;

/// One row of the tag directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagEntry {
    pub signature: TagSignature,
    /// Absolute offset from the start of the profile
    pub offset: u32,
    pub length: u32,
}

impl TagEntry {
    pub fn end(&self) -> u64 {
        self.offset as u64 + self.length as u64
    }
}

/// Encode one tag body: type signature, reserved, payload, padding
pub fn build_tag<F>(type_sig: TypeSignature, write_payload: F) -> Result<Vec<u8>, IccError>
where
    F: FnOnce(&mut IccWriter) -> Result<(), IccError>,
{
    let mut w = IccWriter::new();
    w.write_type_signature(type_sig);
    w.write_zeros(4);
    write_payload(&mut w)?;
    w.pad_to_4();
    Ok(w.into_bytes())
}

/// Decoded tag body, for read-back
#[derive(Debug, Clone, PartialEq)]
pub enum TagData {
    Xyz(Xyz),
    Curve(CurveData),
    Text(String),
    Mhc2(Mhc2Data),
    Unknown { type_sig: u32 },
}

impl TagData {
    /// Parse a tag body starting at its type signature
    pub fn parse(data: &[u8]) -> Result<Self, IccError> {
        if data.len() < TAG_PREAMBLE_SIZE {
            return Err(IccError::TooSmall {
                expected: TAG_PREAMBLE_SIZE,
                actual: data.len(),
            });
        }

        let type_sig = TypeSignature(u32::from_be_bytes([data[0], data[1], data[2], data[3]]));

        match type_sig {
            TypeSignature::XYZ => Ok(Self::Xyz(parse_xyz(data)?)),
            TypeSignature::CURVE => Ok(Self::Curve(CurveData::parse(data)?)),
            TypeSignature::MLUC => Ok(Self::Text(parse_mluc(data)?)),
            TypeSignature::MHC2 => Ok(Self::Mhc2(Mhc2Data::parse(data)?)),
            _ => Ok(Self::Unknown {
                type_sig: type_sig.0,
            }),
        }
    }
}

pub(crate) fn read_u32(data: &[u8], offset: usize) -> Result<u32, IccError> {
    data.get(offset..offset + 4)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or(IccError::TooSmall {
            expected: offset + 4,
            actual: data.len(),
        })
}
