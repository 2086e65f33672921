//! XYZ Tag Type
//!
//! A single XYZNumber: colorants, media white point, luminance.
//!
//! See ICC.1:2022 Section 10.31

use super::{TAG_PREAMBLE_SIZE, build_tag};
use crate::color::Xyz;
use crate::icc::error::IccError;
use crate::icc::types::{TypeSignature, XyzNumber};

/// 20-byte 'XYZ ' tag
pub fn xyz_tag(xyz: &Xyz) -> Result<Vec<u8>, IccError> {
    build_tag(TypeSignature::XYZ, |w| w.write_xyz(xyz))
}

/// First XYZNumber of an 'XYZ ' tag body
pub fn parse_xyz(data: &[u8]) -> Result<Xyz, IccError> {
    data.get(TAG_PREAMBLE_SIZE..)
        .and_then(XyzNumber::from_bytes)
        .map(|n| n.to_xyz())
        .ok_or(IccError::TooSmall {
            expected: TAG_PREAMBLE_SIZE + 12,
            actual: data.len(),
        })
}
