//! Multi-localized Unicode (mluc)
//!
//! One en-US record; the text follows the record table at offset 28.
//!
//! See ICC.1:2022 Section 10.15

use super::{TAG_PREAMBLE_SIZE, build_tag, read_u32};
use crate::icc::error::IccError;
use crate::icc::types::TypeSignature;

const RECORD_SIZE: u32 = 12;
const TEXT_OFFSET: u32 = 28;

/// 'mluc' tag with a single en-US record
pub fn mluc_tag(text: &str) -> Result<Vec<u8>, IccError> {
    let utf16: Vec<u16> = text.encode_utf16().collect();
    let byte_len = u32::try_from(utf16.len() * 2)
        .map_err(|_| IccError::InvalidInput(format!("text of {} units too long", utf16.len())))?;

    build_tag(TypeSignature::MLUC, |w| {
        w.write_u32(1); // record count
        w.write_u32(RECORD_SIZE);
        w.write_signature(*b"enUS");
        w.write_u32(byte_len);
        w.write_u32(TEXT_OFFSET);
        for unit in utf16 {
            w.write_u16(unit);
        }
        Ok(())
    })
}

/// Text of the first record of a 'mluc' tag body
pub fn parse_mluc(data: &[u8]) -> Result<String, IccError> {
    let record_count = read_u32(data, TAG_PREAMBLE_SIZE)?;
    if record_count == 0 {
        return Ok(String::new());
    }

    let record = TAG_PREAMBLE_SIZE + 8;
    let len = read_u32(data, record + 4)? as usize;
    let offset = read_u32(data, record + 8)? as usize;

    let bytes = data
        .get(offset..offset.saturating_add(len))
        .ok_or(IccError::TooSmall {
            expected: offset.saturating_add(len),
            actual: data.len(),
        })?;

    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|c| u16::from_be_bytes([c[0], c[1]]))
        .collect();
    Ok(String::from_utf16_lossy(&units))
}
