//! Big-endian byte buffer for profile assembly

use super::IccError;
use super::types::{S15Fixed16, TagSignature, TypeSignature, XyzNumber};
use crate::color::Xyz;

/// Growable buffer; every multi-byte write is big-endian
#[derive(Debug, Clone, Default)]
pub struct IccWriter {
    buf: Vec<u8>,
}

impl IccWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_s15f16(&mut self, value: f64) -> Result<(), IccError> {
        let fixed = S15Fixed16::try_from_f64(value)?;
        self.buf.extend_from_slice(&fixed.to_be_bytes());
        Ok(())
    }

    pub fn write_xyz(&mut self, xyz: &Xyz) -> Result<(), IccError> {
        let number = XyzNumber::try_from_xyz(xyz)?;
        for v in [number.x, number.y, number.z] {
            self.buf.extend_from_slice(&v.to_be_bytes());
        }
        Ok(())
    }

    pub fn write_signature(&mut self, sig: [u8; 4]) {
        self.buf.extend_from_slice(&sig);
    }

    pub fn write_tag_signature(&mut self, sig: TagSignature) {
        self.write_signature(sig.to_bytes());
    }

    pub fn write_type_signature(&mut self, sig: TypeSignature) {
        self.write_signature(sig.to_bytes());
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_zeros(&mut self, count: usize) {
        self.buf.resize(self.buf.len() + count, 0);
    }

    /// Zero-fill up to the next multiple of four
    pub fn pad_to_4(&mut self) {
        let rem = self.buf.len() % 4;
        if rem != 0 {
            self.write_zeros(4 - rem);
        }
    }

    /// Overwrite a u32 already written at `offset`
    pub fn patch_u32(&mut self, offset: usize, value: u32) -> Result<(), IccError> {
        let len = self.buf.len();
        let slot = self
            .buf
            .get_mut(offset..offset.saturating_add(4))
            .ok_or_else(|| {
                IccError::LayoutInvariant(format!(
                    "patch at {} past end of {}-byte buffer",
                    offset, len
                ))
            })?;
        slot.copy_from_slice(&value.to_be_bytes());
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}
