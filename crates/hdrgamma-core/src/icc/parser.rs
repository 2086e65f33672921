//! Profile layout read-back
//!
//! Reads the header and tag directory of an encoded profile, bounds-checking
//! every entry. Tag bodies are decoded lazily through [`TagData`].

use super::error::IccError;
use super::header::{HEADER_SIZE, IccHeader};
use super::tags::{TagData, TagEntry};
use super::types::TagSignature;

/// Offset of the first directory entry
pub const TAG_TABLE_OFFSET: usize = HEADER_SIZE + 4;

/// Size of one directory entry
pub const TAG_ENTRY_SIZE: usize = 12;

/// Header and tag directory of a profile
#[derive(Debug, Clone)]
pub struct ProfileLayout<'a> {
    pub header: IccHeader,
    pub tags: Vec<TagEntry>,
    data: &'a [u8],
}

impl<'a> ProfileLayout<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self, IccError> {
        let header = IccHeader::parse(data)?;
        if header.size as usize > data.len() {
            return Err(IccError::SizeMismatch {
                header_size: header.size,
                actual_size: data.len(),
            });
        }

        if data.len() < TAG_TABLE_OFFSET {
            return Err(IccError::TooSmall {
                expected: TAG_TABLE_OFFSET,
                actual: data.len(),
            });
        }
        let be = |i: usize| u32::from_be_bytes([data[i], data[i + 1], data[i + 2], data[i + 3]]);

        let count = be(HEADER_SIZE) as usize;
        let table_end = count
            .checked_mul(TAG_ENTRY_SIZE)
            .and_then(|n| n.checked_add(TAG_TABLE_OFFSET))
            .unwrap_or(usize::MAX);
        if table_end > data.len() {
            return Err(IccError::TooSmall {
                expected: table_end,
                actual: data.len(),
            });
        }

        let mut tags = Vec::with_capacity(count);
        for i in 0..count {
            let base = TAG_TABLE_OFFSET + i * TAG_ENTRY_SIZE;
            let entry = TagEntry {
                signature: TagSignature(be(base)),
                offset: be(base + 4),
                length: be(base + 8),
            };
            if entry.end() > data.len() as u64 {
                return Err(IccError::TagOutOfBounds {
                    tag: entry.signature,
                    offset: entry.offset,
                    size: entry.length,
                    profile_size: data.len(),
                });
            }
            tags.push(entry);
        }

        Ok(Self { header, tags, data })
    }

    pub fn find(&self, signature: TagSignature) -> Option<&TagEntry> {
        self.tags.iter().find(|e| e.signature == signature)
    }

    pub fn signatures(&self) -> impl Iterator<Item = TagSignature> + '_ {
        self.tags.iter().map(|e| e.signature)
    }

    /// Raw bytes of a tag, padding included
    pub fn tag_bytes(&self, signature: TagSignature) -> Option<&'a [u8]> {
        let entry = self.find(signature)?;
        let start = entry.offset as usize;
        self.data.get(start..start + entry.length as usize)
    }

    /// Decode a tag body; `Ok(None)` if the tag is absent
    pub fn tag(&self, signature: TagSignature) -> Result<Option<TagData>, IccError> {
        self.tag_bytes(signature).map(TagData::parse).transpose()
    }

    /// Verify the structural rules every encoded profile must satisfy
    ///
    /// Declared size equals actual size, tag bodies start after the
    /// directory, are 4-byte aligned, have padded lengths and do not overlap.
    pub fn check_layout(&self) -> Result<(), IccError> {
        if self.header.size as usize != self.data.len() {
            return Err(IccError::LayoutInvariant(format!(
                "header declares {} bytes, profile is {}",
                self.header.size,
                self.data.len()
            )));
        }

        let data_start = (TAG_TABLE_OFFSET + self.tags.len() * TAG_ENTRY_SIZE) as u64;
        let mut sorted: Vec<&TagEntry> = self.tags.iter().collect();
        sorted.sort_by_key(|e| e.offset);

        let mut prev_end = data_start;
        for entry in sorted {
            if entry.offset % 4 != 0 || entry.length % 4 != 0 {
                return Err(IccError::LayoutInvariant(format!(
                    "tag '{}' at {} with length {} is not 4-byte aligned",
                    entry.signature, entry.offset, entry.length
                )));
            }
            if (entry.offset as u64) < prev_end {
                return Err(IccError::LayoutInvariant(format!(
                    "tag '{}' at {} overlaps data ending at {}",
                    entry.signature, entry.offset, prev_end
                )));
            }
            prev_end = entry.end();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icc::header::{ProfileClass, ProfileVersion};
    use crate::icc::types::DateTimeNumber;
    use crate::icc::writer::IccWriter;

    /// Header plus a directory of `(sig, offset, length)` and `body_len` zero bytes
    fn synthetic(entries: &[([u8; 4], u32, u32)], body_len: usize) -> Vec<u8> {
        let mut w = IccWriter::new();
        IccHeader::new(
            ProfileClass::Display,
            ProfileVersion::V4_3,
            DateTimeNumber::default(),
        )
        .write(&mut w)
        .unwrap();
        w.write_u32(entries.len() as u32);
        for (sig, offset, length) in entries {
            w.write_signature(*sig);
            w.write_u32(*offset);
            w.write_u32(*length);
        }
        w.write_zeros(body_len);
        let len = w.len() as u32;
        w.patch_u32(0, len).unwrap();
        w.into_bytes()
    }

    #[test]
    fn test_parse_directory() {
        // 128 + 4 + 2*12 = 156
        let bytes = synthetic(&[(*b"desc", 156, 8), (*b"wtpt", 164, 20)], 28);
        let layout = ProfileLayout::parse(&bytes).unwrap();
        assert_eq!(layout.tags.len(), 2);
        assert_eq!(layout.find(TagSignature::MEDIA_WHITE).unwrap().offset, 164);
        assert_eq!(layout.tag_bytes(TagSignature::PROFILE_DESC).unwrap().len(), 8);
        assert!(layout.find(TagSignature::MHC2).is_none());
        layout.check_layout().unwrap();
    }

    #[test]
    fn test_out_of_bounds_tag() {
        let bytes = synthetic(&[(*b"desc", 144, 400)], 12);
        assert!(matches!(
            ProfileLayout::parse(&bytes),
            Err(IccError::TagOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_truncated_directory() {
        let mut bytes = synthetic(&[], 0);
        bytes[128..132].copy_from_slice(&1000u32.to_be_bytes());
        assert!(matches!(
            ProfileLayout::parse(&bytes),
            Err(IccError::TooSmall { .. })
        ));
    }

    #[test]
    fn test_check_layout_detects_overlap() {
        let bytes = synthetic(&[(*b"desc", 156, 12), (*b"cprt", 164, 12)], 24);
        let layout = ProfileLayout::parse(&bytes).unwrap();
        assert!(matches!(
            layout.check_layout(),
            Err(IccError::LayoutInvariant(_))
        ));
    }

    #[test]
    fn test_check_layout_detects_misalignment() {
        let bytes = synthetic(&[(*b"desc", 146, 8)], 16);
        let layout = ProfileLayout::parse(&bytes).unwrap();
        assert!(layout.check_layout().is_err());
    }

    #[test]
    fn test_size_mismatch() {
        let mut bytes = synthetic(&[], 0);
        bytes[0..4].copy_from_slice(&4096u32.to_be_bytes());
        assert!(matches!(
            ProfileLayout::parse(&bytes),
            Err(IccError::SizeMismatch { .. })
        ));
    }
}
