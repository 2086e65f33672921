//! ICC encoding and read-back errors

use thiserror::Error;

use super::types::TagSignature;

/// Errors raised while encoding a profile or reading back its layout
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum IccError {
    /// Caller-supplied data the encoder refuses to coerce
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{channel} curve has {actual} entries, expected {expected}")]
    CurveLengthMismatch {
        channel: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("value {value} does not fit in s15Fixed16")]
    FixedPointOverflow { value: f64 },

    /// An internal layout rule (alignment, overlap, declared size) would break
    #[error("layout invariant violated: {0}")]
    LayoutInvariant(String),

    #[error("profile too small: expected {expected} bytes, got {actual}")]
    TooSmall { expected: usize, actual: usize },

    #[error("invalid profile signature: 0x{0:08X} (expected 'acsp')")]
    InvalidSignature(u32),

    #[error("invalid profile class: 0x{0:08X}")]
    InvalidProfileClass(u32),

    #[error("invalid color space: 0x{0:08X}")]
    InvalidColorSpace(u32),

    #[error("invalid rendering intent: {0}")]
    InvalidRenderingIntent(u32),

    #[error("size mismatch: header says {header_size} bytes, data is {actual_size} bytes")]
    SizeMismatch { header_size: u32, actual_size: usize },

    #[error("tag '{tag}' out of bounds: offset {offset} + size {size} > profile size {profile_size}")]
    TagOutOfBounds {
        tag: TagSignature,
        offset: u32,
        size: u32,
        profile_size: usize,
    },
}
