//! ICC profile encoding
//!
//! Writes ICC.1:2022 display profiles carrying the Windows `MHC2`
//! calibration tag, and reads back their layout.
//!
//! # Structure
//!
//! A profile consists of:
//! 1. A 128-byte header
//! 2. A tag directory (u32 count, then 12-byte entries)
//! 3. Tag bodies, each 4-byte aligned, never shared
//!
//! All multi-byte fields are big-endian.

pub mod header;
pub mod tags;

mod error;
mod parser;
mod types;
mod writer;

pub use error::IccError;
pub use header::{ColorSpace, HEADER_SIZE, IccHeader, ProfileClass, ProfileVersion, RenderingIntent};
pub use parser::{ProfileLayout, TAG_ENTRY_SIZE, TAG_TABLE_OFFSET};
pub use tags::{CurveData, Mhc2Data, Mhc2Tag, TagData, TagEntry};
pub use types::{DateTimeNumber, S15Fixed16, TagSignature, TypeSignature, U8Fixed8, XyzNumber};
pub use writer::IccWriter;
