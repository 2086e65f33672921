//! Color types
//!
//! This module provides:
//! - CIE XYZ
//! - Standard white points
//! - Display primaries and the D50 colorants derived from them

pub mod primaries;
pub mod white_point;
pub mod xyz;

pub use primaries::{Chromaticity, Colorants, Primaries};
pub use white_point::{D50, D65, WhitePoint};
pub use xyz::Xyz;
