//! CIE standard white points
//!
//! Specified as XYZ with Y = 1.0.

use crate::color::Xyz;

/// A white point definition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhitePoint {
    /// Name of the illuminant
    pub name: &'static str,
    /// CIE XYZ coordinates (Y normalized to 1.0)
    pub xyz: Xyz,
}

impl WhitePoint {
    pub const fn new(name: &'static str, x: f64, y: f64, z: f64) -> Self {
        Self {
            name,
            xyz: Xyz::new(x, y, z),
        }
    }

    /// A white point from measured chromaticity coordinates
    pub fn from_chromaticity(name: &'static str, x: f64, y: f64) -> Self {
        Self {
            name,
            xyz: Xyz::from_xyy(x, y, 1.0),
        }
    }

    /// Chromaticity coordinates (x, y)
    pub fn chromaticity(&self) -> (f64, f64) {
        let (x, y, _) = self.xyz.to_xyy();
        (x, y)
    }
}

/// CIE D50, the ICC profile connection space illuminant (ICC.1:2022 7.2.16)
pub const D50: WhitePoint = WhitePoint::new("D50", 0.9642, 1.0, 0.8249);

/// CIE D65, the white point of sRGB and nearly every desktop display
pub const D65: WhitePoint = WhitePoint::new("D65", 0.9505, 1.0, 1.0890);
