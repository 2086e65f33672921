//! Display primaries and the colorant tags derived from them
//!
//! The enumeration layer reports primaries as CIE xy chromaticities. The
//! profile needs the XYZ of each primary at full drive, adapted to D50.

use serde::{Deserialize, Serialize};

use crate::color::white_point::{D50, WhitePoint};
use crate::color::Xyz;
use crate::math::{Matrix3x3, bradford_matrix};

/// CIE 1931 xy chromaticity
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Chromaticity {
    pub x: f64,
    pub y: f64,
}

impl Chromaticity {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Inside the unit triangle with a positive y
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.x >= 0.0
            && self.y > 0.0
            && self.x + self.y <= 1.0
    }
}

/// RGB primaries plus white point, as chromaticities
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Primaries {
    pub red: Chromaticity,
    pub green: Chromaticity,
    pub blue: Chromaticity,
    pub white: Chromaticity,
}

impl Primaries {
    /// ITU-R BT.709 / sRGB primaries with a D65 white
    pub const REC709: Self = Self {
        red: Chromaticity::new(0.640, 0.330),
        green: Chromaticity::new(0.300, 0.600),
        blue: Chromaticity::new(0.150, 0.060),
        white: Chromaticity::new(0.3127, 0.3290),
    };

    pub fn is_valid(&self) -> bool {
        [self.red, self.green, self.blue, self.white]
            .iter()
            .all(Chromaticity::is_valid)
    }

    /// RGB → XYZ matrix relative to this set's own white point
    ///
    /// Returns None when the primaries are degenerate (collinear or invalid).
    pub fn rgb_to_xyz(&self) -> Option<Matrix3x3> {
        if !self.is_valid() {
            return None;
        }

        let xyz = |c: &Chromaticity| Xyz::from_xyy(c.x, c.y, 1.0).to_array();
        let primaries = Matrix3x3::from_columns(xyz(&self.red), xyz(&self.green), xyz(&self.blue));
        let white = Xyz::from_xyy(self.white.x, self.white.y, 1.0);

        // Scale each primary so that R=G=B=1 reproduces the white point
        let s = primaries.inverse()?.multiply_vec(white.to_array());
        Some(primaries.multiply(&Matrix3x3::diagonal(s[0], s[1], s[2])))
    }

    /// Colorant XYZ values adapted to the D50 PCS illuminant
    pub fn colorants_d50(&self) -> Option<Colorants> {
        let to_xyz = self.rgb_to_xyz()?;
        let white = WhitePoint::from_chromaticity("display", self.white.x, self.white.y);
        let adapted = bradford_matrix(&white, &D50).multiply(&to_xyz);

        Some(Colorants {
            red: Xyz::from_array(adapted.column(0)),
            green: Xyz::from_array(adapted.column(1)),
            blue: Xyz::from_array(adapted.column(2)),
        })
    }
}

impl Default for Primaries {
    fn default() -> Self {
        Self::REC709
    }
}

/// The rXYZ / gXYZ / bXYZ tag values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Colorants {
    pub red: Xyz,
    pub green: Xyz,
    pub blue: Xyz,
}

impl Colorants {
    /// Rec.709 primaries, D50-adapted, as commonly published for sRGB profiles
    pub const REC709_D50: Self = Self {
        red: Xyz::new(0.4361, 0.2225, 0.0139),
        green: Xyz::new(0.3851, 0.7169, 0.0971),
        blue: Xyz::new(0.1431, 0.0606, 0.7141),
    };

    pub fn is_finite(&self) -> bool {
        self.red.is_finite() && self.green.is_finite() && self.blue.is_finite()
    }
}

impl Default for Colorants {
    fn default() -> Self {
        Self::REC709_D50
    }
}
