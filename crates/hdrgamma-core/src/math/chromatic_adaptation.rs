//! Chromatic adaptation
//!
//! Colorant tags are stored relative to the D50 PCS illuminant, so a display
//! measured under its own white point is adapted with Bradford (the ICC
//! default, ICC.1:2022 Annex E).

use crate::color::{WhitePoint, Xyz};
use crate::math::Matrix3x3;

/// Bradford matrix: XYZ → LMS (cone response)
const BRADFORD_XYZ_TO_LMS: Matrix3x3 = Matrix3x3::new([
    [0.8951000, 0.2664000, -0.1614000],
    [-0.7502000, 1.7135000, 0.0367000],
    [0.0389000, -0.0685000, 1.0296000],
]);

/// Bradford matrix: LMS → XYZ (inverse)
const BRADFORD_LMS_TO_XYZ: Matrix3x3 = Matrix3x3::new([
    [0.9869929, -0.1470543, 0.1599627],
    [0.4323053, 0.5183603, 0.0492912],
    [-0.0085287, 0.0400428, 0.9684867],
]);

/// Bradford adaptation matrix from `src_white` to `dst_white`
///
/// The returned matrix M maps XYZ_dst = M × XYZ_src.
pub fn bradford_matrix(src_white: &WhitePoint, dst_white: &WhitePoint) -> Matrix3x3 {
    let src_lms = BRADFORD_XYZ_TO_LMS.multiply_vec(src_white.xyz.to_array());
    let dst_lms = BRADFORD_XYZ_TO_LMS.multiply_vec(dst_white.xyz.to_array());

    let ratio = |i: usize| {
        if src_lms[i].abs() > 1e-10 {
            dst_lms[i] / src_lms[i]
        } else {
            1.0
        }
    };
    let scale = Matrix3x3::diagonal(ratio(0), ratio(1), ratio(2));

    // M = M_A^-1 × Scale × M_A
    BRADFORD_LMS_TO_XYZ.multiply(&scale.multiply(&BRADFORD_XYZ_TO_LMS))
}

/// Adapt an XYZ color from one white point to another using Bradford
#[inline]
pub fn adapt_xyz_bradford(xyz: Xyz, src_white: &WhitePoint, dst_white: &WhitePoint) -> Xyz {
    Xyz::from_array(bradford_matrix(src_white, dst_white).multiply_vec(xyz.to_array()))
}
