//! Numeric building blocks
//!
//! - Transfer functions (sRGB, power gamma, PQ)
//! - 3x3 matrices and the 3x4 calibration matrix
//! - Bradford chromatic adaptation

pub mod chromatic_adaptation;
pub mod matrix;
pub mod transfer;

pub use chromatic_adaptation::{adapt_xyz_bradford, bradford_matrix};
pub use matrix::{CalibrationMatrix, Matrix3x3};
pub use transfer::{
    TARGET_GAMMA, TransferFunction, gamma_eotf, gamma_inverse_eotf, pq_eotf, pq_inverse_eotf,
    srgb_eotf, srgb_inverse_eotf,
};
