//! Matrix operations
//!
//! - [`Matrix3x3`]: RGB↔XYZ conversions and chromatic adaptation
//! - [`CalibrationMatrix`]: the 3×4 color matrix (3×3 plus an offset column)
//!   carried by the MHC2 calibration tag
//!
//! All operations use f64.

use std::ops::Mul;

use crate::error::{Error, Result};

/// A 3x3 matrix for color space transformations
///
/// Stored in row-major order: m[row][col]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix3x3 {
    /// Matrix elements in row-major order
    pub m: [[f64; 3]; 3],
}

impl Matrix3x3 {
    /// Create a new matrix from row-major elements
    #[inline]
    pub const fn new(m: [[f64; 3]; 3]) -> Self {
        Self { m }
    }

    /// Create an identity matrix
    #[inline]
    pub const fn identity() -> Self {
        Self {
            m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Create a diagonal matrix from three values
    #[inline]
    pub const fn diagonal(d0: f64, d1: f64, d2: f64) -> Self {
        Self {
            m: [[d0, 0.0, 0.0], [0.0, d1, 0.0], [0.0, 0.0, d2]],
        }
    }

    /// Create a matrix whose columns are the given vectors
    #[inline]
    pub const fn from_columns(c0: [f64; 3], c1: [f64; 3], c2: [f64; 3]) -> Self {
        Self {
            m: [
                [c0[0], c1[0], c2[0]],
                [c0[1], c1[1], c2[1]],
                [c0[2], c1[2], c2[2]],
            ],
        }
    }

    /// Column `j` as a vector
    #[inline]
    pub fn column(&self, j: usize) -> [f64; 3] {
        [self.m[0][j], self.m[1][j], self.m[2][j]]
    }

    /// Multiply this matrix by a 3-element vector
    ///
    /// Returns M × v
    #[inline]
    pub fn multiply_vec(&self, v: [f64; 3]) -> [f64; 3] {
        [
            self.m[0][0] * v[0] + self.m[0][1] * v[1] + self.m[0][2] * v[2],
            self.m[1][0] * v[0] + self.m[1][1] * v[1] + self.m[1][2] * v[2],
            self.m[2][0] * v[0] + self.m[2][1] * v[1] + self.m[2][2] * v[2],
        ]
    }

    /// Multiply this matrix by another matrix
    ///
    /// Returns self × other
    #[inline]
    pub fn multiply(&self, other: &Self) -> Self {
        let mut result = Self::new([[0.0; 3]; 3]);
        for i in 0..3 {
            for j in 0..3 {
                result.m[i][j] = self.m[i][0] * other.m[0][j]
                    + self.m[i][1] * other.m[1][j]
                    + self.m[i][2] * other.m[2][j];
            }
        }
        result
    }

    /// Calculate the determinant
    #[inline]
    pub fn determinant(&self) -> f64 {
        let m = &self.m;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Calculate the inverse of this matrix
    ///
    /// Returns None if the matrix is singular (determinant ≈ 0)
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();

        if det.abs() < 1e-14 {
            return None;
        }

        let inv_det = 1.0 / det;
        let m = &self.m;

        // Adjugate divided by determinant
        Some(Self {
            m: [
                [
                    (m[1][1] * m[2][2] - m[1][2] * m[2][1]) * inv_det,
                    (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv_det,
                    (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv_det,
                ],
                [
                    (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * inv_det,
                    (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv_det,
                    (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * inv_det,
                ],
                [
                    (m[1][0] * m[2][1] - m[1][1] * m[2][0]) * inv_det,
                    (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * inv_det,
                    (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * inv_det,
                ],
            ],
        })
    }

    /// Check if this matrix is approximately equal to another
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        for i in 0..3 {
            for j in 0..3 {
                if (self.m[i][j] - other.m[i][j]).abs() > epsilon {
                    return false;
                }
            }
        }
        true
    }

    /// Check if this is approximately an identity matrix
    pub fn is_identity(&self, epsilon: f64) -> bool {
        self.approx_eq(&Self::identity(), epsilon)
    }
}

impl Default for Matrix3x3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for Matrix3x3 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self.multiply(&rhs)
    }
}

/// 3×4 calibration matrix: a 3×3 color matrix with an offset column
///
/// Row-major; column 3 is the additive offset. Applied by the OS after its own
/// tone mapping and before the regamma curves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationMatrix {
    /// Rows of `[m0, m1, m2, offset]`
    pub m: [[f64; 4]; 3],
}

impl CalibrationMatrix {
    /// Number of coefficients (3 rows × 4 columns)
    pub const LEN: usize = 12;

    /// Identity color matrix, zero offset
    pub const fn identity() -> Self {
        Self {
            m: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
            ],
        }
    }

    /// Build from a 3×3 color matrix and an offset column
    pub fn from_parts(matrix: &Matrix3x3, offset: [f64; 3]) -> Self {
        let mut m = [[0.0; 4]; 3];
        for (row, out) in m.iter_mut().enumerate() {
            out[..3].copy_from_slice(&matrix.m[row]);
            out[3] = offset[row];
        }
        Self { m }
    }

    /// Build from 12 row-major coefficients
    ///
    /// Anything other than exactly 12 values is rejected.
    pub fn from_row_major(values: &[f64]) -> Result<Self> {
        if values.len() != Self::LEN {
            return Err(Error::InvalidInput(format!(
                "calibration matrix needs {} coefficients (3x4), got {}",
                Self::LEN,
                values.len()
            )));
        }
        let mut m = [[0.0; 4]; 3];
        for (i, v) in values.iter().enumerate() {
            m[i / 4][i % 4] = *v;
        }
        Ok(Self { m })
    }

    /// Build from nested rows; must be exactly 3 rows of 4
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        if rows.len() != 3 || rows.iter().any(|r| r.len() != 4) {
            let shape: Vec<usize> = rows.iter().map(Vec::len).collect();
            return Err(Error::InvalidInput(format!(
                "calibration matrix must be 3x4, got {} rows with lengths {:?}",
                rows.len(),
                shape
            )));
        }
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        Self::from_row_major(&flat)
    }

    /// Coefficients in row-major order
    pub fn to_row_major(&self) -> [f64; 12] {
        let mut out = [0.0; 12];
        for (i, v) in self.m.iter().flatten().enumerate() {
            out[i] = *v;
        }
        out
    }

    /// The 3×3 color part
    pub fn color_matrix(&self) -> Matrix3x3 {
        let mut m = [[0.0; 3]; 3];
        for (row, out) in m.iter_mut().enumerate() {
            out.copy_from_slice(&self.m[row][..3]);
        }
        Matrix3x3::new(m)
    }

    /// Apply to an RGB triple: M × rgb + offset
    pub fn apply(&self, rgb: [f64; 3]) -> [f64; 3] {
        let mut out = self.color_matrix().multiply_vec(rgb);
        for (row, v) in out.iter_mut().enumerate() {
            *v += self.m[row][3];
        }
        out
    }

    /// True if every coefficient is finite
    pub fn is_finite(&self) -> bool {
        self.m.iter().flatten().all(|v| v.is_finite())
    }
}

impl Default for CalibrationMatrix {
    fn default() -> Self {
        Self::identity()
    }
}
