//! A minimal fixed-size 4x4 matrix for homogeneous 3D affine transforms.
//!
//! Only the operations needed for affine recovery are provided: product,
//! inverse, diagonal scaling and translation. Matrices are stored
//! row-major (`m[row][col]`) and act on column vectors, so that a voxel
//! index `(i, j, k, 1)` maps to `M * (i, j, k, 1)`.

use approx::{AbsDiffEq, RelativeEq};
use std::ops::Mul;

/// A 4x4 matrix of `f64` values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    m: [[f64; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Mat4::identity()
    }
}

impl Mat4 {
    /// The identity matrix.
    pub fn identity() -> Self {
        Mat4::from_diagonal([1., 1., 1., 1.])
    }

    /// Create a matrix from its rows.
    pub fn from_rows(m: [[f64; 4]; 4]) -> Self {
        Mat4 { m }
    }

    /// Create a diagonal matrix.
    pub fn from_diagonal(d: [f64; 4]) -> Self {
        let mut m = [[0.; 4]; 4];
        for (i, v) in d.iter().enumerate() {
            m[i][i] = *v;
        }
        Mat4 { m }
    }

    /// Create a matrix from 16 values in column-major order.
    pub fn from_column_major(values: &[f64; 16]) -> Self {
        let mut m = [[0.; 4]; 4];
        for (i, v) in values.iter().enumerate() {
            m[i % 4][i / 4] = *v;
        }
        Mat4 { m }
    }

    /// Identity with the given translation in the last column.
    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        let mut out = Mat4::identity();
        out.m[0][3] = x;
        out.m[1][3] = y;
        out.m[2][3] = z;
        out
    }

    /// Shift converting an affine defined over 1-based voxel indices
    /// into one over 0-based indices, when multiplied on the right.
    pub fn index_origin_shift() -> Self {
        Mat4::translation(-1., -1., -1.)
    }

    /// Inverse of [`index_origin_shift`](#method.index_origin_shift):
    /// converts a 0-based affine back to 1-based indices.
    pub fn index_origin_unshift() -> Self {
        Mat4::translation(1., 1., 1.)
    }

    /// Element at the given row and column.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.m[row][col]
    }

    /// Set the element at the given row and column.
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.m[row][col] = value;
    }

    /// The matrix rows.
    pub fn rows(&self) -> &[[f64; 4]; 4] {
        &self.m
    }

    /// Matrix product `self * rhs`.
    pub fn mul_mat(&self, rhs: &Mat4) -> Mat4 {
        let mut out = [[0.; 4]; 4];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, v) in row.iter_mut().enumerate() {
                *v = (0..4).map(|k| self.m[r][k] * rhs.m[k][c]).sum();
            }
        }
        Mat4 { m: out }
    }

    /// Multiply by the diagonal matrix `diag(x, y, z, 1)` on the right,
    /// which scales the first three columns.
    pub fn scale_columns(&self, x: f64, y: f64, z: f64) -> Mat4 {
        self.mul_mat(&Mat4::from_diagonal([x, y, z, 1.]))
    }

    /// The transposed matrix.
    pub fn transpose(&self) -> Mat4 {
        let mut out = [[0.; 4]; 4];
        for (r, row) in self.m.iter().enumerate() {
            for (c, v) in row.iter().enumerate() {
                out[c][r] = *v;
            }
        }
        Mat4 { m: out }
    }

    /// Compute the inverse by Gauss-Jordan elimination with partial pivoting.
    /// Returns `None` if the matrix is singular.
    pub fn inverse(&self) -> Option<Mat4> {
        let mut a = self.m;
        let mut inv = Mat4::identity().m;

        for col in 0..4 {
            let pivot = (col..4)
                .max_by(|&i, &j| a[i][col].abs().partial_cmp(&a[j][col].abs()).unwrap_or(std::cmp::Ordering::Equal))
                .unwrap_or(col);
            let p = a[pivot][col];
            if !p.is_finite() || p.abs() < ::std::f64::EPSILON {
                return None;
            }
            a.swap(col, pivot);
            inv.swap(col, pivot);

            for k in 0..4 {
                a[col][k] /= p;
                inv[col][k] /= p;
            }
            for row in 0..4 {
                if row == col {
                    continue;
                }
                let factor = a[row][col];
                if factor == 0. {
                    continue;
                }
                for k in 0..4 {
                    a[row][k] -= factor * a[col][k];
                    inv[row][k] -= factor * inv[col][k];
                }
            }
        }
        Some(Mat4 { m: inv })
    }

    /// Apply the transform to a point.
    pub fn transform_point(&self, p: [f64; 3]) -> [f64; 3] {
        let mut out = [0.; 3];
        for (r, v) in out.iter_mut().enumerate() {
            *v = self.m[r][0] * p[0] + self.m[r][1] * p[1] + self.m[r][2] * p[2] + self.m[r][3];
        }
        out
    }

    /// Whether the last row is `[0, 0, 0, 1]`.
    pub fn is_homogeneous(&self) -> bool {
        self.m[3] == [0., 0., 0., 1.]
    }

    /// Flatten into 16 values in column-major order, the layout handed
    /// to host applications: translation lands at indices 12, 13 and 14.
    pub fn to_column_major(&self) -> [f64; 16] {
        let mut out = [0.; 16];
        for (i, v) in out.iter_mut().enumerate() {
            *v = self.m[i % 4][i / 4];
        }
        out
    }

    /// Flatten into 16 values in row-major order.
    pub fn to_row_major(&self) -> [f64; 16] {
        let mut out = [0.; 16];
        for (i, v) in out.iter_mut().enumerate() {
            *v = self.m[i / 4][i % 4];
        }
        out
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        self.mul_mat(&rhs)
    }
}

impl<'a> Mul<&'a Mat4> for &'a Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: &'a Mat4) -> Mat4 {
        self.mul_mat(rhs)
    }
}

impl AbsDiffEq for Mat4 {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.m
            .iter()
            .flatten()
            .zip(other.m.iter().flatten())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Mat4 {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.m
            .iter()
            .flatten()
            .zip(other.m.iter().flatten())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}
