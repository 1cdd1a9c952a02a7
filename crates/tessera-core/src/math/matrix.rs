// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Defines the `Mat3` type used for linear point transformations.

use super::Vec3;
use std::ops::{Index, IndexMut, Mul};

/// A 3x3 column-major matrix.
///
/// Scene transforms apply a `Mat3` to every point around a pivot, so this type
/// carries rotation, scale and arbitrary user-supplied linear maps.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Mat3 {
    /// The columns of the matrix. `cols[0]` is the first column, and so on.
    pub cols: [Vec3; 3],
}

impl Mat3 {
    /// The 3x3 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [Vec3::X, Vec3::Y, Vec3::Z],
    };

    /// A 3x3 matrix with all elements set to 0.
    pub const ZERO: Self = Self {
        cols: [Vec3::ZERO; 3],
    };

    /// Creates a new matrix from three column vectors.
    #[inline]
    pub fn from_cols(c0: Vec3, c1: Vec3, c2: Vec3) -> Self {
        Self { cols: [c0, c1, c2] }
    }

    /// Creates a new matrix from three row vectors.
    #[inline]
    pub fn from_rows(r0: Vec3, r1: Vec3, r2: Vec3) -> Self {
        Self::from_cols(r0, r1, r2).transpose()
    }

    /// Returns a row of the matrix as a `Vec3`.
    #[inline]
    pub fn row(&self, index: usize) -> Vec3 {
        Vec3::new(
            self.cols[0][index],
            self.cols[1][index],
            self.cols[2][index],
        )
    }

    /// Creates a non-uniform scaling matrix.
    #[inline]
    pub fn from_scale(scale: Vec3) -> Self {
        Self::from_cols(
            Vec3::new(scale.x, 0.0, 0.0),
            Vec3::new(0.0, scale.y, 0.0),
            Vec3::new(0.0, 0.0, scale.z),
        )
    }

    /// Creates a rotation matrix from an axis and an angle.
    ///
    /// The axis is normalized first; a zero axis yields the identity.
    /// Applied as `m * p` to a column point, this is the same map as
    /// multiplying the row vector `p` by the transposed rotation.
    #[inline]
    pub fn from_axis_angle(axis: Vec3, angle_radians: f32) -> Self {
        let axis = axis.normalize();
        if axis == Vec3::ZERO {
            return Self::IDENTITY;
        }
        let (s, c) = angle_radians.sin_cos();
        let t = 1.0 - c;
        let x = axis.x;
        let y = axis.y;
        let z = axis.z;
        Self {
            cols: [
                Vec3::new(t * x * x + c, t * x * y + s * z, t * x * z - s * y),
                Vec3::new(t * y * x - s * z, t * y * y + c, t * y * z + s * x),
                Vec3::new(t * z * x + s * y, t * z * y - s * x, t * z * z + c),
            ],
        }
    }

    /// Returns the transpose of the matrix.
    #[inline]
    pub fn transpose(&self) -> Self {
        Self::from_cols(self.row(0), self.row(1), self.row(2))
    }
}

impl Default for Mat3 {
    /// Returns the identity matrix.
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Mat3> for Mat3 {
    type Output = Self;
    /// Multiplies this matrix by another `Mat3`.
    #[inline]
    fn mul(self, rhs: Mat3) -> Self::Output {
        Self::from_cols(self * rhs.cols[0], self * rhs.cols[1], self * rhs.cols[2])
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;
    /// Transforms a `Vec3` by this matrix.
    #[inline]
    fn mul(self, v: Vec3) -> Self::Output {
        self.cols[0] * v.x + self.cols[1] * v.y + self.cols[2] * v.z
    }
}

impl Index<usize> for Mat3 {
    type Output = Vec3;
    /// Allows accessing a matrix column by index.
    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.cols[index]
    }
}

impl IndexMut<usize> for Mat3 {
    /// Allows mutably accessing a matrix column by index.
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.cols[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{FRAC_PI_2, PI};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_rotation_about_z_quarter_turn() {
        let m = Mat3::from_axis_angle(Vec3::OUT, FRAC_PI_2);
        assert_abs_diff_eq!(m * Vec3::RIGHT, Vec3::UP, epsilon = 1e-6);
        assert_abs_diff_eq!(m * Vec3::UP, Vec3::LEFT, epsilon = 1e-6);
    }

    #[test]
    fn test_rotation_is_orthonormal() {
        let m = Mat3::from_axis_angle(Vec3::new(1.0, 2.0, 3.0), 0.7);
        let product = m * m.transpose();
        for i in 0..3 {
            assert_abs_diff_eq!(product.cols[i], Mat3::IDENTITY.cols[i], epsilon = 1e-5);
        }
    }

    #[test]
    fn test_rotation_inverse_by_negated_angle() {
        let axis = Vec3::new(0.3, -1.0, 0.2);
        let p = Vec3::new(1.5, -2.0, 0.25);
        let back = Mat3::from_axis_angle(axis, -1.1) * (Mat3::from_axis_angle(axis, 1.1) * p);
        assert_abs_diff_eq!(back, p, epsilon = 1e-5);
    }

    #[test]
    fn test_zero_axis_is_identity() {
        assert_eq!(Mat3::from_axis_angle(Vec3::ZERO, PI), Mat3::IDENTITY);
    }

    #[test]
    fn test_from_rows_matches_transpose() {
        let m = Mat3::from_rows(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(4.0, 5.0, 6.0),
            Vec3::new(7.0, 8.0, 9.0),
        );
        assert_eq!(m.row(0), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(m.cols[0], Vec3::new(1.0, 4.0, 7.0));
        assert_eq!(m * Vec3::X, Vec3::new(1.0, 4.0, 7.0));
    }

    #[test]
    fn test_scale() {
        let m = Mat3::from_scale(Vec3::new(2.0, 3.0, 4.0));
        assert_eq!(m * Vec3::ONE, Vec3::new(2.0, 3.0, 4.0));
    }
}
