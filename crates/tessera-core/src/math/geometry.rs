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

//! Provides the axis-aligned bounding box used for layout queries.

use super::Vec3;

/// Represents an Axis-Aligned Bounding Box (AABB).
///
/// Scene layout addresses every edge, corner and the center of a box
/// uniformly through [`Aabb::point_toward`]: each component of the direction
/// picks the minimum (negative), middle (zero) or maximum (positive) on its
/// axis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Aabb {
    /// The corner of the box with the smallest coordinates on all axes.
    pub min: Vec3,
    /// The corner of the box with the largest coordinates on all axes.
    pub max: Vec3,
}

impl Aabb {
    /// The degenerate box collapsed onto the origin.
    ///
    /// This is what an empty point set measures as.
    pub const ORIGIN: Self = Self {
        min: Vec3::ZERO,
        max: Vec3::ZERO,
    };

    /// Creates a new `Aabb` from two corner points, in any order.
    #[inline]
    pub fn from_min_max(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Creates a degenerate `Aabb` containing a single point (min and max are the same).
    #[inline]
    pub fn from_point(point: Vec3) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Creates an `Aabb` that tightly encloses a given set of points.
    ///
    /// # Returns
    ///
    /// Returns `Some(Aabb)` if the iterator is not empty, otherwise `None`.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec3>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::from_point(first), |bb, p| bb.merged_with_point(p)))
    }

    /// Calculates the center point of the `Aabb`.
    #[inline]
    pub fn mid(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Calculates the full size (width, height, depth) of the `Aabb`.
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// The max-minus-min extent along axis `dim` (0, 1 or 2).
    #[inline]
    pub fn length_over_dim(&self, dim: usize) -> f32 {
        self.size()[dim]
    }

    /// Selects a point of the box per axis by the sign of `direction`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tessera_core::math::{Aabb, Vec3};
    /// let bb = Aabb::from_min_max(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(3.0, 2.0, 0.0));
    /// assert_eq!(bb.point_toward(Vec3::ZERO), Vec3::new(1.0, 1.0, 0.0));
    /// assert_eq!(bb.point_toward(Vec3::UP + Vec3::LEFT), Vec3::new(-1.0, 2.0, 0.0));
    /// ```
    pub fn point_toward(&self, direction: Vec3) -> Vec3 {
        let mid = self.mid();
        let mut result = Vec3::ZERO;
        for axis in 0..3 {
            result[axis] = if direction[axis] < 0.0 {
                self.min[axis]
            } else if direction[axis] > 0.0 {
                self.max[axis]
            } else {
                mid[axis]
            };
        }
        result
    }

    /// Creates a new `Aabb` that encompasses both this `Aabb` and an additional point.
    #[inline]
    pub fn merged_with_point(&self, point: Vec3) -> Self {
        Self {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::ORIGIN
    }
}
