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

//! Provides the math primitives the scene graph is built on.
//!
//! Points are `f32` triples ([`Vec3`]), colors are linear RGBA ([`LinearRgba`]),
//! bounding boxes are axis-aligned ([`Aabb`]) and rotations are 3x3 matrices
//! ([`Mat3`]).
//!
//! All angular functions in this module operate in **radians**.

// --- Fundamental Constants ---

/// A small constant for floating-point comparisons.
pub const EPSILON: f32 = 1e-5;

pub use std::f32::consts::{FRAC_PI_2, PI, TAU};

// --- Declare Sub-Modules ---

pub mod color;
pub mod geometry;
pub mod matrix;
pub mod vector;

// --- Re-export Principal Types ---

pub use self::color::LinearRgba;
pub use self::geometry::Aabb;
pub use self::matrix::Mat3;
pub use self::vector::Vec3;

// --- Utility Functions ---

/// Linearly interpolates between two scalars.
///
/// Unlike [`LinearRgba::lerp`], `alpha` is not clamped, so values outside
/// `[0, 1]` extrapolate.
///
/// # Examples
///
/// ```
/// use tessera_core::math::interpolate;
/// assert_eq!(interpolate(2.0, 4.0, 0.5), 3.0);
/// assert_eq!(interpolate(2.0, 4.0, 1.5), 5.0);
/// ```
#[inline]
pub fn interpolate(start: f32, end: f32, alpha: f32) -> f32 {
    (1.0 - alpha) * start + alpha * end
}

/// Maps `alpha` in `[0, 1]` onto the integer range `[start, end)` and returns
/// the selected integer together with the fractional residue towards the next
/// one.
///
/// Alphas at or beyond the ends clamp to `(start, 0.0)` and `(end - 1, 1.0)`.
///
/// # Examples
///
/// ```
/// use tessera_core::math::integer_interpolate;
/// let (index, residue) = integer_interpolate(0, 10, 0.46);
/// assert_eq!(index, 4);
/// assert!((residue - 0.6).abs() < 1e-4);
/// assert_eq!(integer_interpolate(0, 10, 1.0), (9, 1.0));
/// ```
pub fn integer_interpolate(start: usize, end: usize, alpha: f32) -> (usize, f32) {
    if alpha >= 1.0 {
        return (end.saturating_sub(1), 1.0);
    }
    if alpha <= 0.0 {
        return (start, 0.0);
    }
    let span = (end - start) as f32 * alpha;
    let value = start + span.floor() as usize;
    (value, span.fract())
}

/// The inverse of [`interpolate`]: where `value` lies between `start` and `end`.
#[inline]
pub fn inverse_interpolate(start: f32, end: f32, value: f32) -> f32 {
    (value - start) / (end - start)
}

/// Clamps a value to a specified minimum and maximum range.
///
/// # Examples
///
/// ```
/// use tessera_core::math::clamp;
/// assert_eq!(clamp(1.5, 0.0, 1.0), 1.0);
/// assert_eq!(clamp(-1.0, 0.0, 1.0), 0.0);
/// ```
#[inline]
pub fn clamp<T: PartialOrd>(value: T, min_val: T, max_val: T) -> T {
    if value < min_val {
        min_val
    } else if value > max_val {
        max_val
    } else {
        value
    }
}

/// Clamps a floating-point value to the `[0.0, 1.0]` range.
#[inline]
pub fn saturate(value: f32) -> f32 {
    clamp(value, 0.0, 1.0)
}

/// Performs an approximate equality comparison between two floats with a custom tolerance.
#[inline]
pub fn approx_eq_eps(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}

/// Performs an approximate equality comparison using the module's default [`EPSILON`].
#[inline]
pub fn approx_eq(a: f32, b: f32) -> bool {
    approx_eq_eps(a, b, EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_interpolate_bounds() {
        assert_eq!(integer_interpolate(0, 4, -0.5), (0, 0.0));
        assert_eq!(integer_interpolate(0, 4, 0.0), (0, 0.0));
        assert_eq!(integer_interpolate(0, 4, 1.0), (3, 1.0));

        let (index, residue) = integer_interpolate(0, 4, 0.5);
        assert_eq!(index, 2);
        assert!(approx_eq(residue, 0.0));

        let (index, residue) = integer_interpolate(0, 4, 0.3);
        assert_eq!(index, 1);
        assert!(approx_eq_eps(residue, 0.2, 1e-4));
    }

    #[test]
    fn test_inverse_interpolate_round_trip() {
        let alpha = inverse_interpolate(2.0, 6.0, interpolate(2.0, 6.0, 0.25));
        assert!(approx_eq(alpha, 0.25));
    }

    #[test]
    fn test_saturate() {
        assert_eq!(saturate(1.5), 1.0);
        assert_eq!(saturate(-0.5), 0.0);
        assert_eq!(saturate(0.5), 0.5);
    }
}
