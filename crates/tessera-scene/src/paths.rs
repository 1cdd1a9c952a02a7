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

//! Path functions: how a point travels from its start to its end position
//! during an interpolation.

use tessera_core::math::{Mat3, Vec3, PI};

/// A point path: `(start, end, alpha) -> position`.
pub type PathFn = Box<dyn Fn(Vec3, Vec3, f32) -> Vec3>;

/// Arcs flatter than this (in radians) are treated as straight.
pub const STRAIGHT_PATH_THRESHOLD: f32 = 0.01;

/// `(1 - alpha) * start + alpha * end`, exact at both ends.
pub fn straight_path(start: Vec3, end: Vec3, alpha: f32) -> Vec3 {
    start * (1.0 - alpha) + end * alpha
}

/// Moves each point along a circular arc spanning `angle` radians around
/// `axis`. A positive angle turns counter-clockwise seen from `axis`.
pub fn path_along_arc(angle: f32, axis: Vec3) -> PathFn {
    if angle.abs() < STRAIGHT_PATH_THRESHOLD {
        return Box::new(straight_path);
    }
    let axis = if axis.length_squared() > 0.0 {
        axis.normalize()
    } else {
        Vec3::OUT
    };
    Box::new(move |start, end, alpha| {
        let half = (end - start) * 0.5;
        let mut center = start + half;
        if angle != PI {
            center += axis.cross(half) / (angle / 2.0).tan();
        }
        center + Mat3::from_axis_angle(axis, alpha * angle) * (start - center)
    })
}

/// A half-turn arc, clockwise.
pub fn clockwise_path() -> PathFn {
    path_along_arc(-PI, Vec3::OUT)
}

/// A half-turn arc, counter-clockwise.
pub fn counterclockwise_path() -> PathFn {
    path_along_arc(PI, Vec3::OUT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use tessera_core::math::FRAC_PI_2;

    #[test]
    fn test_straight_path_is_exact_at_ends() {
        let a = Vec3::new(0.1, 0.2, 0.3);
        let b = Vec3::new(7.0, -3.0, 1.0);
        assert_eq!(straight_path(a, b, 0.0), a);
        assert_eq!(straight_path(a, b, 1.0), b);
        assert_eq!(straight_path(Vec3::ZERO, Vec3::X * 2.0, 0.5), Vec3::X);
    }

    #[test]
    fn test_half_turn_passes_through_the_side() {
        let path = counterclockwise_path();
        let start = Vec3::new(-1.0, 0.0, 0.0);
        let end = Vec3::new(1.0, 0.0, 0.0);
        assert_abs_diff_eq!(path(start, end, 0.5), Vec3::new(0.0, -1.0, 0.0), epsilon = 1e-5);
        assert_abs_diff_eq!(path(start, end, 1.0), end, epsilon = 1e-5);

        let path = clockwise_path();
        assert_abs_diff_eq!(path(start, end, 0.5), Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_quarter_arc_keeps_distance_to_center() {
        let path = path_along_arc(FRAC_PI_2, Vec3::OUT);
        let start = Vec3::X;
        let end = Vec3::Y;
        for i in 0..=8 {
            let p = path(start, end, i as f32 / 8.0);
            assert_abs_diff_eq!(p.length(), 1.0, epsilon = 1e-5);
        }
        assert_abs_diff_eq!(path(start, end, 1.0), end, epsilon = 1e-5);
    }

    #[test]
    fn test_tiny_angle_is_straight() {
        let path = path_along_arc(0.001, Vec3::OUT);
        assert_eq!(path(Vec3::ZERO, Vec3::X, 0.25), Vec3::X * 0.25);
    }
}
