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

//! Quadratic approximation of cubic segments.

use super::{bezier_point, smooth_handle_points, CurveFitError};
use crate::math::Vec3;

/// Below this, the tangent lines handed to [`find_intersection`] are treated
/// as parallel.
pub const PARALLEL_THRESHOLD: f32 = 1e-5;

/// Intersects the line through `p0` along `v0` with the line through `p1`
/// along `v1`.
///
/// Returns `p0` when the lines are parallel (or either direction is zero).
/// Skew lines yield the point on the first line where the lines' projections
/// cross.
pub fn find_intersection(p0: Vec3, v0: Vec3, p1: Vec3, v1: Vec3) -> Vec3 {
    let numer = v1.cross(p1 - p0);
    let denom = v1.cross(v0);
    let new_numer = numer.dot(numer);
    let new_denom = denom.dot(numer);
    let ratio = if new_denom.abs() < PARALLEL_THRESHOLD {
        0.0
    } else {
        new_numer / new_denom
    };
    p0 + v0 * ratio
}

/// Approximates the cubic `(a0, h0, h1, a1)` by two quadratics sharing a
/// middle anchor.
///
/// The split happens at the cubic's inflection point when one lies strictly
/// inside `(0, 1)`, and at `t = 0.5` otherwise. Inflections are found in the
/// XY projection. Returns `[a0, c0, mid, mid, c1, a1]`.
pub fn quadratic_approximation_of_cubic(a0: Vec3, h0: Vec3, h1: Vec3, a1: Vec3) -> [Vec3; 6] {
    let t_mid = split_parameter(a0, h0, h1, a1);

    let mid = bezier_point(&[a0, h0, h1, a1], t_mid);
    let mid_tangent = bezier_point(&[h0 - a0, h1 - h0, a1 - h1], t_mid);

    let c0 = find_intersection(a0, h0 - a0, mid, mid_tangent);
    let c1 = find_intersection(a1, a1 - h1, mid, mid_tangent);
    [a0, c0, mid, mid, c1, a1]
}

fn split_parameter(a0: Vec3, h0: Vec3, h1: Vec3, a1: Vec3) -> f32 {
    let cross2d = |v: Vec3, w: Vec3| v.x * w.y - v.y * w.x;

    let p = h0 - a0;
    let q = h1 - h0 * 2.0 + a0;
    let r = a1 - h1 * 3.0 + h0 * 3.0 - a0;

    let a = cross2d(q, r);
    let b = cross2d(p, r);
    let c = cross2d(p, q);

    let disc = b * b - 4.0 * a * c;
    if disc <= 0.0 {
        return 0.5;
    }
    let sqrt_disc = disc.sqrt();
    let root = |sign: f32| {
        if a != 0.0 {
            (-b + sign * sqrt_disc) / (2.0 * a)
        } else {
            -c / b
        }
    };
    let in_range = |t: f32| t > 0.0 && t < 1.0;

    let mut t_mid = 0.5;
    let ti_min = root(-1.0);
    if in_range(ti_min) {
        t_mid = ti_min;
    }
    let ti_max = root(1.0);
    if in_range(ti_max) {
        t_mid = ti_max;
    }
    t_mid
}

/// Smooth path through `anchors` made of quadratic segments, six points per
/// anchor gap (two quadratics each).
pub fn smooth_quadratic_path_through(anchors: &[Vec3]) -> Result<Vec<Vec3>, CurveFitError> {
    let handles = smooth_handle_points(anchors)?;
    let mut points = Vec::with_capacity(handles.len() * 6);
    for (k, (h0, h1)) in handles.iter().enumerate() {
        points.extend(quadratic_approximation_of_cubic(
            anchors[k],
            h0,
            h1,
            anchors[k + 1],
        ));
    }
    Ok(points)
}
