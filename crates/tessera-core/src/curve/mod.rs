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

//! The curve-fit kernel.
//!
//! Turns a sequence of anchor points into the control points of a C¹-smooth
//! cubic Bezier path ([`smooth_handle_points`]) and reduces cubic segments to
//! pairs of quadratics ([`quadratic_approximation_of_cubic`]) for renderers
//! that only draw quadratic strokes.

mod linalg;
mod quadratic;
mod smooth;

use crate::math::Vec3;
use std::fmt;

pub use quadratic::{
    find_intersection, quadratic_approximation_of_cubic, smooth_quadratic_path_through,
    PARALLEL_THRESHOLD,
};
pub use smooth::{is_closed, smooth_handle_points, HandlePairs, CLOSED_THRESHOLD};

/// An error raised by the curve-fit kernel.
#[derive(Debug, Clone, PartialEq)]
pub enum CurveFitError {
    /// The linear system for the handle points had no unique solution.
    SingularSystem {
        /// The coordinate axis (0, 1 or 2) whose solve failed.
        axis: usize,
    },
    /// Anchors and handles could not be zipped into cubic segments.
    MismatchedLengths {
        /// Number of anchors supplied.
        anchors: usize,
        /// Number of handle pairs supplied.
        handles: usize,
    },
}

impl fmt::Display for CurveFitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurveFitError::SingularSystem { axis } => {
                write!(f, "Handle system is singular on axis {axis}")
            }
            CurveFitError::MismatchedLengths { anchors, handles } => write!(
                f,
                "Cannot build cubic segments from {anchors} anchors and {handles} handle pairs"
            ),
        }
    }
}

impl std::error::Error for CurveFitError {}

/// Evaluates the Bezier curve with the given control points at `t`.
///
/// Works for any degree (de Casteljau). An empty slice evaluates to the origin.
pub fn bezier_point(control_points: &[Vec3], t: f32) -> Vec3 {
    if control_points.is_empty() {
        return Vec3::ZERO;
    }
    let mut scratch = control_points.to_vec();
    for level in (1..scratch.len()).rev() {
        for i in 0..level {
            scratch[i] = Vec3::lerp(scratch[i], scratch[i + 1], t);
        }
    }
    scratch[0]
}

/// Returns control points describing the portion of a Bezier curve on the
/// parameter interval `[a, b]`, with `0 <= a < b <= 1`.
///
/// The result has the same degree (length) as the input.
pub fn partial_bezier_points(control_points: &[Vec3], a: f32, b: f32) -> Vec<Vec3> {
    let Some(&last) = control_points.last() else {
        return Vec::new();
    };
    if a >= 1.0 {
        return vec![last; control_points.len()];
    }
    let a_to_1: Vec<Vec3> = (0..control_points.len())
        .map(|i| bezier_point(&control_points[i..], a))
        .collect();
    let end_prop = (b - a) / (1.0 - a);
    (0..control_points.len())
        .map(|i| bezier_point(&a_to_1[..=i], end_prop))
        .collect()
}

/// Interleaves anchors and handle pairs into consecutive cubic segments
/// `(anchor, handle, handle, anchor)`.
pub fn assemble_cubic_segments(
    anchors: &[Vec3],
    handles: &HandlePairs,
) -> Result<Vec<Vec3>, CurveFitError> {
    if anchors.len() != handles.len() + 1 && !(anchors.is_empty() && handles.is_empty()) {
        return Err(CurveFitError::MismatchedLengths {
            anchors: anchors.len(),
            handles: handles.len(),
        });
    }
    let mut points = Vec::with_capacity(handles.len() * 4);
    for (i, (h0, h1)) in handles.iter().enumerate() {
        points.extend_from_slice(&[anchors[i], h0, h1, anchors[i + 1]]);
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_bezier_point_endpoints_and_midpoint() {
        let quad = [Vec3::ZERO, Vec3::new(1.0, 2.0, 0.0), Vec3::new(2.0, 0.0, 0.0)];
        assert_abs_diff_eq!(bezier_point(&quad, 0.0), quad[0]);
        assert_abs_diff_eq!(bezier_point(&quad, 1.0), quad[2]);
        assert_abs_diff_eq!(bezier_point(&quad, 0.5), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_partial_bezier_matches_original_curve() {
        let cubic = [
            Vec3::ZERO,
            Vec3::new(1.0, 3.0, 0.0),
            Vec3::new(3.0, -1.0, 0.0),
            Vec3::new(4.0, 1.0, 0.0),
        ];
        let part = partial_bezier_points(&cubic, 0.25, 0.75);
        assert_eq!(part.len(), 4);
        for s in [0.0, 0.3, 0.5, 1.0] {
            let t = 0.25 + 0.5 * s;
            assert_abs_diff_eq!(bezier_point(&part, s), bezier_point(&cubic, t), epsilon = 1e-4);
        }
    }

    #[test]
    fn test_partial_bezier_from_end_collapses() {
        let line = [Vec3::ZERO, Vec3::X];
        assert_eq!(partial_bezier_points(&line, 1.0, 1.0), vec![Vec3::X, Vec3::X]);
        assert!(partial_bezier_points(&[], 0.0, 1.0).is_empty());
    }

    #[test]
    fn test_assemble_rejects_mismatched_lengths() {
        let handles = HandlePairs {
            first: vec![Vec3::ZERO],
            second: vec![Vec3::ZERO],
        };
        let err = assemble_cubic_segments(&[Vec3::ZERO], &handles).unwrap_err();
        assert_eq!(
            err,
            CurveFitError::MismatchedLengths {
                anchors: 1,
                handles: 1
            }
        );
    }
}
