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

//! Smooth cubic handles through a run of anchors.

use super::linalg::{BandedMatrix, DenseMatrix};
use super::CurveFitError;
use crate::math::Vec3;

/// Per-axis tolerance under which the first and last anchors count as the
/// same point.
pub const CLOSED_THRESHOLD: f32 = 1e-3;

/// Sub- and super-diagonal counts of the open handle system.
const LOWER_BANDS: usize = 2;
const UPPER_BANDS: usize = 1;

/// The two inner control points of each cubic segment.
///
/// Segment `k` runs `anchors[k], first[k], second[k], anchors[k + 1]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandlePairs {
    /// First handle of each segment.
    pub first: Vec<Vec3>,
    /// Second handle of each segment.
    pub second: Vec<Vec3>,
}

impl HandlePairs {
    /// Number of segments described.
    pub fn len(&self) -> usize {
        self.first.len().min(self.second.len())
    }

    /// `true` when there are no segments.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates `(first, second)` handle pairs in segment order.
    pub fn iter(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.first.iter().copied().zip(self.second.iter().copied())
    }
}

/// Returns `true` when the path's first and last points coincide on every axis
/// within [`CLOSED_THRESHOLD`]. Fewer than two points never form a closed path.
pub fn is_closed(points: &[Vec3]) -> bool {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) if points.len() >= 2 => {
            (0..3).all(|axis| (first[axis] - last[axis]).abs() <= CLOSED_THRESHOLD)
        }
        _ => false,
    }
}

/// Computes handle points giving a C¹-continuous cubic path through `anchors`.
///
/// Interior anchors get matching tangents and curvature on both sides. An open
/// path has zero second derivative at its ends; a closed path (see
/// [`is_closed`]) also matches tangent and curvature across the seam.
///
/// Fewer than two anchors produce no segments.
pub fn smooth_handle_points(anchors: &[Vec3]) -> Result<HandlePairs, CurveFitError> {
    if anchors.len() < 2 {
        return Ok(HandlePairs::default());
    }
    let segments = anchors.len() - 1;
    let m = 2 * segments;
    let closed = is_closed(anchors);
    log::trace!(
        "Solving {} handle system for {} anchors",
        if closed { "closed" } else { "open" },
        anchors.len()
    );

    let banded = open_system(m);
    let dense = closed.then(|| close_system(&banded, m));

    let mut solutions: [Vec<f64>; 3] = Default::default();
    for (axis, solution) in solutions.iter_mut().enumerate() {
        let rhs = right_hand_side(anchors, axis, closed);
        let solved = match &dense {
            Some(matrix) => matrix.solve(&rhs),
            None => banded.solve(&rhs),
        };
        *solution = solved.map_err(|_| CurveFitError::SingularSystem { axis })?;
    }

    let at = |row: usize| {
        Vec3::new(
            solutions[0][row] as f32,
            solutions[1][row] as f32,
            solutions[2][row] as f32,
        )
    };
    Ok(HandlePairs {
        first: (0..segments).map(|k| at(2 * k)).collect(),
        second: (0..segments).map(|k| at(2 * k + 1)).collect(),
    })
}

/// Unknowns are interleaved `[h0_0, h1_0, h0_1, h1_1, ...]`.
///
/// Odd rows tie `h1_k + h0_{k+1} = 2 a_{k+1}` (tangent continuity). Interior
/// even rows tie `h0_{k-1} - 2 h1_{k-1} + 2 h0_k - h1_k = 0` (curvature
/// continuity). The first and last rows pin zero curvature at the ends.
fn open_system(m: usize) -> BandedMatrix {
    let mut a = BandedMatrix::new(m, LOWER_BANDS, UPPER_BANDS);
    for j in 0..m {
        a.set(j, j, if j % 2 == 0 { 2.0 } else { 1.0 });
        if j >= 1 {
            a.set(j - 1, j, if j % 2 == 1 { -1.0 } else { 1.0 });
        }
        if j % 2 == 1 && j + 2 < m {
            a.set(j + 1, j, -2.0);
        }
        if j % 2 == 0 && j + 3 < m {
            a.set(j + 2, j, 1.0);
        }
    }
    a.set(m - 1, m - 2, -1.0);
    a.set(m - 1, m - 1, 2.0);
    a
}

fn close_system(open: &BandedMatrix, m: usize) -> DenseMatrix {
    let mut a = open.to_dense();
    // Writes land in order so that a two-unknown system keeps the later values.
    for (col, value) in [(0, 2.0), (1, -1.0), (m - 2, 1.0), (m - 1, -2.0)] {
        a.set(m - 1, col, value);
    }
    a.clear_row(0);
    a.set(0, 0, 1.0);
    a.set(0, m - 1, 1.0);
    a
}

fn right_hand_side(anchors: &[Vec3], axis: usize, closed: bool) -> Vec<f64> {
    let m = 2 * (anchors.len() - 1);
    let mut b = vec![0.0; m];
    for (k, anchor) in anchors.iter().enumerate().skip(1) {
        b[2 * k - 1] = 2.0 * f64::from(anchor[axis]);
    }
    let first = f64::from(anchors[0][axis]);
    let last = f64::from(anchors[anchors.len() - 1][axis]);
    if closed {
        b[0] = 2.0 * first;
        b[m - 1] = 0.0;
    } else {
        b[0] = first;
        b[m - 1] = last;
    }
    b
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{assemble_cubic_segments, bezier_point};
    use approx::assert_abs_diff_eq;

    /// Derivative of a cubic at its start and end: `3 (h0 - a0)`, `3 (a1 - h1)`.
    fn start_tangent(a0: Vec3, h0: Vec3) -> Vec3 {
        (h0 - a0) * 3.0
    }

    fn end_tangent(h1: Vec3, a1: Vec3) -> Vec3 {
        (a1 - h1) * 3.0
    }

    #[test]
    fn test_is_closed_threshold() {
        assert!(is_closed(&[Vec3::ZERO, Vec3::X, Vec3::new(0.0005, 0.0, 0.0)]));
        assert!(!is_closed(&[Vec3::ZERO, Vec3::X, Vec3::new(0.01, 0.0, 0.0)]));
        assert!(!is_closed(&[Vec3::ZERO]));
        assert!(!is_closed(&[]));
    }

    #[test]
    fn test_fewer_than_two_anchors_yield_nothing() {
        assert!(smooth_handle_points(&[]).unwrap().is_empty());
        assert!(smooth_handle_points(&[Vec3::X]).unwrap().is_empty());
    }

    #[test]
    fn test_two_anchors_give_straight_thirds() {
        let a = Vec3::ZERO;
        let b = Vec3::new(3.0, 3.0, 0.0);
        let handles = smooth_handle_points(&[a, b]).unwrap();
        assert_eq!(handles.len(), 1);
        assert_abs_diff_eq!(handles.first[0], Vec3::new(1.0, 1.0, 0.0), epsilon = 1e-5);
        assert_abs_diff_eq!(handles.second[0], Vec3::new(2.0, 2.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_open_path_is_smooth_at_interior_anchor() {
        let anchors = [Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0), Vec3::new(2.0, 0.0, 0.0)];
        let handles = smooth_handle_points(&anchors).unwrap();
        assert_eq!(handles.len(), 2);

        let incoming = end_tangent(handles.second[0], anchors[1]);
        let outgoing = start_tangent(anchors[1], handles.first[1]);
        assert_abs_diff_eq!(incoming, outgoing, epsilon = 1e-4);

        // Symmetric anchors give a horizontal tangent at the peak.
        assert_abs_diff_eq!(incoming.y, 0.0, epsilon = 1e-4);

        let points = assemble_cubic_segments(&anchors, &handles).unwrap();
        assert_eq!(points.len(), 8);
        assert_abs_diff_eq!(bezier_point(&points[4..8], 1.0), anchors[2]);
    }

    #[test]
    fn test_open_path_has_natural_ends() {
        let anchors = [
            Vec3::ZERO,
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(3.0, -1.0, 1.0),
            Vec3::new(4.0, 0.0, 0.0),
        ];
        let h = smooth_handle_points(&anchors).unwrap();
        // Second derivative at the start: a0 - 2 h0 + h1 = 0.
        assert_abs_diff_eq!(anchors[0] - h.first[0] * 2.0 + h.second[0], Vec3::ZERO, epsilon = 1e-4);
        // And at the end: h0 - 2 h1 + a1 = 0.
        let n = h.len() - 1;
        assert_abs_diff_eq!(
            h.first[n] - h.second[n] * 2.0 + anchors[3],
            Vec3::ZERO,
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_closed_path_is_smooth_across_the_seam() {
        let anchors = [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
        ];
        let handles = smooth_handle_points(&anchors).unwrap();
        assert_eq!(handles.len(), 3);

        let incoming = end_tangent(handles.second[2], anchors[3]);
        let outgoing = start_tangent(anchors[0], handles.first[0]);
        assert_abs_diff_eq!(incoming, outgoing, epsilon = 1e-4);

        for k in 1..3 {
            let incoming = end_tangent(handles.second[k - 1], anchors[k]);
            let outgoing = start_tangent(anchors[k], handles.first[k]);
            assert_abs_diff_eq!(incoming, outgoing, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_collinear_anchors_stay_on_the_line() {
        let anchors: Vec<Vec3> = (0..6).map(|i| Vec3::new(i as f32, 2.0 * i as f32, 0.0)).collect();
        let handles = smooth_handle_points(&anchors).unwrap();
        for (h0, h1) in handles.iter() {
            assert_abs_diff_eq!(h0.y, 2.0 * h0.x, epsilon = 1e-4);
            assert_abs_diff_eq!(h1.y, 2.0 * h1.x, epsilon = 1e-4);
        }
    }
}
