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

//! Cubic Bezier curves.

use super::PointPolicy;
use crate::config::DEFAULT_STROKE_WIDTH;
use crate::error::{DegenerateGeometryError, Result};
use crate::id::NodeId;
use crate::scene::Scene;
use crate::shape::{blend_scalar, Shape};
use tessera_core::curve::{
    assemble_cubic_segments, bezier_point, partial_bezier_points, smooth_handle_points,
};
use tessera_core::math::{integer_interpolate, LinearRgba, Vec3};

/// Control points per cubic segment.
pub const POINTS_PER_CURVE: usize = 4;

/// Style of a [`Shape::Curve`] node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveStyle {
    /// Stroke width in pixels.
    pub stroke_width: f32,
}

impl Default for CurveStyle {
    fn default() -> Self {
        Self {
            stroke_width: DEFAULT_STROKE_WIDTH,
        }
    }
}

fn quads(points: &[Vec3]) -> impl Iterator<Item = &[Vec3]> {
    points.chunks_exact(POINTS_PER_CURVE)
}

impl PointPolicy for CurveStyle {
    fn seed_if_empty(&mut self, points: &mut Vec<Vec3>, seed: Vec3, _color: LinearRgba) {
        if points.is_empty() {
            *points = vec![seed; POINTS_PER_CURVE];
        }
    }

    /// Splits existing segments so the curve reaches `target` points. Segments
    /// are chosen round-robin, so each original segment is cut into at most
    /// one more piece than any other. Counts that are not whole segments fall
    /// back to repeating points.
    fn stretch_points(&mut self, points: &mut Vec<Vec3>, target: usize) {
        let curr = points.len();
        if curr >= target || curr == 0 {
            return;
        }
        if curr % POINTS_PER_CURVE != 0 || target % POINTS_PER_CURVE != 0 {
            *points = (0..target).map(|i| points[i * curr / target]).collect();
            return;
        }

        let curr_curves = curr / POINTS_PER_CURVE;
        let target_curves = target / POINTS_PER_CURVE;
        let mut split_factors = vec![0usize; curr_curves];
        for j in 0..target_curves {
            split_factors[j * curr_curves / target_curves] += 1;
        }

        let mut stretched = Vec::with_capacity(target);
        for (quad, pieces) in quads(points).zip(split_factors) {
            for k in 0..pieces {
                let a = k as f32 / pieces as f32;
                let b = (k + 1) as f32 / pieces as f32;
                stretched.extend(partial_bezier_points(quad, a, b));
            }
        }
        *points = stretched;
    }

    fn point_from_proportion(&self, points: &[Vec3], alpha: f32) -> Option<Vec3> {
        let curves = points.len() / POINTS_PER_CURVE;
        if curves == 0 {
            return points.first().copied();
        }
        let (index, residue) = integer_interpolate(0, curves, alpha);
        let start = index * POINTS_PER_CURVE;
        Some(bezier_point(&points[start..start + POINTS_PER_CURVE], residue))
    }

    /// Keeps the source's point count: points before `a` collapse onto the
    /// start of the partial curve and points after `b` onto its end, so the
    /// result stays aligned with the source for animation.
    fn become_partial(
        &mut self,
        points: &mut Vec<Vec3>,
        _source: &Self,
        source_points: &[Vec3],
        a: f32,
        b: f32,
    ) {
        *points = source_points.to_vec();
        let curves = source_points.len() / POINTS_PER_CURVE;
        if (a <= 0.0 && b >= 1.0) || curves == 0 {
            return;
        }
        let (lower_index, lower_residue) = integer_interpolate(0, curves, a);
        let (upper_index, upper_residue) = integer_interpolate(0, curves, b);
        let n = POINTS_PER_CURVE;
        let i1 = n * lower_index;
        let i2 = n * (lower_index + 1);
        let i3 = n * upper_index;
        let i4 = n * (upper_index + 1);

        let (low, high) = if lower_index == upper_index {
            let piece = partial_bezier_points(&source_points[i1..i2], lower_residue, upper_residue);
            (piece.clone(), piece)
        } else {
            (
                partial_bezier_points(&source_points[i1..i2], lower_residue, 1.0),
                partial_bezier_points(&source_points[i3..i4], 0.0, upper_residue),
            )
        };
        let start = low[0];
        let end = high[n - 1];
        points[..i1].fill(start);
        points[i1..i2].copy_from_slice(&low);
        points[i3..i4].copy_from_slice(&high);
        points[i4..].fill(end);
    }

    fn interpolate_style(&mut self, start: &Self, end: &Self, alpha: f32) {
        self.stroke_width = blend_scalar(start.stroke_width, end.stroke_width, alpha);
    }
}

impl Scene {
    /// Spawns an empty curve with the configured stroke width and color.
    pub fn spawn_curve(&mut self) -> NodeId {
        let shape = Shape::curve(self.config().default_stroke_width);
        self.spawn(shape)
    }

    /// Number of whole cubic segments the node owns.
    pub fn curve_count(&self, id: NodeId) -> Result<usize> {
        Ok(self.node(id)?.points.len() / POINTS_PER_CURVE)
    }

    /// Replaces the node's points with straight segments joining `corners`.
    ///
    /// Handles sit at the thirds of each segment, so later subdivision keeps
    /// the segments straight.
    pub fn set_points_as_corners(&mut self, id: NodeId, corners: &[Vec3]) -> Result<()> {
        let points: Vec<Vec3> = corners
            .windows(2)
            .flat_map(|pair| {
                let (a, b) = (pair[0], pair[1]);
                [a, Vec3::lerp(a, b, 1.0 / 3.0), Vec3::lerp(a, b, 2.0 / 3.0), b]
            })
            .collect();
        self.set_points(id, points)
    }

    /// Replaces the node's points with a smooth cubic path through `anchors`.
    ///
    /// A path whose ends meet is closed smoothly across the seam.
    pub fn set_points_smoothly(&mut self, id: NodeId, anchors: &[Vec3]) -> Result<()> {
        let handles = smooth_handle_points(anchors)?;
        let points = assemble_cubic_segments(anchors, &handles)?;
        log::trace!("Fitted {} segments through anchors of {id}", handles.len());
        self.set_points(id, points)
    }

    /// The `n`-th cubic segment of the node as its four control points.
    pub fn nth_curve(&self, id: NodeId, n: usize) -> Result<[Vec3; POINTS_PER_CURVE]> {
        let node = self.node(id)?;
        let start = n * POINTS_PER_CURVE;
        match node.points.get(start..start + POINTS_PER_CURVE) {
            Some(quad) => Ok([quad[0], quad[1], quad[2], quad[3]]),
            None => Err(DegenerateGeometryError::NoPoints {
                node: id,
                operation: "nth_curve",
            }
            .into()),
        }
    }
}
