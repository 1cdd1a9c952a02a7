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

//! Concrete shape families and their point-count policies.
//!
//! A node's [`Shape`] decides how its points are read. The unshaped
//! [`Shape::Group`] has no policy at all; curves and point clouds implement
//! [`PointPolicy`] so the alignment and morph code can resample, slice and
//! blend them without knowing which family it is looking at.

mod cloud;
mod curve;

pub use cloud::CloudStyle;
pub use curve::{CurveStyle, POINTS_PER_CURVE};

use crate::error::{NotImplementedError, SceneError, StructuralError};
use crate::id::NodeId;
use std::fmt;
use tessera_core::math::{LinearRgba, Vec3};

/// The kind of a [`Shape`], without its style data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// A pure container.
    Group,
    /// Cubic Bezier segments.
    Curve,
    /// Loose points with per-point colors.
    PointCloud,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShapeKind::Group => "group",
            ShapeKind::Curve => "curve",
            ShapeKind::PointCloud => "point cloud",
        };
        f.write_str(name)
    }
}

/// The shape family of a node together with its family-specific style.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// The unshaped base kind. It may own points, but it has no rule for how
    /// many it should have or how to blend them.
    Group,
    /// Points are consecutive `(anchor, handle, handle, anchor)` quadruples.
    Curve(CurveStyle),
    /// Points are independent dots, each with its own color.
    PointCloud(CloudStyle),
}

impl Shape {
    /// A curve with the given stroke width.
    pub fn curve(stroke_width: f32) -> Self {
        Shape::Curve(CurveStyle { stroke_width })
    }

    /// An empty point cloud with the given stroke width.
    pub fn point_cloud(stroke_width: f32) -> Self {
        Shape::PointCloud(CloudStyle::new(stroke_width))
    }

    /// The kind tag.
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Group => ShapeKind::Group,
            Shape::Curve(_) => ShapeKind::Curve,
            Shape::PointCloud(_) => ShapeKind::PointCloud,
        }
    }

    /// The stroke width, for kinds that have one.
    pub fn stroke_width(&self) -> Option<f32> {
        match self {
            Shape::Group => None,
            Shape::Curve(style) => Some(style.stroke_width),
            Shape::PointCloud(style) => Some(style.stroke_width),
        }
    }

    pub(crate) fn set_stroke_width(&mut self, width: f32) {
        match self {
            Shape::Group => {}
            Shape::Curve(style) => style.stroke_width = width,
            Shape::PointCloud(style) => style.stroke_width = width,
        }
    }

    /// Per-point colors, for kinds that carry them.
    pub fn rgbas(&self) -> Option<&[LinearRgba]> {
        match self {
            Shape::PointCloud(style) => Some(&style.rgbas),
            _ => None,
        }
    }

    pub(crate) fn stretch_points(
        &mut self,
        points: &mut Vec<Vec3>,
        target: usize,
        seed: Vec3,
        seed_color: LinearRgba,
    ) -> Result<(), PolicyError> {
        match self {
            Shape::Group => Err(PolicyError::Missing(ShapeKind::Group)),
            Shape::Curve(style) => {
                style.seed_if_empty(points, seed, seed_color);
                style.stretch_points(points, target);
                Ok(())
            }
            Shape::PointCloud(style) => {
                style.seed_if_empty(points, seed, seed_color);
                style.stretch_points(points, target);
                Ok(())
            }
        }
    }

    pub(crate) fn point_from_proportion(
        &self,
        points: &[Vec3],
        alpha: f32,
    ) -> Result<Option<Vec3>, PolicyError> {
        match self {
            Shape::Group => Err(PolicyError::Missing(ShapeKind::Group)),
            Shape::Curve(style) => Ok(style.point_from_proportion(points, alpha)),
            Shape::PointCloud(style) => Ok(style.point_from_proportion(points, alpha)),
        }
    }

    pub(crate) fn become_partial(
        &mut self,
        points: &mut Vec<Vec3>,
        source: &Shape,
        source_points: &[Vec3],
        a: f32,
        b: f32,
    ) -> Result<(), PolicyError> {
        match (self, source) {
            (Shape::Curve(style), Shape::Curve(from)) => {
                style.become_partial(points, from, source_points, a, b);
                Ok(())
            }
            (Shape::PointCloud(style), Shape::PointCloud(from)) => {
                style.become_partial(points, from, source_points, a, b);
                Ok(())
            }
            (Shape::Group, _) => Err(PolicyError::Missing(ShapeKind::Group)),
            (me, other) => Err(PolicyError::Mismatch(me.kind(), other.kind())),
        }
    }

    pub(crate) fn interpolate_style(
        &mut self,
        start: &Shape,
        end: &Shape,
        alpha: f32,
    ) -> Result<(), PolicyError> {
        match (self, start, end) {
            (Shape::Group, Shape::Group, Shape::Group) => Ok(()),
            (Shape::Curve(style), Shape::Curve(from), Shape::Curve(to)) => {
                style.interpolate_style(from, to, alpha);
                Ok(())
            }
            (Shape::PointCloud(style), Shape::PointCloud(from), Shape::PointCloud(to)) => {
                style.interpolate_style(from, to, alpha);
                Ok(())
            }
            (_, from, to) if from.kind() != to.kind() => {
                Err(PolicyError::Mismatch(from.kind(), to.kind()))
            }
            (me, from, _) => Err(PolicyError::Mismatch(me.kind(), from.kind())),
        }
    }

    /// Applies `f` to every per-point array that must stay parallel to the
    /// points (reversal, repetition, filtering).
    pub(crate) fn apply_to_point_arrays<F>(&mut self, points: &mut Vec<Vec3>, mut f: F)
    where
        F: FnMut(&mut dyn ParallelArray),
    {
        f(points);
        if let Shape::PointCloud(style) = self {
            f(&mut style.rgbas);
        }
    }
}

/// The per-kind behavior the alignment and morph protocol relies on.
///
/// Implemented by each concrete family's style. `points` are the owning
/// node's points; per-point attributes live in the style and must be kept
/// parallel to them.
pub trait PointPolicy {
    /// Fills an empty point list with a degenerate shape at `seed`.
    fn seed_if_empty(&mut self, points: &mut Vec<Vec3>, seed: Vec3, color: LinearRgba);

    /// Grows `points` to `target` entries without changing the drawn path.
    /// Does nothing if there are already at least `target` points.
    fn stretch_points(&mut self, points: &mut Vec<Vec3>, target: usize);

    /// The point a fraction `alpha` of the way along the shape, or `None`
    /// when there are no points.
    fn point_from_proportion(&self, points: &[Vec3], alpha: f32) -> Option<Vec3>;

    /// Replaces `points` with the portion `[a, b]` of `source_points`.
    fn become_partial(
        &mut self,
        points: &mut Vec<Vec3>,
        source: &Self,
        source_points: &[Vec3],
        a: f32,
        b: f32,
    );

    /// Blends style and per-point attributes between `start` and `end`.
    fn interpolate_style(&mut self, start: &Self, end: &Self, alpha: f32);
}

/// A per-point array that can be reordered in lockstep with the points.
pub(crate) trait ParallelArray {
    fn reverse(&mut self);
    fn repeat(&mut self, count: usize);
    fn select(&mut self, indices: &[usize]);
}

impl<T: Copy> ParallelArray for Vec<T> {
    fn reverse(&mut self) {
        self.as_mut_slice().reverse();
    }

    fn repeat(&mut self, count: usize) {
        *self = self.as_slice().repeat(count);
    }

    fn select(&mut self, indices: &[usize]) {
        *self = indices.iter().filter_map(|&i| self.get(i).copied()).collect();
    }
}

/// Why a shape could not perform a policy operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum PolicyError {
    Missing(ShapeKind),
    Mismatch(ShapeKind, ShapeKind),
}

impl PolicyError {
    /// Reports a missing policy as [`StructuralError::NoAlignmentPolicy`].
    pub(crate) fn for_alignment(self, node: NodeId) -> SceneError {
        match self {
            PolicyError::Missing(kind) => StructuralError::NoAlignmentPolicy { node, kind }.into(),
            PolicyError::Mismatch(left, right) => StructuralError::KindMismatch { left, right }.into(),
        }
    }

    /// Reports a missing policy as a [`NotImplementedError`] hook.
    pub(crate) fn for_hook(self, operation: &'static str) -> SceneError {
        match self {
            PolicyError::Missing(kind) => NotImplementedError { operation, kind }.into(),
            PolicyError::Mismatch(left, right) => StructuralError::KindMismatch { left, right }.into(),
        }
    }
}

/// `(1 - alpha) * start + alpha * end`, exact at both ends.
pub(crate) fn blend_color(start: LinearRgba, end: LinearRgba, alpha: f32) -> LinearRgba {
    let mix = |a: f32, b: f32| (1.0 - alpha) * a + alpha * b;
    LinearRgba::new(
        mix(start.r, end.r),
        mix(start.g, end.g),
        mix(start.b, end.b),
        mix(start.a, end.a),
    )
}

/// `(1 - alpha) * start + alpha * end`, exact at both ends.
pub(crate) fn blend_scalar(start: f32, end: f32, alpha: f32) -> f32 {
    (1.0 - alpha) * start + alpha * end
}
