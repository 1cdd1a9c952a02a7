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

//! Point clouds: loose points with one color each.

use super::{blend_color, blend_scalar, ParallelArray, PointPolicy, Shape, ShapeKind};
use crate::config::DEFAULT_STROKE_WIDTH;
use crate::error::{Result, StructuralError};
use crate::id::NodeId;
use crate::scene::Scene;
use tessera_core::math::{LinearRgba, Vec3};

/// Style of a [`Shape::PointCloud`] node.
///
/// `rgbas` always has exactly one entry per point of the owning node.
#[derive(Debug, Clone, PartialEq)]
pub struct CloudStyle {
    /// One color per point.
    pub rgbas: Vec<LinearRgba>,
    /// Dot size in pixels.
    pub stroke_width: f32,
}

impl CloudStyle {
    /// An empty cloud style.
    pub fn new(stroke_width: f32) -> Self {
        Self {
            rgbas: Vec::new(),
            stroke_width,
        }
    }
}

impl Default for CloudStyle {
    fn default() -> Self {
        Self::new(DEFAULT_STROKE_WIDTH)
    }
}

/// `(0..target).map(|i| i * curr / target)`: the nearest-below source index
/// for each of `target` evenly spaced slots.
fn stretch_indices(curr: usize, target: usize) -> Vec<usize> {
    (0..target).map(|i| i * curr / target).collect()
}

impl PointPolicy for CloudStyle {
    fn seed_if_empty(&mut self, points: &mut Vec<Vec3>, seed: Vec3, color: LinearRgba) {
        if points.is_empty() {
            points.push(seed);
            self.rgbas = vec![color];
        }
    }

    /// Repeats points in place (each point duplicated next to itself) until
    /// there are `target` of them.
    fn stretch_points(&mut self, points: &mut Vec<Vec3>, target: usize) {
        let curr = points.len();
        if curr >= target || curr == 0 {
            return;
        }
        let indices = stretch_indices(curr, target);
        points.select(&indices);
        self.rgbas.select(&indices);
    }

    fn point_from_proportion(&self, points: &[Vec3], alpha: f32) -> Option<Vec3> {
        let last = points.len().checked_sub(1)?;
        let index = (alpha.clamp(0.0, 1.0) * last as f32).floor() as usize;
        points.get(index.min(last)).copied()
    }

    /// Slices the source by index: `floor(a * n) .. floor(b * n)`.
    fn become_partial(
        &mut self,
        points: &mut Vec<Vec3>,
        source: &Self,
        source_points: &[Vec3],
        a: f32,
        b: f32,
    ) {
        let n = source_points.len();
        let at = |x: f32| ((x.clamp(0.0, 1.0) * n as f32).floor() as usize).min(n);
        let (lower, upper) = (at(a), at(b));
        if lower >= upper {
            points.clear();
            self.rgbas.clear();
            return;
        }
        *points = source_points[lower..upper].to_vec();
        self.rgbas = source.rgbas.get(lower..upper).map(<[_]>::to_vec).unwrap_or_default();
    }

    fn interpolate_style(&mut self, start: &Self, end: &Self, alpha: f32) {
        self.rgbas = start
            .rgbas
            .iter()
            .zip(&end.rgbas)
            .map(|(&a, &b)| blend_color(a, b, alpha))
            .collect();
        self.stroke_width = blend_scalar(start.stroke_width, end.stroke_width, alpha);
    }
}

impl Scene {
    /// Spawns an empty point cloud with the configured stroke width and color.
    pub fn spawn_point_cloud(&mut self) -> NodeId {
        let shape = Shape::point_cloud(self.config().default_stroke_width);
        self.spawn(shape)
    }

    /// Appends points to a cloud, colored by `colors` or else by the node's
    /// current color.
    pub fn add_points(
        &mut self,
        id: NodeId,
        points: &[Vec3],
        colors: Option<&[LinearRgba]>,
    ) -> Result<()> {
        if let Some(colors) = colors {
            if colors.len() != points.len() {
                return Err(StructuralError::MismatchedColorCount {
                    points: points.len(),
                    colors: colors.len(),
                }
                .into());
            }
        }
        let node = self.node_mut(id)?;
        let fill = node.color;
        node.points.extend_from_slice(points);
        if let Shape::PointCloud(style) = &mut node.shape {
            match colors {
                Some(colors) => style.rgbas.extend_from_slice(colors),
                None => style.rgbas.extend(std::iter::repeat(fill).take(points.len())),
            }
        }
        Ok(())
    }

    /// Sets the stroke width of the node, and of its family with points when
    /// `family` is set.
    pub fn set_stroke_width(&mut self, id: NodeId, width: f32, family: bool) -> Result<()> {
        let members = if family {
            self.family_with_points(id)?
        } else {
            vec![id]
        };
        for member in members {
            self.node_mut(member)?.shape.set_stroke_width(width);
        }
        Ok(())
    }

    /// Removes every point of every cloud in the family for which `condition`
    /// holds.
    pub fn filter_out<F>(&mut self, id: NodeId, condition: F) -> Result<()>
    where
        F: Fn(Vec3) -> bool,
    {
        self.for_each_cloud(id, |points, _| {
            (0..points.len()).filter(|&i| !condition(points[i])).collect()
        })
    }

    /// Keeps every `factor`-th point of every cloud in the family.
    pub fn thin_out(&mut self, id: NodeId, factor: usize) -> Result<()> {
        if factor == 0 {
            log::warn!("Ignoring thin_out of {id} with factor 0");
            return Ok(());
        }
        self.for_each_cloud(id, |points, _| (0..points.len()).step_by(factor).collect())
    }

    /// Orders every cloud's points (and colors) by ascending `key`.
    pub fn sort_points<F>(&mut self, id: NodeId, key: F) -> Result<()>
    where
        F: Fn(Vec3) -> f32,
    {
        self.for_each_cloud(id, |points, _| {
            let mut indices: Vec<usize> = (0..points.len()).collect();
            indices.sort_by(|&a, &b| key(points[a]).total_cmp(&key(points[b])));
            indices
        })
    }

    /// Aligns the two trees and copies `other`'s per-point colors onto the
    /// corresponding clouds of `id`.
    pub fn match_colors(&mut self, id: NodeId, other: NodeId) -> Result<()> {
        self.align_data(id, other)?;
        let pairs: Vec<(NodeId, NodeId)> = self
            .family(id)?
            .iter()
            .copied()
            .zip(self.family(other)?.iter().copied())
            .collect();
        for (mine, theirs) in pairs {
            let Some(rgbas) = self.node(theirs)?.shape.rgbas().map(<[_]>::to_vec) else {
                continue;
            };
            if let Shape::PointCloud(style) = &mut self.node_mut(mine)?.shape {
                style.rgbas = rgbas;
            }
        }
        Ok(())
    }

    /// Every point color of the family, in family order. Members that are not
    /// clouds contribute their node color once per point.
    pub fn all_rgbas(&self, id: NodeId) -> Result<Vec<LinearRgba>> {
        let mut colors = Vec::new();
        for member in self.family(id)? {
            let node = self.node(*member)?;
            match node.shape.rgbas() {
                Some(rgbas) => colors.extend_from_slice(rgbas),
                None => colors.extend(std::iter::repeat(node.color).take(node.points.len())),
            }
        }
        Ok(colors)
    }

    /// Merges the points and colors of the whole family into the cloud itself
    /// and drops the children.
    pub fn ingest_children(&mut self, id: NodeId) -> Result<()> {
        let points = self.all_points(id)?;
        let rgbas = self.all_rgbas(id)?;
        let node = self.node_mut(id)?;
        let kind = node.shape.kind();
        let Shape::PointCloud(style) = &mut node.shape else {
            return Err(StructuralError::KindMismatch {
                left: kind,
                right: ShapeKind::PointCloud,
            }
            .into());
        };
        style.rgbas = rgbas;
        node.points = points;
        self.release_children(id)
    }

    /// Runs a reindexing over every cloud in the family with points. `select`
    /// returns the indices to keep, in their new order.
    fn for_each_cloud<F>(&mut self, id: NodeId, mut select: F) -> Result<()>
    where
        F: FnMut(&[Vec3], &CloudStyle) -> Vec<usize>,
    {
        for member in self.family_with_points(id)? {
            let node = self.node_mut(member)?;
            let Shape::PointCloud(style) = &mut node.shape else {
                continue;
            };
            let indices = select(&node.points, style);
            node.points.select(&indices);
            style.rgbas.select(&indices);
        }
        Ok(())
    }
}
