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

//! Pivot-relative affine transforms and layout moves.
//!
//! Every point-wise transform follows the same recipe: pick a pivot, move
//! every point of every family member with points into pivot-relative
//! coordinates, apply the map, and move back. A family without points is left
//! untouched.

use crate::error::{DegenerateGeometryError, Result, StructuralError};
use crate::id::NodeId;
use crate::scene::Scene;
use tessera_core::math::{Mat3, Vec3, PI};

/// The point a transform is anchored at.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Pivot {
    /// The center of the node's bounding box.
    #[default]
    Center,
    /// A fixed point in space.
    Point(Vec3),
    /// The bounding-box point selected by a direction (an edge or corner).
    Edge(Vec3),
}

/// Something to position a node against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    /// Another node's bounding box.
    Node(NodeId),
    /// A fixed point.
    Point(Vec3),
}

impl From<NodeId> for Target {
    fn from(id: NodeId) -> Self {
        Target::Node(id)
    }
}

impl From<Vec3> for Target {
    fn from(point: Vec3) -> Self {
        Target::Point(point)
    }
}

impl Scene {
    /// `true` if any family member owns points.
    pub(crate) fn family_has_points(&self, id: NodeId) -> Result<bool> {
        for &member in self.family(id)? {
            if self.node(member)?.has_points() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn pivot_point(&self, id: NodeId, pivot: Pivot) -> Result<Vec3> {
        match pivot {
            Pivot::Point(point) => Ok(point),
            Pivot::Center => self.bounding_box_point(id, Vec3::ZERO),
            Pivot::Edge(direction) => self.bounding_box_point(id, direction),
        }
    }

    fn target_point(&self, target: Target, direction: Vec3) -> Result<Vec3> {
        match target {
            Target::Point(point) => Ok(point),
            Target::Node(other) => self.bounding_box_point(other, direction),
        }
    }

    /// Applies `f` to every point of the family in pivot-relative coordinates.
    pub fn apply_points_function<F>(&mut self, id: NodeId, pivot: Pivot, mut f: F) -> Result<()>
    where
        F: FnMut(Vec3) -> Vec3,
    {
        let members = self.family_with_points(id)?;
        if members.is_empty() {
            return Ok(());
        }
        let about = self.pivot_point(id, pivot)?;
        for member in members {
            for p in self.node_mut(member)?.points.iter_mut() {
                *p = f(*p - about) + about;
            }
        }
        Ok(())
    }

    /// Moves the whole family by `offset`.
    pub fn shift(&mut self, id: NodeId, offset: Vec3) -> Result<()> {
        for member in self.family(id)?.to_vec() {
            for p in self.node_mut(member)?.points.iter_mut() {
                *p += offset;
            }
        }
        Ok(())
    }

    /// Uniform scale about `pivot`.
    pub fn scale(&mut self, id: NodeId, factor: f32, pivot: Pivot) -> Result<()> {
        self.apply_points_function(id, pivot, |p| p * factor)
    }

    /// Rotation by `angle` radians about `axis` through `pivot`.
    pub fn rotate(&mut self, id: NodeId, angle: f32, axis: Vec3, pivot: Pivot) -> Result<()> {
        let rotation = Mat3::from_axis_angle(axis, angle);
        self.apply_points_function(id, pivot, |p| rotation * p)
    }

    /// Half-turn about `axis` through `pivot`.
    pub fn flip(&mut self, id: NodeId, axis: Vec3, pivot: Pivot) -> Result<()> {
        self.rotate(id, PI, axis, pivot)
    }

    /// Scales only coordinate `dim` about `pivot`.
    pub fn stretch(&mut self, id: NodeId, factor: f32, dim: usize, pivot: Pivot) -> Result<()> {
        self.apply_points_function(id, pivot, |mut p| {
            p[dim] *= factor;
            p
        })
    }

    /// Applies an arbitrary point map about the origin.
    pub fn apply_function<F>(&mut self, id: NodeId, f: F) -> Result<()>
    where
        F: FnMut(Vec3) -> Vec3,
    {
        self.apply_points_function(id, Pivot::Point(Vec3::ORIGIN), f)
    }

    /// Applies a linear map about the origin.
    pub fn apply_matrix(&mut self, id: NodeId, matrix: Mat3) -> Result<()> {
        self.apply_matrix_about(id, matrix, Pivot::Point(Vec3::ORIGIN))
    }

    /// Applies a linear map about `pivot`.
    pub fn apply_matrix_about(&mut self, id: NodeId, matrix: Mat3, pivot: Pivot) -> Result<()> {
        self.apply_points_function(id, pivot, |p| matrix * p)
    }

    /// Moves the family so its bounding-box center is at the origin.
    pub fn center_on_origin(&mut self, id: NodeId) -> Result<()> {
        if !self.family_has_points(id)? {
            return Ok(());
        }
        let center = self.center(id)?;
        self.shift(id, -center)
    }

    /// Scales (or, with `stretch`, stretches along `dim` only) about the center
    /// so the extent along `dim` becomes `length`. A node with zero extent is
    /// left as is.
    pub fn rescale_to_fit(&mut self, id: NodeId, length: f32, dim: usize, stretch: bool) -> Result<()> {
        let old_length = self.length_over_dim(id, dim)?;
        if old_length == 0.0 {
            log::warn!("Cannot rescale {id} along axis {dim}: it has zero extent");
            return Ok(());
        }
        if stretch {
            self.stretch(id, length / old_length, dim, Pivot::Center)
        } else {
            self.scale(id, length / old_length, Pivot::Center)
        }
    }

    /// Rescales to the given width.
    pub fn set_width(&mut self, id: NodeId, width: f32, stretch: bool) -> Result<()> {
        self.rescale_to_fit(id, width, 0, stretch)
    }

    /// Rescales to the given height.
    pub fn set_height(&mut self, id: NodeId, height: f32, stretch: bool) -> Result<()> {
        self.rescale_to_fit(id, height, 1, stretch)
    }

    /// Rescales to the given depth.
    pub fn set_depth(&mut self, id: NodeId, depth: f32, stretch: bool) -> Result<()> {
        self.rescale_to_fit(id, depth, 2, stretch)
    }

    /// Shifts along `dim` so the bounding-box point selected by `direction`
    /// has coordinate `value`.
    pub fn set_coord(&mut self, id: NodeId, value: f32, dim: usize, direction: Vec3) -> Result<()> {
        if !self.family_has_points(id)? {
            return Ok(());
        }
        let current = self.coord(id, dim, direction)?;
        let mut offset = Vec3::ZERO;
        offset[dim] = value - current;
        self.shift(id, offset)
    }

    /// Shifts so the node's `aligned_edge` point lands on the target's
    /// `aligned_edge` point (or on the target point itself).
    pub fn move_to(&mut self, id: NodeId, target: impl Into<Target>, aligned_edge: Vec3) -> Result<()> {
        if !self.family_has_points(id)? {
            return Ok(());
        }
        let target = self.target_point(target.into(), aligned_edge)?;
        let current = self.bounding_box_point(id, aligned_edge)?;
        self.shift(id, target - current)
    }

    /// Places the node beside `target` along `direction`, `buff` apart, with
    /// the `aligned_edge` sides flush. `buff` defaults to the configured
    /// node-to-node buffer.
    pub fn next_to(
        &mut self,
        id: NodeId,
        target: impl Into<Target>,
        direction: Vec3,
        buff: Option<f32>,
        aligned_edge: Vec3,
    ) -> Result<()> {
        if !self.family_has_points(id)? {
            return Ok(());
        }
        let buff = buff.unwrap_or(self.config().node_to_node_buffer);
        let target = self.target_point(target.into(), aligned_edge + direction)?;
        let current = self.bounding_box_point(id, aligned_edge - direction)?;
        self.shift(id, target - current + direction * buff)
    }

    /// Lines up the node's `direction` side with the target's, on each axis
    /// where `direction` is non-zero.
    pub fn align_to(&mut self, id: NodeId, target: impl Into<Target>, direction: Vec3) -> Result<()> {
        if !self.family_has_points(id)? {
            return Ok(());
        }
        let point = self.target_point(target.into(), direction)?;
        for dim in 0..3 {
            if direction[dim] != 0.0 {
                self.set_coord(id, point[dim], dim, direction)?;
            }
        }
        Ok(())
    }

    fn align_on_border(&mut self, id: NodeId, direction: Vec3, buff: Option<f32>) -> Result<()> {
        if !self.family_has_points(id)? {
            return Ok(());
        }
        let config = self.config();
        let buff = buff.unwrap_or(config.node_to_edge_buffer);
        let frame = Vec3::new(config.frame_x_radius, config.frame_y_radius, 0.0);
        let sign = direction.sign();
        let target = sign * frame;
        let current = self.bounding_box_point(id, direction)?;
        let offset = (target - current - direction * buff) * sign.abs();
        self.shift(id, offset)
    }

    /// Moves the node against the frame edge facing `edge`, `buff` inside it.
    pub fn to_edge(&mut self, id: NodeId, edge: Vec3, buff: Option<f32>) -> Result<()> {
        self.align_on_border(id, edge, buff)
    }

    /// Moves the node into the frame corner facing `corner`, `buff` inside it.
    pub fn to_corner(&mut self, id: NodeId, corner: Vec3, buff: Option<f32>) -> Result<()> {
        self.align_on_border(id, corner, buff)
    }

    /// `true` if the bounding box lies entirely outside the frame.
    pub fn is_off_screen(&self, id: NodeId) -> Result<bool> {
        let bounds = self.bounding_box(id)?;
        let config = self.config();
        Ok(bounds.min.x > config.frame_x_radius
            || bounds.max.x < -config.frame_x_radius
            || bounds.min.y > config.frame_y_radius
            || bounds.max.y < -config.frame_y_radius)
    }

    /// Pulls the node back inside the frame on every side it overhangs.
    pub fn shift_onto_screen(&mut self, id: NodeId, buff: Option<f32>) -> Result<()> {
        if !self.family_has_points(id)? {
            return Ok(());
        }
        let buff = buff.unwrap_or(self.config().node_to_edge_buffer);
        let radii = [self.config().frame_x_radius, self.config().frame_y_radius];
        for direction in [Vec3::UP, Vec3::DOWN, Vec3::LEFT, Vec3::RIGHT] {
            let max_value = radii[direction.dominant_axis()] - buff;
            if self.edge(id, direction)?.dot(direction) > max_value {
                self.to_edge(id, direction, Some(buff))?;
            }
        }
        Ok(())
    }

    /// Takes `other`'s place: rescaled to its extent along `dim` (or stretched
    /// to its width and height) and centered on it.
    pub fn fit_to(&mut self, id: NodeId, other: NodeId, dim: usize, stretch: bool) -> Result<()> {
        let target = self.node(other)?;
        if !target.has_points() && target.children.is_empty() {
            return Err(StructuralError::EmptyReplacement { node: other }.into());
        }
        if !self.family_has_points(id)? {
            return Ok(());
        }
        if stretch {
            let width = self.width(other)?;
            let height = self.height(other)?;
            self.rescale_to_fit(id, width, 0, true)?;
            self.rescale_to_fit(id, height, 1, true)?;
        } else {
            let length = self.length_over_dim(other, dim)?;
            self.rescale_to_fit(id, length, dim, false)?;
        }
        let offset = self.center(other)? - self.center(id)?;
        self.shift(id, offset)
    }

    /// Like [`fit_to`](Self::fit_to), then grown so `buff` is left around
    /// `other` along `dim`.
    pub fn surround(
        &mut self,
        id: NodeId,
        other: NodeId,
        dim: usize,
        stretch: bool,
        buff: f32,
    ) -> Result<()> {
        self.fit_to(id, other, dim, stretch)?;
        let length = self.length_over_dim(other, dim)?;
        if length == 0.0 {
            log::warn!("Cannot surround {other} along axis {dim}: it has zero extent");
            return Ok(());
        }
        self.scale(id, (length + buff) / length, Pivot::Center)
    }

    /// Spreads the children apart by `factor` while keeping each child's size.
    pub fn space_out_children(&mut self, id: NodeId, factor: f32) -> Result<()> {
        self.scale(id, factor, Pivot::Center)?;
        for child in self.children(id)?.to_vec() {
            self.scale(child, 1.0 / factor, Pivot::Center)?;
        }
        Ok(())
    }

    /// Scales and rotates the node about its first point, then shifts it, so
    /// its first and last points land on `start` and `end`.
    pub fn put_start_and_end_on(&mut self, id: NodeId, start: Vec3, end: Vec3) -> Result<()> {
        let current_start = self.start(id)?;
        let current_end = self.end(id)?;
        let current = current_end - current_start;
        if current == Vec3::ZERO {
            return Err(DegenerateGeometryError::ZeroLengthSegment { node: id }.into());
        }
        let target = end - start;
        let about = Pivot::Point(current_start);
        self.scale(id, target.length() / current.length(), about)?;
        self.rotate(id, target.angle_xy() - current.angle_xy(), Vec3::OUT, about)?;
        self.shift(id, start - current_start)
    }

    /// Reverses the point order of every family member.
    pub fn reverse_points(&mut self, id: NodeId) -> Result<()> {
        for member in self.family_with_points(id)? {
            let node = self.node_mut(member)?;
            node.shape.apply_to_point_arrays(&mut node.points, |arr| arr.reverse());
        }
        Ok(())
    }

    /// Repeats the point list of every family member `count` times.
    pub fn repeat_points(&mut self, id: NodeId, count: usize) -> Result<()> {
        for member in self.family_with_points(id)? {
            let node = self.node_mut(member)?;
            node.shape.apply_to_point_arrays(&mut node.points, |arr| arr.repeat(count));
        }
        Ok(())
    }

    /// Rescales to `other`'s extent along `dim`.
    pub fn match_dim_size(&mut self, id: NodeId, other: NodeId, dim: usize, stretch: bool) -> Result<()> {
        let length = self.length_over_dim(other, dim)?;
        self.rescale_to_fit(id, length, dim, stretch)
    }

    /// Rescales to `other`'s width.
    pub fn match_width(&mut self, id: NodeId, other: NodeId, stretch: bool) -> Result<()> {
        self.match_dim_size(id, other, 0, stretch)
    }

    /// Rescales to `other`'s height.
    pub fn match_height(&mut self, id: NodeId, other: NodeId, stretch: bool) -> Result<()> {
        self.match_dim_size(id, other, 1, stretch)
    }

    /// Rescales to `other`'s depth.
    pub fn match_depth(&mut self, id: NodeId, other: NodeId, stretch: bool) -> Result<()> {
        self.match_dim_size(id, other, 2, stretch)
    }

    /// Shifts along `dim` to share `other`'s coordinate at `direction`.
    pub fn match_coord(&mut self, id: NodeId, other: NodeId, dim: usize, direction: Vec3) -> Result<()> {
        let value = self.coord(other, dim, direction)?;
        self.set_coord(id, value, dim, direction)
    }
}
