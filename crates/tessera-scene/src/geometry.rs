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

//! Read-only geometric queries over a node and its family.
//!
//! Nothing here is cached: the bounding box is recomputed from the live points
//! on every call.

use crate::error::{DegenerateGeometryError, Result};
use crate::id::NodeId;
use crate::scene::Scene;
use tessera_core::math::{Aabb, Vec3};

impl Scene {
    /// Every point of the family, in family order.
    pub fn all_points(&self, id: NodeId) -> Result<Vec<Vec3>> {
        let mut points = Vec::new();
        for &member in self.family(id)? {
            points.extend_from_slice(&self.node(member)?.points);
        }
        Ok(points)
    }

    /// Number of the node's own points.
    pub fn num_points(&self, id: NodeId) -> Result<usize> {
        Ok(self.node(id)?.points.len())
    }

    /// `true` if the node itself owns points.
    pub fn has_points(&self, id: NodeId) -> Result<bool> {
        Ok(self.node(id)?.has_points())
    }

    /// The axis-aligned box around every point of the family. A family with
    /// no points measures as the degenerate box at the origin.
    pub fn bounding_box(&self, id: NodeId) -> Result<Aabb> {
        Ok(Aabb::from_points(self.all_points(id)?).unwrap_or(Aabb::ORIGIN))
    }

    /// A point of the bounding box picked per axis by the sign of `direction`:
    /// negative selects the minimum, zero the middle and positive the maximum.
    ///
    /// Fails when the family has no points to bound.
    pub fn bounding_box_point(&self, id: NodeId, direction: Vec3) -> Result<Vec3> {
        let bounds = Aabb::from_points(self.all_points(id)?)
            .ok_or(DegenerateGeometryError::EmptyBoundingBox { node: id })?;
        Ok(bounds.point_toward(direction))
    }

    /// The middle of the bounding box.
    pub fn center(&self, id: NodeId) -> Result<Vec3> {
        self.bounding_box_point(id, Vec3::ZERO)
    }

    /// The middle of the edge (or face) facing `direction`. With a diagonal
    /// direction this is a corner.
    pub fn edge(&self, id: NodeId, direction: Vec3) -> Result<Vec3> {
        self.bounding_box_point(id, direction)
    }

    /// Shorthand for `edge(id, UP)`.
    pub fn top(&self, id: NodeId) -> Result<Vec3> {
        self.edge(id, Vec3::UP)
    }

    /// Shorthand for `edge(id, DOWN)`.
    pub fn bottom(&self, id: NodeId) -> Result<Vec3> {
        self.edge(id, Vec3::DOWN)
    }

    /// Shorthand for `edge(id, LEFT)`.
    pub fn left(&self, id: NodeId) -> Result<Vec3> {
        self.edge(id, Vec3::LEFT)
    }

    /// Shorthand for `edge(id, RIGHT)`.
    pub fn right(&self, id: NodeId) -> Result<Vec3> {
        self.edge(id, Vec3::RIGHT)
    }

    /// Extent of the bounding box along axis `dim`.
    pub fn length_over_dim(&self, id: NodeId, dim: usize) -> Result<f32> {
        Ok(self.bounding_box(id)?.length_over_dim(dim))
    }

    /// Extent along x.
    pub fn width(&self, id: NodeId) -> Result<f32> {
        self.length_over_dim(id, 0)
    }

    /// Extent along y.
    pub fn height(&self, id: NodeId) -> Result<f32> {
        self.length_over_dim(id, 1)
    }

    /// Extent along z.
    pub fn depth(&self, id: NodeId) -> Result<f32> {
        self.length_over_dim(id, 2)
    }

    /// One coordinate of a bounding-box point.
    pub fn coord(&self, id: NodeId, dim: usize, direction: Vec3) -> Result<f32> {
        Ok(self.bounding_box_point(id, direction)?[dim])
    }

    fn own_point(&self, id: NodeId, operation: &'static str, last: bool) -> Result<Vec3> {
        let points = &self.node(id)?.points;
        let point = if last { points.last() } else { points.first() };
        point
            .copied()
            .ok_or_else(|| DegenerateGeometryError::NoPoints { node: id, operation }.into())
    }

    /// The node's first own point.
    pub fn start(&self, id: NodeId) -> Result<Vec3> {
        self.own_point(id, "start", false)
    }

    /// The node's last own point.
    pub fn end(&self, id: NodeId) -> Result<Vec3> {
        self.own_point(id, "end", true)
    }

    /// Mean of every point of the family.
    pub fn center_of_mass(&self, id: NodeId) -> Result<Vec3> {
        let points = self.all_points(id)?;
        if points.is_empty() {
            return Err(DegenerateGeometryError::NoPoints {
                node: id,
                operation: "center_of_mass",
            }
            .into());
        }
        let count = points.len() as f32;
        Ok(points.into_iter().sum::<Vec3>() / count)
    }

    /// The family point reaching furthest along `direction`. Ties keep the
    /// first such point.
    pub fn boundary_point(&self, id: NodeId, direction: Vec3) -> Result<Vec3> {
        let points = self.all_points(id)?;
        let mut best: Option<(f32, Vec3)> = None;
        for p in points {
            let reach = p.dot(direction);
            if best.map_or(true, |(b, _)| reach > b) {
                best = Some((reach, p));
            }
        }
        best.map(|(_, p)| p).ok_or_else(|| {
            DegenerateGeometryError::NoPoints {
                node: id,
                operation: "boundary_point",
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SceneError;

    fn scene_with_box() -> (Scene, NodeId, NodeId) {
        let mut scene = Scene::new();
        let root = scene.spawn_group();
        let child = scene.spawn_point_cloud();
        scene
            .set_points(
                child,
                vec![Vec3::new(-1.0, 0.0, 0.0), Vec3::new(3.0, 2.0, 1.0), Vec3::new(0.0, -2.0, 0.0)],
            )
            .unwrap();
        scene.add(root, &[child]).unwrap();
        (scene, root, child)
    }

    #[test]
    fn test_bounding_box_covers_family() {
        let (scene, root, _) = scene_with_box();
        let bounds = scene.bounding_box(root).unwrap();
        assert_eq!(bounds.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(3.0, 2.0, 1.0));
        assert_eq!(scene.center(root).unwrap(), Vec3::new(1.0, 0.0, 0.5));
        assert_eq!(scene.width(root).unwrap(), 4.0);
        assert_eq!(scene.height(root).unwrap(), 4.0);
        assert_eq!(scene.depth(root).unwrap(), 1.0);
    }

    #[test]
    fn test_directional_points() {
        let (scene, root, _) = scene_with_box();
        assert_eq!(scene.coord(root, 0, Vec3::LEFT).unwrap(), -1.0);
        assert_eq!(scene.coord(root, 0, Vec3::RIGHT).unwrap(), 3.0);
        assert_eq!(scene.coord(root, 0, Vec3::ZERO).unwrap(), 1.0);
        assert_eq!(scene.top(root).unwrap(), Vec3::new(1.0, 2.0, 0.5));
        assert_eq!(
            scene.edge(root, Vec3::DOWN + Vec3::LEFT).unwrap(),
            Vec3::new(-1.0, -2.0, 0.5)
        );
    }

    #[test]
    fn test_empty_family_has_origin_box_but_no_points() {
        let mut scene = Scene::new();
        let empty = scene.spawn_group();
        assert_eq!(scene.bounding_box(empty).unwrap(), Aabb::ORIGIN);
        assert_eq!(scene.width(empty).unwrap(), 0.0);
        assert!(matches!(
            scene.center(empty).unwrap_err(),
            SceneError::DegenerateGeometry(DegenerateGeometryError::EmptyBoundingBox { .. })
        ));
        assert!(scene.start(empty).is_err());
        assert!(scene.center_of_mass(empty).is_err());
    }

    #[test]
    fn test_point_queries() {
        let (scene, root, child) = scene_with_box();
        assert_eq!(scene.start(child).unwrap(), Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(scene.end(child).unwrap(), Vec3::new(0.0, -2.0, 0.0));
        assert!(scene.start(root).is_err());
        assert_eq!(scene.boundary_point(root, Vec3::UP).unwrap(), Vec3::new(3.0, 2.0, 1.0));
        let com = scene.center_of_mass(root).unwrap();
        assert!((com.x - 2.0 / 3.0).abs() < 1e-6);
        assert_eq!(scene.all_points(root).unwrap().len(), 3);
    }
}
