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

//! Node and per-point colors.

use crate::error::{Result, StructuralError};
use crate::id::NodeId;
use crate::scene::Scene;
use crate::shape::{blend_color, Shape};
use tessera_core::math::{saturate, LinearRgba, Vec3};

impl Scene {
    fn color_targets(&self, id: NodeId, family: bool) -> Result<Vec<NodeId>> {
        if family {
            Ok(self.family(id)?.to_vec())
        } else {
            self.node(id)?;
            Ok(vec![id])
        }
    }

    /// Rewrites each targeted node's colors with `f`: the node color and,
    /// for point clouds, every per-point color.
    fn map_colors<F>(&mut self, id: NodeId, family: bool, f: F) -> Result<()>
    where
        F: Fn(LinearRgba) -> LinearRgba,
    {
        for member in self.color_targets(id, family)? {
            let node = self.node_mut(member)?;
            node.color = f(node.color);
            if let Shape::PointCloud(style) = &mut node.shape {
                for rgba in style.rgbas.iter_mut() {
                    *rgba = f(*rgba);
                }
            }
        }
        Ok(())
    }

    /// Sets the node color, and every per-point color of point clouds. With
    /// `family`, descendants are recolored too.
    pub fn set_color(&mut self, id: NodeId, color: LinearRgba, family: bool) -> Result<()> {
        self.map_colors(id, family, |_| color)
    }

    /// The node's color. For a point cloud with points this is the color of
    /// its first point.
    pub fn color(&self, id: NodeId) -> Result<LinearRgba> {
        let node = self.node(id)?;
        Ok(node
            .shape
            .rgbas()
            .and_then(|rgbas| rgbas.first().copied())
            .unwrap_or(node.color))
    }

    /// Moves the current colors toward `color` by `alpha`.
    pub fn fade_to(&mut self, id: NodeId, color: LinearRgba, alpha: f32, family: bool) -> Result<()> {
        self.map_colors(id, family, |current| blend_color(current, color, alpha))
    }

    /// Scales opacity by `1 - darkness`; a darkness of 1 makes the node fully
    /// transparent.
    pub fn fade(&mut self, id: NodeId, darkness: f32, family: bool) -> Result<()> {
        let keep = 1.0 - saturate(darkness);
        self.map_colors(id, family, |current| current.with_alpha(current.a * keep))
    }

    /// Spreads `colors` as a gradient over the family.
    ///
    /// A point cloud gets one color per point, per cloud in its family; any
    /// other node gets one color per family member with points. A single
    /// color is the same as [`set_color`](Self::set_color) on the family.
    pub fn set_color_by_gradient(&mut self, id: NodeId, colors: &[LinearRgba]) -> Result<()> {
        match colors {
            [] => Err(StructuralError::EmptyGradient.into()),
            [single] => self.set_color(id, *single, true),
            _ => {
                let members = self.family_with_points(id)?;
                if matches!(self.node(id)?.shape, Shape::PointCloud(_)) {
                    for member in members {
                        let node = self.node_mut(member)?;
                        if let Shape::PointCloud(style) = &mut node.shape {
                            style.rgbas = LinearRgba::gradient(colors, node.points.len());
                        }
                    }
                } else {
                    let gradient = LinearRgba::gradient(colors, members.len());
                    for (member, color) in members.into_iter().zip(gradient) {
                        self.set_color(member, color, false)?;
                    }
                }
                Ok(())
            }
        }
    }

    /// Colors by distance from `center` (the node's center by default):
    /// `inner` at the center, blending to `outer` at `radius` and beyond.
    /// Point clouds are colored per point; other members by their own center.
    pub fn set_colors_by_radial_gradient(
        &mut self,
        id: NodeId,
        center: Option<Vec3>,
        radius: f32,
        inner: LinearRgba,
        outer: LinearRgba,
    ) -> Result<()> {
        if !self.family_has_points(id)? {
            return Ok(());
        }
        let center = match center {
            Some(center) => center,
            None => self.center(id)?,
        };
        let shade = |p: Vec3| {
            let alpha = if radius > 0.0 {
                saturate(p.distance(center) / radius)
            } else {
                1.0
            };
            blend_color(inner, outer, alpha)
        };
        for member in self.family_with_points(id)? {
            let member_center = self.center(member)?;
            let node = self.node_mut(member)?;
            match &mut node.shape {
                Shape::PointCloud(style) => {
                    style.rgbas = node.points.iter().map(|&p| shade(p)).collect();
                }
                _ => node.color = shade(member_center),
            }
        }
        Ok(())
    }

    /// Recolors the whole family with `other`'s color.
    pub fn match_color(&mut self, id: NodeId, other: NodeId) -> Result<()> {
        let color = self.color(other)?;
        self.set_color(id, color, true)
    }
}
