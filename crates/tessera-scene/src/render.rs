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

//! Draw-ready data extracted from a subtree.
//!
//! A renderer asks for [`RenderBatch`]es: contiguous vertex buffers, each tied
//! to a [`Material`]. Consecutive nodes that share a material end up in the
//! same batch.

use crate::error::Result;
use crate::id::NodeId;
use crate::scene::Scene;
use crate::shape::{Shape, POINTS_PER_CURVE};
use bytemuck::{Pod, Zeroable};
use tessera_core::curve::quadratic_approximation_of_cubic;

/// One vertex as uploaded to the GPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct RenderVertex {
    /// World-space position.
    pub position: [f32; 3],
    /// Linear RGBA color.
    pub color: [f32; 4],
}

/// How a batch's vertices are to be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// Consecutive triples of quadratic Bezier control points.
    QuadraticStroke,
    /// One dot per vertex.
    Points,
}

/// The rendering configuration shared by every vertex of a batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Vertex interpretation.
    pub primitive: Primitive,
    /// Stroke width for strokes, dot radius for points.
    pub stroke_width: f32,
}

/// A contiguous vertex buffer with its material.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderBatch {
    /// Shared rendering configuration.
    pub material: Material,
    /// The vertices, in draw order.
    pub vertices: Vec<RenderVertex>,
}

impl RenderBatch {
    /// The vertex buffer as raw bytes, ready for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

impl Scene {
    /// The batches for `root` and its descendants, depth first with each node
    /// before its children.
    ///
    /// A node whose render data is locked contributes its frozen batches in
    /// place of its live subtree.
    pub fn render_batches(&self, root: NodeId) -> Result<Vec<RenderBatch>> {
        let mut batches = Vec::new();
        self.collect_batches(root, &mut batches)?;
        Ok(batches)
    }

    fn collect_batches(&self, id: NodeId, batches: &mut Vec<RenderBatch>) -> Result<()> {
        let node = self.node(id)?;
        if let Some(locked) = &node.locked_batches {
            for batch in locked {
                push_batch(batches, batch.material, &batch.vertices);
            }
            return Ok(());
        }
        if let Some((material, vertices)) = self.node_vertices(id)? {
            push_batch(batches, material, &vertices);
        }
        for &child in &node.children {
            self.collect_batches(child, batches)?;
        }
        Ok(())
    }

    fn node_vertices(&self, id: NodeId) -> Result<Option<(Material, Vec<RenderVertex>)>> {
        let node = self.node(id)?;
        let out = match &node.shape {
            Shape::Group => None,
            Shape::Curve(style) => {
                let color = node.color.to_array();
                let vertices = node
                    .points
                    .chunks_exact(POINTS_PER_CURVE)
                    .flat_map(|c| quadratic_approximation_of_cubic(c[0], c[1], c[2], c[3]))
                    .map(|p| RenderVertex {
                        position: p.to_array(),
                        color,
                    })
                    .collect();
                let material = Material {
                    primitive: Primitive::QuadraticStroke,
                    stroke_width: style.stroke_width,
                };
                Some((material, vertices))
            }
            Shape::PointCloud(style) => {
                let vertices = node
                    .points
                    .iter()
                    .zip(&style.rgbas)
                    .map(|(p, c)| RenderVertex {
                        position: p.to_array(),
                        color: c.to_array(),
                    })
                    .collect();
                let material = Material {
                    primitive: Primitive::Points,
                    stroke_width: style.stroke_width,
                };
                Some((material, vertices))
            }
        };
        Ok(out)
    }

    /// Freezes the current batches of `root`'s subtree. Until
    /// [`unlock_render_data`](Self::unlock_render_data), edits to the subtree
    /// no longer show up in [`render_batches`](Self::render_batches).
    pub fn lock_render_data(&mut self, root: NodeId) -> Result<()> {
        let batches = self.render_batches(root)?;
        log::trace!("Locked {} render batches on {root}", batches.len());
        self.node_mut(root)?.locked_batches = Some(batches);
        Ok(())
    }

    /// Releases data frozen by [`lock_render_data`](Self::lock_render_data).
    pub fn unlock_render_data(&mut self, root: NodeId) -> Result<()> {
        self.node_mut(root)?.locked_batches = None;
        Ok(())
    }
}

/// Appends `vertices`, merging into the last batch when the material matches.
fn push_batch(batches: &mut Vec<RenderBatch>, material: Material, vertices: &[RenderVertex]) {
    if vertices.is_empty() {
        return;
    }
    match batches.last_mut() {
        Some(last) if last.material == material => last.vertices.extend_from_slice(vertices),
        _ => batches.push(RenderBatch {
            material,
            vertices: vertices.to_vec(),
        }),
    }
}
