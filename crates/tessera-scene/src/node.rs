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

//! The per-node record stored in the scene arena.

use crate::id::NodeId;
use crate::render::RenderBatch;
use crate::shape::{Shape, ShapeKind};
use crate::updater::UpdaterSet;
use tessera_core::math::{LinearRgba, Vec3};

/// A node of the scene graph: ordered points, a color, a shape family and
/// an ordered list of children.
///
/// Nodes are owned by a [`Scene`](crate::Scene) and addressed through
/// [`NodeId`]s. The structural fields are read-only from outside the crate so
/// that every mutation goes through the scene, which keeps `family` and the
/// parent back-links consistent.
#[derive(Clone)]
pub struct Node {
    pub(crate) name: String,
    pub(crate) points: Vec<Vec3>,
    pub(crate) shape: Shape,
    pub(crate) color: LinearRgba,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parents: Vec<NodeId>,
    pub(crate) family: Vec<NodeId>,
    pub(crate) updaters: UpdaterSet,
    pub(crate) updating_suspended: bool,
    pub(crate) saved_state: Option<NodeId>,
    pub(crate) locked_batches: Option<Vec<RenderBatch>>,
}

impl Node {
    /// A node with no points and no children. Its family is filled in when the
    /// scene assigns it an id.
    pub(crate) fn new(shape: Shape) -> Self {
        Self {
            name: shape.kind().to_string(),
            points: Vec::new(),
            shape,
            color: LinearRgba::WHITE,
            children: Vec::new(),
            parents: Vec::new(),
            family: Vec::new(),
            updaters: UpdaterSet::default(),
            updating_suspended: false,
            saved_state: None,
            locked_batches: None,
        }
    }

    /// A display name, defaulting to the kind name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The node's own points, not including descendants.
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Number of the node's own points.
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// `true` if the node itself owns points.
    pub fn has_points(&self) -> bool {
        !self.points.is_empty()
    }

    /// The shape family and its style data.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Shorthand for `shape().kind()`.
    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    /// The node-level color. Point clouds also carry per-point colors.
    pub fn color(&self) -> LinearRgba {
        self.color
    }

    /// Direct children in order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Every node that currently lists this one as a child.
    pub fn parents(&self) -> &[NodeId] {
        &self.parents
    }

    /// This node followed by all descendants, depth first.
    pub fn family(&self) -> &[NodeId] {
        &self.family
    }

    /// `true` while [`Scene::suspend_updating`](crate::Scene::suspend_updating)
    /// is in effect.
    pub fn is_updating_suspended(&self) -> bool {
        self.updating_suspended
    }

    /// `true` if render data is frozen by
    /// [`Scene::lock_render_data`](crate::Scene::lock_render_data).
    pub fn is_render_data_locked(&self) -> bool {
        self.locked_batches.is_some()
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .field("points", &self.points.len())
            .field("children", &self.children)
            .field("parents", &self.parents)
            .field("updaters", &self.updaters.len())
            .field("updating_suspended", &self.updating_suspended)
            .finish()
    }
}
