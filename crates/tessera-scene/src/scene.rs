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

//! The scene arena and its structural operations.
//!
//! Every structural mutation ends by re-deriving the `family` of the changed
//! node and, through the parent back-links, of all its ancestors, so a
//! family is never observed stale.

use crate::config::SceneConfig;
use crate::error::{Result, StructuralError};
use crate::id::{NodeArena, NodeId};
use crate::node::Node;
use crate::shape::Shape;
use tessera_core::math::Vec3;

/// Owns every node and is the only way to mutate them.
pub struct Scene {
    pub(crate) nodes: NodeArena,
    config: SceneConfig,
    pub(crate) next_updater_id: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// An empty scene with the default configuration.
    pub fn new() -> Self {
        Self::with_config(SceneConfig::default())
    }

    /// An empty scene with the given configuration.
    pub fn with_config(config: SceneConfig) -> Self {
        Self {
            nodes: NodeArena::default(),
            config,
            next_updater_id: 0,
        }
    }

    /// The configuration this scene was built with.
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` if the scene has no live nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `true` if `id` addresses a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(id)
    }

    /// Ids of all live nodes, in slot order.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.ids().collect()
    }

    /// Nodes that have no parent.
    pub fn roots(&self) -> Vec<NodeId> {
        self.nodes
            .ids()
            .filter(|&id| self.nodes.get(id).is_some_and(|n| n.parents.is_empty()))
            .collect()
    }

    // --- Spawning ---

    /// Creates a node with no points and no children.
    pub fn spawn(&mut self, shape: Shape) -> NodeId {
        let mut node = Node::new(shape);
        node.color = self.config.default_color;
        let id = self.nodes.insert(node);
        if let Some(node) = self.nodes.get_mut(id) {
            node.family = vec![id];
        }
        log::trace!("Spawned {id}");
        id
    }

    /// Creates an empty group.
    pub fn spawn_group(&mut self) -> NodeId {
        self.spawn(Shape::Group)
    }

    /// Creates a group holding `children`.
    pub fn group_of(&mut self, children: &[NodeId]) -> Result<NodeId> {
        self.check_alive(children)?;
        let group = self.spawn_group();
        self.add(group, children)?;
        Ok(group)
    }

    // --- Access ---

    /// The node behind `id`.
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes
            .get(id)
            .ok_or_else(|| StructuralError::MissingNode(id).into())
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| StructuralError::MissingNode(id).into())
    }

    fn check_alive(&self, ids: &[NodeId]) -> Result<()> {
        match ids.iter().find(|&&id| !self.contains(id)) {
            Some(&missing) => Err(StructuralError::MissingNode(missing).into()),
            None => Ok(()),
        }
    }

    /// Direct children of `id`.
    pub fn children(&self, id: NodeId) -> Result<&[NodeId]> {
        Ok(&self.node(id)?.children)
    }

    /// Nodes listing `id` as a child.
    pub fn parents(&self, id: NodeId) -> Result<&[NodeId]> {
        Ok(&self.node(id)?.parents)
    }

    /// `id` followed by every descendant, depth first.
    pub fn family(&self, id: NodeId) -> Result<&[NodeId]> {
        Ok(&self.node(id)?.family)
    }

    /// The members of the family that own at least one point.
    pub fn family_with_points(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let mut members = Vec::new();
        for &member in self.family(id)? {
            if self.node(member)?.has_points() {
                members.push(member);
            }
        }
        Ok(members)
    }

    /// The node itself if it owns points, followed by its children.
    pub fn split(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let node = self.node(id)?;
        let own = node.has_points().then_some(id);
        Ok(own.into_iter().chain(node.children.iter().copied()).collect())
    }

    /// Renames a node.
    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) -> Result<()> {
        self.node_mut(id)?.name = name.into();
        Ok(())
    }

    /// Replaces the node's own points. Point clouds keep one color per point:
    /// existing colors are kept for the leading points and new points take the
    /// node color.
    pub fn set_points(&mut self, id: NodeId, points: Vec<Vec3>) -> Result<()> {
        let node = self.node_mut(id)?;
        let fill = node.color;
        if let Shape::PointCloud(style) = &mut node.shape {
            style.rgbas.resize(points.len(), fill);
        }
        node.points = points;
        Ok(())
    }

    /// Removes all of the node's own points.
    pub fn clear_points(&mut self, id: NodeId) -> Result<()> {
        self.set_points(id, Vec::new())
    }

    /// Replaces the node's shape. Per-point data of the new shape is sized to
    /// the existing points.
    pub fn set_shape(&mut self, id: NodeId, shape: Shape) -> Result<()> {
        let node = self.node_mut(id)?;
        node.shape = shape;
        let points = std::mem::take(&mut node.points);
        self.set_points(id, points)
    }

    // --- Structure ---

    /// Fails if `child` is `parent` or one of its ancestors.
    fn check_can_adopt(&self, parent: NodeId, child: NodeId) -> Result<()> {
        if child == parent || self.family(child)?.contains(&parent) {
            return Err(StructuralError::Cycle { parent, child }.into());
        }
        Ok(())
    }

    /// Appends `children` to `parent`. Children it already has are skipped.
    ///
    /// Fails without changing anything if any child is `parent` itself or one
    /// of its ancestors.
    pub fn add(&mut self, parent: NodeId, children: &[NodeId]) -> Result<()> {
        self.node(parent)?;
        for &child in children {
            self.check_can_adopt(parent, child)?;
        }
        for &child in children {
            let list = &mut self.node_mut(parent)?.children;
            if !list.contains(&child) {
                list.push(child);
            }
            let back = &mut self.node_mut(child)?.parents;
            if !back.contains(&parent) {
                back.push(parent);
            }
        }
        self.assemble_family(parent)
    }

    /// Puts `children` at the front of `parent`'s child list, moving any that
    /// were already present.
    pub fn add_to_back(&mut self, parent: NodeId, children: &[NodeId]) -> Result<()> {
        let mut list = children.to_vec();
        list.extend(
            self.children(parent)?
                .iter()
                .filter(|c| !children.contains(c))
                .copied(),
        );
        self.set_children(parent, &list)
    }

    /// Detaches `children` from `parent`. Ids that are not children are
    /// ignored. Detached nodes stay alive as roots.
    pub fn remove(&mut self, parent: NodeId, children: &[NodeId]) -> Result<()> {
        self.node(parent)?;
        self.check_alive(children)?;
        for &child in children {
            self.node_mut(parent)?.children.retain(|&c| c != child);
            self.node_mut(child)?.parents.retain(|&p| p != parent);
        }
        self.assemble_family(parent)
    }

    /// Swaps the child at `index` for `new_child`.
    ///
    /// The old child loses `parent` from its back-links and `new_child` gains
    /// it. If `new_child` was already a child elsewhere it is moved.
    pub fn replace_child(&mut self, parent: NodeId, index: usize, new_child: NodeId) -> Result<()> {
        let len = self.children(parent)?.len();
        if index >= len {
            return Err(StructuralError::ChildIndexOutOfRange { parent, index, len }.into());
        }
        self.check_can_adopt(parent, new_child)?;

        let list = &mut self.node_mut(parent)?.children;
        let old = std::mem::replace(&mut list[index], new_child);
        let mut position = 0;
        list.retain(|&c| {
            let keep = c != new_child || position == index;
            position += 1;
            keep
        });
        let old_still_child = list.contains(&old);

        if !old_still_child {
            self.node_mut(old)?.parents.retain(|&p| p != parent);
        }
        let back = &mut self.node_mut(new_child)?.parents;
        if !back.contains(&parent) {
            back.push(parent);
        }
        self.assemble_family(parent)
    }

    /// Replaces the whole child list. Duplicates keep their first position.
    pub fn set_children(&mut self, parent: NodeId, children: &[NodeId]) -> Result<()> {
        self.node(parent)?;
        for &child in children {
            self.check_can_adopt(parent, child)?;
        }
        let current = self.children(parent)?.to_vec();
        self.remove(parent, &current)?;
        self.add(parent, children)
    }

    /// Re-derives `family` for `id` and then for every ancestor.
    pub(crate) fn assemble_family(&mut self, id: NodeId) -> Result<()> {
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            let node = self.node(current)?;
            let mut family = vec![current];
            for &child in &node.children {
                family.extend_from_slice(&self.node(child)?.family);
            }
            let parents = node.parents.clone();
            log::trace!("Re-derived family of {current}: {} members", family.len());
            self.node_mut(current)?.family = family;
            pending.extend(parents);
        }
        Ok(())
    }

    // --- Copies ---

    /// A detached copy of the node alone: points, shape, color, name and
    /// updaters, but no children.
    pub(crate) fn copy_leaf(&mut self, id: NodeId) -> Result<NodeId> {
        let source = self.node(id)?;
        let mut node = Node::new(source.shape.clone());
        node.name = source.name.clone();
        node.points = source.points.clone();
        node.color = source.color;
        node.updaters = source.updaters.clone();
        node.updating_suspended = source.updating_suspended;
        let copy = self.nodes.insert(node);
        self.node_mut(copy)?.family = vec![copy];
        Ok(copy)
    }

    /// Deep copy of a subtree. The copy is a new root; updaters are shared
    /// with the original by identity.
    pub fn copy(&mut self, id: NodeId) -> Result<NodeId> {
        let copy = self.copy_leaf(id)?;
        let children = self.children(id)?.to_vec();
        let mut copies = Vec::with_capacity(children.len());
        for child in children {
            copies.push(self.copy(child)?);
        }
        self.add(copy, &copies)?;
        Ok(copy)
    }

    // --- Release ---

    /// Removes a node from every parent and releases it together with every
    /// descendant no longer owned by another parent.
    pub fn despawn(&mut self, id: NodeId) -> Result<()> {
        let parents = self.parents(id)?.to_vec();
        for parent in parents {
            self.node_mut(parent)?.children.retain(|&c| c != id);
            self.assemble_family(parent)?;
        }
        self.release(id);
        Ok(())
    }

    /// Detaches every child, releasing those left without a parent.
    pub(crate) fn release_children(&mut self, id: NodeId) -> Result<()> {
        let children = std::mem::take(&mut self.node_mut(id)?.children);
        for child in children {
            self.release_from(child, id);
        }
        self.assemble_family(id)
    }

    /// Drops `parent` from `child`'s back-links and releases the child if that
    /// was its last owner.
    fn release_from(&mut self, child: NodeId, parent: NodeId) {
        let orphaned = match self.nodes.get_mut(child) {
            Some(node) => {
                node.parents.retain(|&p| p != parent);
                node.parents.is_empty()
            }
            None => false,
        };
        if orphaned {
            self.release(child);
        }
    }

    fn release(&mut self, id: NodeId) {
        let Some(node) = self.nodes.remove(id) else {
            return;
        };
        log::trace!("Released {id}");
        if let Some(saved) = node.saved_state {
            self.release(saved);
        }
        for child in node.children {
            self.release_from(child, id);
        }
    }
}
