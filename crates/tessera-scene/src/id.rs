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

//! Generational handles and the arena that stores scene nodes.

use crate::node::Node;
use std::fmt;

/// A handle to a node in a [`Scene`](crate::Scene).
///
/// It pairs a slot index with a generation count. When a node is despawned its
/// slot can be recycled, but the generation is bumped, so stale handles to the
/// old node stop resolving instead of silently addressing the new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    /// The slot of the node in the arena.
    pub index: u32,
    /// Incremented each time the slot is recycled.
    pub generation: u32,
}

impl NodeId {
    /// Builds a handle from its parts.
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Slot storage for nodes with a free list for O(1) reuse.
#[derive(Default)]
pub(crate) struct NodeArena {
    slots: Vec<Option<Node>>,
    generations: Vec<u32>,
    free_indices: Vec<u32>,
}

impl NodeArena {
    pub(crate) fn insert(&mut self, node: Node) -> NodeId {
        if let Some(index) = self.free_indices.pop() {
            let slot = index as usize;
            self.slots[slot] = Some(node);
            return NodeId::new(index, self.generations[slot]);
        }
        let index = self.slots.len() as u32;
        self.slots.push(Some(node));
        self.generations.push(0);
        NodeId::new(index, 0)
    }

    #[inline]
    fn slot(&self, id: NodeId) -> Option<usize> {
        let slot = id.index as usize;
        (self.generations.get(slot) == Some(&id.generation)).then_some(slot)
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&Node> {
        self.slot(id).and_then(|slot| self.slots[slot].as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slot(id).and_then(|slot| self.slots[slot].as_mut())
    }

    pub(crate) fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Removes a node and retires its handle.
    pub(crate) fn remove(&mut self, id: NodeId) -> Option<Node> {
        let slot = self.slot(id)?;
        let node = self.slots[slot].take()?;
        self.generations[slot] = self.generations[slot].wrapping_add(1);
        self.free_indices.push(id.index);
        Some(node)
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free_indices.len()
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(index, _)| NodeId::new(index as u32, self.generations[index]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Shape;

    #[test]
    fn test_recycled_slot_invalidates_old_handle() {
        let mut arena = NodeArena::default();
        let a = arena.insert(Node::new(Shape::Group));
        let b = arena.insert(Node::new(Shape::Group));
        assert_eq!(arena.len(), 2);

        assert!(arena.remove(a).is_some());
        assert!(arena.get(a).is_none());
        assert!(arena.remove(a).is_none());

        let c = arena.insert(Node::new(Shape::Group));
        assert_eq!(c.index, a.index);
        assert_ne!(c.generation, a.generation);
        assert!(arena.get(a).is_none());
        assert!(arena.contains(c));
        assert!(arena.contains(b));
        assert_eq!(arena.ids().collect::<Vec<_>>(), vec![c, b]);
    }

    #[test]
    fn test_unknown_index_is_missing() {
        let arena = NodeArena::default();
        assert!(arena.get(NodeId::new(7, 0)).is_none());
    }
}
