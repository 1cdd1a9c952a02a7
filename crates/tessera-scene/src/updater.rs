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

//! Per-node update scheduling.
//!
//! Each node keeps two ordered lists: time-based updaters, called with the
//! frame delta, and state-based updaters, called with no time argument.
//! [`Scene::update`] runs them in registration order, parent before children.

use crate::error::Result;
use crate::id::NodeId;
use crate::scene::Scene;
use std::rc::Rc;

/// Signature of a time-based updater.
pub type TimeUpdateFn = dyn Fn(&mut Scene, NodeId, f32) -> Result<()>;
/// Signature of a state-based updater.
pub type StateUpdateFn = dyn Fn(&mut Scene, NodeId) -> Result<()>;

/// A callback attached to a node and driven by [`Scene::update`].
///
/// The closure is reference counted: copying a node shares its updaters with
/// the copy rather than duplicating them.
#[derive(Clone)]
pub enum Updater {
    /// Receives the frame delta in seconds.
    Timed(Rc<TimeUpdateFn>),
    /// Receives no time argument.
    State(Rc<StateUpdateFn>),
}

impl Updater {
    /// Wraps a time-based closure.
    pub fn timed<F>(f: F) -> Self
    where
        F: Fn(&mut Scene, NodeId, f32) -> Result<()> + 'static,
    {
        Updater::Timed(Rc::new(f))
    }

    /// Wraps a state-based closure.
    pub fn state<F>(f: F) -> Self
    where
        F: Fn(&mut Scene, NodeId) -> Result<()> + 'static,
    {
        Updater::State(Rc::new(f))
    }

    /// `true` for [`Updater::Timed`].
    pub fn is_time_based(&self) -> bool {
        matches!(self, Updater::Timed(_))
    }
}

impl std::fmt::Debug for Updater {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Updater::Timed(_) => f.write_str("Updater::Timed"),
            Updater::State(_) => f.write_str("Updater::State"),
        }
    }
}

/// Identity of a registered updater, used for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UpdaterId(u64);

impl std::fmt::Display for UpdaterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "updater#{}", self.0)
    }
}

/// The two ordered updater lists of a node.
#[derive(Clone, Default)]
pub(crate) struct UpdaterSet {
    time_based: Vec<(UpdaterId, Rc<TimeUpdateFn>)>,
    state_based: Vec<(UpdaterId, Rc<StateUpdateFn>)>,
}

impl UpdaterSet {
    pub(crate) fn len(&self) -> usize {
        self.time_based.len() + self.state_based.len()
    }

    fn insert(&mut self, id: UpdaterId, updater: Updater, index: Option<usize>) {
        fn place<T>(list: &mut Vec<T>, item: T, index: Option<usize>) {
            match index {
                Some(i) => list.insert(i.min(list.len()), item),
                None => list.push(item),
            }
        }
        match updater {
            Updater::Timed(f) => place(&mut self.time_based, (id, f), index),
            Updater::State(f) => place(&mut self.state_based, (id, f), index),
        }
    }

    fn remove(&mut self, id: UpdaterId) -> bool {
        let before = self.len();
        self.time_based.retain(|(u, _)| *u != id);
        self.state_based.retain(|(u, _)| *u != id);
        self.len() != before
    }

    fn ids(&self) -> impl Iterator<Item = UpdaterId> + '_ {
        self.time_based
            .iter()
            .map(|(id, _)| *id)
            .chain(self.state_based.iter().map(|(id, _)| *id))
    }
}

impl Scene {
    fn next_updater_id(&mut self) -> UpdaterId {
        let id = UpdaterId(self.next_updater_id);
        self.next_updater_id += 1;
        id
    }

    /// Appends an updater to the node. With `call_now`, the node is updated
    /// once with a zero delta right away.
    pub fn add_updater(&mut self, id: NodeId, updater: Updater, call_now: bool) -> Result<UpdaterId> {
        self.insert_updater(id, updater, None, call_now)
    }

    /// Like [`add_updater`](Self::add_updater), inserting at `index` within the
    /// updater's list (clamped to its length) instead of appending.
    pub fn insert_updater(
        &mut self,
        id: NodeId,
        updater: Updater,
        index: Option<usize>,
        call_now: bool,
    ) -> Result<UpdaterId> {
        self.node(id)?;
        let updater_id = self.next_updater_id();
        self.node_mut(id)?.updaters.insert(updater_id, updater, index);
        log::trace!("Registered {updater_id} on {id}");
        if call_now {
            self.update(id, 0.0, true)?;
        }
        Ok(updater_id)
    }

    /// Removes an updater from the node. Returns `false` if it was not
    /// registered there.
    pub fn remove_updater(&mut self, id: NodeId, updater: UpdaterId) -> Result<bool> {
        Ok(self.node_mut(id)?.updaters.remove(updater))
    }

    /// Drops every updater of the node, and of its whole family with
    /// `recursive`.
    pub fn clear_updaters(&mut self, id: NodeId, recursive: bool) -> Result<()> {
        let members = if recursive {
            self.family(id)?.to_vec()
        } else {
            vec![id]
        };
        for member in members {
            self.node_mut(member)?.updaters = UpdaterSet::default();
        }
        Ok(())
    }

    /// Replaces the node's updaters with `other`'s, shared by identity.
    pub fn match_updaters(&mut self, id: NodeId, other: NodeId) -> Result<()> {
        let updaters = self.node(other)?.updaters.clone();
        self.node_mut(id)?.updaters = updaters;
        Ok(())
    }

    /// The node's updaters: time-based first, then state-based.
    pub fn updaters(&self, id: NodeId) -> Result<Vec<UpdaterId>> {
        Ok(self.node(id)?.updaters.ids().collect())
    }

    /// `true` if the node has at least one time-based updater.
    pub fn has_time_based_updater(&self, id: NodeId) -> Result<bool> {
        Ok(!self.node(id)?.updaters.time_based.is_empty())
    }

    /// Updaters of every family member, in family order.
    pub fn family_updaters(&self, id: NodeId) -> Result<Vec<UpdaterId>> {
        let mut all = Vec::new();
        for &member in self.family(id)? {
            all.extend(self.node(member)?.updaters.ids());
        }
        Ok(all)
    }

    /// Runs the node's time-based updaters with `dt`, then its state-based
    /// updaters, then (with `recursive`) updates each child the same way.
    ///
    /// A suspended node is skipped together with its subtree. The first
    /// failing updater aborts the pass.
    pub fn update(&mut self, id: NodeId, dt: f32, recursive: bool) -> Result<()> {
        let node = self.node(id)?;
        if node.updating_suspended {
            return Ok(());
        }
        // Updaters may edit this node's lists, so iterate over a snapshot.
        let updaters = node.updaters.clone();
        for (updater_id, f) in &updaters.time_based {
            log::trace!("Running {updater_id} on {id} (dt = {dt})");
            f(self, id, dt)?;
        }
        for (updater_id, f) in &updaters.state_based {
            log::trace!("Running {updater_id} on {id}");
            f(self, id)?;
        }
        if recursive {
            for child in self.children(id)?.to_vec() {
                self.update(child, dt, true)?;
            }
        }
        Ok(())
    }

    /// Suspends updating for the whole family.
    pub fn suspend_updating(&mut self, id: NodeId) -> Result<()> {
        self.set_updating_suspended(id, true)
    }

    /// Lifts suspension for the whole family and immediately runs an update
    /// with a zero delta.
    pub fn resume_updating(&mut self, id: NodeId) -> Result<()> {
        self.set_updating_suspended(id, false)?;
        self.update(id, 0.0, true)
    }

    fn set_updating_suspended(&mut self, id: NodeId, suspended: bool) -> Result<()> {
        for member in self.family(id)?.to_vec() {
            self.node_mut(member)?.updating_suspended = suspended;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{SceneError, StructuralError};
    use std::cell::RefCell;
    use tessera_core::math::Vec3;

    type Log = Rc<RefCell<Vec<String>>>;

    fn recorder(log: &Log, label: &'static str) -> Updater {
        let log = Rc::clone(log);
        Updater::state(move |_, _| {
            log.borrow_mut().push(label.to_string());
            Ok(())
        })
    }

    #[test]
    fn test_timed_before_state_in_registration_order() {
        let mut scene = Scene::new();
        let node = scene.spawn_group();
        let log: Log = Rc::default();
        scene.add_updater(node, recorder(&log, "state-a"), false).unwrap();
        let timed_log = Rc::clone(&log);
        scene
            .add_updater(
                node,
                Updater::timed(move |_, _, dt| {
                    timed_log.borrow_mut().push(format!("timed {dt}"));
                    Ok(())
                }),
                false,
            )
            .unwrap();
        scene.add_updater(node, recorder(&log, "state-b"), false).unwrap();

        scene.update(node, 0.5, true).unwrap();
        assert_eq!(*log.borrow(), ["timed 0.5", "state-a", "state-b"]);
    }

    #[test]
    fn test_parent_runs_before_children() {
        let mut scene = Scene::new();
        let parent = scene.spawn_group();
        let child = scene.spawn_group();
        scene.add(parent, &[child]).unwrap();
        let log: Log = Rc::default();
        scene.add_updater(child, recorder(&log, "child"), false).unwrap();
        scene.add_updater(parent, recorder(&log, "parent"), false).unwrap();

        scene.update(parent, 0.1, true).unwrap();
        assert_eq!(*log.borrow(), ["parent", "child"]);

        log.borrow_mut().clear();
        scene.update(parent, 0.1, false).unwrap();
        assert_eq!(*log.borrow(), ["parent"]);
    }

    #[test]
    fn test_insert_at_index() {
        let mut scene = Scene::new();
        let node = scene.spawn_group();
        let log: Log = Rc::default();
        scene.add_updater(node, recorder(&log, "second"), false).unwrap();
        scene
            .insert_updater(node, recorder(&log, "first"), Some(0), false)
            .unwrap();
        scene
            .insert_updater(node, recorder(&log, "last"), Some(99), false)
            .unwrap();
        scene.update(node, 0.0, false).unwrap();
        assert_eq!(*log.borrow(), ["first", "second", "last"]);
    }

    #[test]
    fn test_suspend_and_resume() {
        let mut scene = Scene::new();
        let parent = scene.spawn_group();
        let child = scene.spawn_group();
        scene.add(parent, &[child]).unwrap();
        let log: Log = Rc::default();
        scene.add_updater(child, recorder(&log, "child"), false).unwrap();

        scene.suspend_updating(parent).unwrap();
        assert!(scene.node(child).unwrap().is_updating_suspended());
        scene.update(parent, 1.0, true).unwrap();
        scene.update(child, 1.0, true).unwrap();
        assert!(log.borrow().is_empty());

        scene.resume_updating(parent).unwrap();
        assert_eq!(*log.borrow(), ["child"]);
    }

    #[test]
    fn test_remove_by_identity() {
        let mut scene = Scene::new();
        let node = scene.spawn_group();
        let log: Log = Rc::default();
        let a = scene.add_updater(node, recorder(&log, "a"), false).unwrap();
        scene.add_updater(node, recorder(&log, "b"), false).unwrap();
        assert!(scene.remove_updater(node, a).unwrap());
        assert!(!scene.remove_updater(node, a).unwrap());
        scene.update(node, 0.0, true).unwrap();
        assert_eq!(*log.borrow(), ["b"]);
    }

    #[test]
    fn test_call_now_and_geometry_mutation() {
        let mut scene = Scene::new();
        let dot = scene.spawn_point_cloud();
        scene.add_points(dot, &[Vec3::ZERO], None).unwrap();
        scene
            .add_updater(
                dot,
                Updater::timed(|scene, id, dt| scene.shift(id, Vec3::X * dt)),
                true,
            )
            .unwrap();
        assert_eq!(scene.start(dot).unwrap(), Vec3::ZERO);
        assert!(scene.has_time_based_updater(dot).unwrap());
        scene.update(dot, 2.0, true).unwrap();
        assert_eq!(scene.start(dot).unwrap(), Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_copies_share_updaters() {
        let mut scene = Scene::new();
        let node = scene.spawn_group();
        let log: Log = Rc::default();
        let id = scene.add_updater(node, recorder(&log, "x"), false).unwrap();
        let copy = scene.copy(node).unwrap();
        assert_eq!(scene.updaters(copy).unwrap(), vec![id]);

        let other = scene.spawn_group();
        scene.match_updaters(other, node).unwrap();
        assert_eq!(scene.family_updaters(other).unwrap(), vec![id]);
        scene.clear_updaters(node, true).unwrap();
        assert!(scene.updaters(node).unwrap().is_empty());
        assert_eq!(scene.updaters(copy).unwrap(), vec![id]);
    }

    #[test]
    fn test_first_error_aborts_pass() {
        let mut scene = Scene::new();
        let node = scene.spawn_group();
        let log: Log = Rc::default();
        scene
            .add_updater(
                node,
                Updater::state(|_, id| Err(StructuralError::NoSavedState(id).into())),
                false,
            )
            .unwrap();
        scene.add_updater(node, recorder(&log, "after"), false).unwrap();
        let err = scene.update(node, 0.0, true).unwrap_err();
        assert!(matches!(err, SceneError::Structural(StructuralError::NoSavedState(_))));
        assert!(log.borrow().is_empty());
    }
}
