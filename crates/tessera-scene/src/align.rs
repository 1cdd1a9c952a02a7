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

//! Structural alignment and morphing between two trees.
//!
//! Two trees can only be blended point by point once they have the same
//! shape: equal child counts at every level and equal point counts at every
//! pair of corresponding nodes. [`Scene::align_data`] establishes that in
//! three passes per level:
//!
//! 1. a root with points facing a root without is demoted, its points moving
//!    into a new last child;
//! 2. the side with fewer children is padded with copies of its own children,
//!    spread round-robin, every extra copy faded out; a side with nothing to
//!    copy takes the other side's children collapsed onto its center;
//! 3. the node with fewer points is resampled up to the larger count.
//!
//! The whole plan is first run on a lightweight [`Sketch`] of both trees so
//! that a missing policy or a kind mismatch is reported before any node is
//! touched.

use crate::error::{DegenerateGeometryError, Result, StructuralError};
use crate::id::NodeId;
use crate::scene::Scene;
use crate::shape::{blend_color, PolicyError, ShapeKind};
use crate::transform::Pivot;
use crate::updater::UpdaterSet;
use tessera_core::math::Vec3;

/// The structure of a subtree as far as alignment cares.
#[derive(Debug, Clone)]
struct Sketch {
    origin: NodeId,
    kind: ShapeKind,
    points: usize,
    children: Vec<Sketch>,
}

impl Sketch {
    fn leaf(&self) -> Sketch {
        Sketch {
            origin: self.origin,
            kind: self.kind,
            points: self.points,
            children: Vec::new(),
        }
    }

    fn push_self_into_children(&mut self) {
        let leaf = self.leaf();
        self.points = 0;
        self.children.push(leaf);
    }

    fn add_n_more_children(&mut self, n: usize) {
        if n == 0 {
            return;
        }
        let curr = self.children.len();
        if curr == 0 {
            self.children = vec![self.leaf(); n];
            return;
        }
        let target = curr + n;
        self.children = (0..target)
            .map(|j| self.children[j * curr / target].clone())
            .collect();
    }

    fn pad_children(&mut self, other: &Sketch, n: usize) {
        if n > 0 && self.children.is_empty() && self.points == 0 {
            self.children = other.children.clone();
        } else {
            self.add_n_more_children(n);
        }
    }

    /// Mirrors [`Scene::align_data`] without touching the scene.
    fn align(left: &mut Sketch, right: &mut Sketch) -> Result<()> {
        if left.points == 0 && right.points > 0 {
            right.push_self_into_children();
        }
        if right.points == 0 && left.points > 0 {
            left.push_self_into_children();
        }

        let (nl, nr) = (left.children.len(), right.children.len());
        if nl < nr {
            left.pad_children(right, nr - nl);
        } else {
            right.pad_children(left, nl - nr);
        }

        if left.points != right.points {
            let smaller = if left.points < right.points { &*left } else { &*right };
            check_resample(smaller.origin, smaller.kind, left.kind, right.kind)?;
            let count = left.points.max(right.points);
            left.points = count;
            right.points = count;
        }

        for (l, r) in left.children.iter_mut().zip(right.children.iter_mut()) {
            Sketch::align(l, r)?;
        }
        Ok(())
    }
}

/// A node of kind `kind` may be resampled to match a counterpart only if it
/// has a policy and both sides are the same kind.
fn check_resample(node: NodeId, kind: ShapeKind, left: ShapeKind, right: ShapeKind) -> Result<()> {
    if kind == ShapeKind::Group {
        return Err(StructuralError::NoAlignmentPolicy { node, kind }.into());
    }
    if left != right {
        return Err(StructuralError::KindMismatch { left, right }.into());
    }
    Ok(())
}

impl Scene {
    fn sketch(&self, id: NodeId) -> Result<Sketch> {
        let node = self.node(id)?;
        let mut children = Vec::with_capacity(node.children.len());
        for &child in &node.children {
            children.push(self.sketch(child)?);
        }
        Ok(Sketch {
            origin: id,
            kind: node.kind(),
            points: node.points.len(),
            children,
        })
    }

    /// Makes `a` and `b` structurally identical so they can be interpolated.
    ///
    /// Fails without changing either tree if some pair of nodes would need
    /// resampling but cannot be resampled: a group with points facing a
    /// different point count, or two nodes of different kinds.
    pub fn align_data(&mut self, a: NodeId, b: NodeId) -> Result<()> {
        let mut left = self.sketch(a)?;
        let mut right = self.sketch(b)?;
        Sketch::align(&mut left, &mut right)?;
        log::debug!("Aligning {a} with {b}");
        self.align_data_recursive(a, b)
    }

    fn align_data_recursive(&mut self, a: NodeId, b: NodeId) -> Result<()> {
        self.null_point_align(a, b)?;
        self.align_children(a, b)?;
        self.align_points(a, b)?;
        let pairs: Vec<(NodeId, NodeId)> = self
            .children(a)?
            .iter()
            .copied()
            .zip(self.children(b)?.iter().copied())
            .collect();
        for (child_a, child_b) in pairs {
            self.align_data_recursive(child_a, child_b)?;
        }
        Ok(())
    }

    /// If exactly one of the two nodes owns points, moves them into a new last
    /// child so both roots are pure containers.
    pub fn null_point_align(&mut self, a: NodeId, b: NodeId) -> Result<()> {
        for (m1, m2) in [(a, b), (b, a)] {
            if !self.node(m1)?.has_points() && self.node(m2)?.has_points() {
                self.push_self_into_children(m2)?;
            }
        }
        Ok(())
    }

    /// Moves the node's own points into a childless copy appended as its last
    /// child. The copy does not inherit updaters.
    pub fn push_self_into_children(&mut self, id: NodeId) -> Result<()> {
        let leaf = self.copy_leaf(id)?;
        self.node_mut(leaf)?.updaters = UpdaterSet::default();
        self.clear_points(id)?;
        self.add(id, &[leaf])?;
        log::debug!("Pushed the points of {id} into new child {leaf}");
        Ok(())
    }

    /// Pads whichever node has fewer children up to the other's count.
    ///
    /// A node with neither points nor children has nothing to duplicate: it
    /// receives copies of the other node's children instead, collapsed onto
    /// its own center.
    pub fn align_children(&mut self, a: NodeId, b: NodeId) -> Result<()> {
        let na = self.children(a)?.len();
        let nb = self.children(b)?.len();
        if na < nb {
            self.pad_children(a, b, nb - na)
        } else {
            self.pad_children(b, a, na - nb)
        }
    }

    fn pad_children(&mut self, id: NodeId, other: NodeId, n: usize) -> Result<()> {
        if n > 0 && self.children(id)?.is_empty() && !self.node(id)?.has_points() {
            return self.fill_with_collapsed_copies(id, other);
        }
        self.add_n_more_children(id, n)
    }

    /// Gives the empty, childless `id` one updater-free copy of each of
    /// `other`'s children, every point moved onto `id`'s center.
    fn fill_with_collapsed_copies(&mut self, id: NodeId, other: NodeId) -> Result<()> {
        let center = self.bounding_box(id)?.mid();
        let originals = self.children(other)?.to_vec();
        let mut copies = Vec::with_capacity(originals.len());
        for original in originals {
            let copy = self.copy(original)?;
            self.clear_updaters(copy, true)?;
            self.scale(copy, 0.0, Pivot::Point(center))?;
            copies.push(copy);
        }
        log::debug!("Filled empty {id} with {} collapsed copies of {other}'s children", copies.len());
        self.add(id, &copies)
    }

    /// [`align_children`](Self::align_children) at every level of both trees.
    pub fn align_family(&mut self, a: NodeId, b: NodeId) -> Result<()> {
        self.align_children(a, b)?;
        let pairs: Vec<(NodeId, NodeId)> = self
            .children(a)?
            .iter()
            .copied()
            .zip(self.children(b)?.iter().copied())
            .collect();
        for (child_a, child_b) in pairs {
            self.align_family(child_a, child_b)?;
        }
        Ok(())
    }

    /// Adds `n` children by duplicating the existing ones round-robin: child
    /// `i` ends up `count(j < curr + n : j * curr / (curr + n) == i)` times,
    /// the original first and its faded copies right after it.
    ///
    /// A childless node gets `n` updater-free copies of itself collapsed onto
    /// its center.
    pub fn add_n_more_children(&mut self, id: NodeId, n: usize) -> Result<()> {
        if n == 0 {
            return Ok(());
        }
        let children = self.children(id)?.to_vec();
        let curr = children.len();
        if curr == 0 {
            let mut copies = Vec::with_capacity(n);
            for _ in 0..n {
                let copy = self.copy_leaf(id)?;
                self.node_mut(copy)?.updaters = UpdaterSet::default();
                self.scale(copy, 0.0, Pivot::Center)?;
                copies.push(copy);
            }
            log::debug!("Filled childless {id} with {n} collapsed copies");
            return self.add(id, &copies);
        }

        let target = curr + n;
        let mut padded = Vec::with_capacity(target);
        let mut previous = None;
        for j in 0..target {
            let index = j * curr / target;
            let original = children[index];
            if previous == Some(index) {
                let copy = self.copy(original)?;
                self.fade(copy, 1.0, true)?;
                self.node_mut(copy)?.parents.push(id);
                padded.push(copy);
            } else {
                padded.push(original);
            }
            previous = Some(index);
        }
        log::debug!("Padded {id} from {curr} to {target} children");
        self.node_mut(id)?.children = padded;
        self.assemble_family(id)
    }

    /// Resamples whichever of the two nodes has fewer points up to the other's
    /// count. An empty node is first seeded at its center.
    pub fn align_points(&mut self, a: NodeId, b: NodeId) -> Result<()> {
        let na = self.node(a)?.num_points();
        let nb = self.node(b)?.num_points();
        if na == nb {
            return Ok(());
        }
        let (smaller, target) = if na < nb { (a, nb) } else { (b, na) };
        let (kind_a, kind_b) = (self.node(a)?.kind(), self.node(b)?.kind());
        check_resample(smaller, self.node(smaller)?.kind(), kind_a, kind_b)?;

        let seed = self.bounding_box(smaller)?.mid();
        let node = self.node_mut(smaller)?;
        let seed_color = node.color;
        log::debug!("Resampling {smaller} from {} to {target} points", node.points.len());
        node.shape
            .stretch_points(&mut node.points, target, seed, seed_color)
            .map_err(|e| e.for_alignment(smaller))
    }

    /// Writes into `target` the blend of two aligned trees: every point moves
    /// along `path` from its place in `start` to its place in `end`, colors
    /// and styles are blended linearly.
    ///
    /// `target` is usually a copy of `start`. All three families must have
    /// the same size and corresponding `start`/`end` nodes the same number of
    /// points; nothing is written otherwise.
    pub fn interpolate<P>(
        &mut self,
        target: NodeId,
        start: NodeId,
        end: NodeId,
        alpha: f32,
        path: P,
    ) -> Result<()>
    where
        P: Fn(Vec3, Vec3, f32) -> Vec3,
    {
        let targets = self.family(target)?.to_vec();
        let starts = self.family(start)?.to_vec();
        let ends = self.family(end)?.to_vec();
        if targets.len() != starts.len() || starts.len() != ends.len() {
            return Err(StructuralError::MismatchedFamilies {
                left: starts.len(),
                right: ends.len().max(targets.len()),
            }
            .into());
        }

        for (&s, &e) in starts.iter().zip(&ends) {
            let (from, to) = (self.node(s)?, self.node(e)?);
            if from.num_points() != to.num_points() {
                return Err(StructuralError::MismatchedPointCounts {
                    node: s,
                    left: from.num_points(),
                    right: to.num_points(),
                }
                .into());
            }
            if !from.has_points() {
                continue;
            }
            check_resample(s, from.kind(), from.kind(), to.kind())?;
        }

        for ((t, s), e) in targets.into_iter().zip(starts).zip(ends) {
            let from = self.node(s)?.clone();
            let to = self.node(e)?;
            let points: Vec<Vec3> = from
                .points
                .iter()
                .zip(&to.points)
                .map(|(&p, &q)| path(p, q, alpha))
                .collect();
            let color = blend_color(from.color, to.color, alpha);
            let end_shape = (from.kind() == to.kind()).then(|| to.shape.clone());

            let node = self.node_mut(t)?;
            node.points = points;
            node.color = color;
            if let Some(end_shape) = end_shape {
                if node.kind() != from.kind() {
                    node.shape = from.shape.clone();
                }
                node.shape
                    .interpolate_style(&from.shape, &end_shape, alpha)
                    .map_err(|e| e.for_alignment(t))?;
            }
        }
        Ok(())
    }

    /// Turns `id` into an exact copy of `other`'s geometry and style, keeping
    /// its identity. Child counts are aligned first; point counts need not
    /// match since points are copied outright.
    pub fn become_like(&mut self, id: NodeId, other: NodeId) -> Result<()> {
        self.align_family(id, other)?;
        let pairs: Vec<(NodeId, NodeId)> = self
            .family(id)?
            .iter()
            .copied()
            .zip(self.family(other)?.iter().copied())
            .collect();
        for (mine, theirs) in pairs {
            let source = self.node(theirs)?;
            let (points, shape, color) = (source.points.clone(), source.shape.clone(), source.color);
            let node = self.node_mut(mine)?;
            node.points = points;
            node.shape = shape;
            node.color = color;
        }
        Ok(())
    }

    /// The point a fraction `alpha` of the way along the node's own points.
    pub fn point_from_proportion(&self, id: NodeId, alpha: f32) -> Result<Vec3> {
        let node = self.node(id)?;
        node.shape
            .point_from_proportion(&node.points, alpha)
            .map_err(|e| e.for_hook("point_from_proportion"))?
            .ok_or_else(|| {
                DegenerateGeometryError::NoPoints {
                    node: id,
                    operation: "point_from_proportion",
                }
                .into()
            })
    }

    /// Replaces the node's points with the portion `[a, b]` of `other`'s.
    pub fn pointwise_become_partial(&mut self, id: NodeId, other: NodeId, a: f32, b: f32) -> Result<()> {
        let source = self.node(other)?;
        let (source_shape, source_points) = (source.shape.clone(), source.points.clone());
        let node = self.node_mut(id)?;
        node.shape
            .become_partial(&mut node.points, &source_shape, &source_points, a, b)
            .map_err(|e| e.for_hook("pointwise_become_partial"))
    }

    /// Splits the node's own shape into `n` consecutive partial copies held by
    /// a new group.
    pub fn pieces(&mut self, id: NodeId, n: usize) -> Result<NodeId> {
        let kind = self.node(id)?.kind();
        if kind == ShapeKind::Group {
            return Err(PolicyError::Missing(kind).for_hook("pointwise_become_partial"));
        }
        let mut pieces = Vec::with_capacity(n);
        for i in 0..n {
            let piece = self.copy_leaf(id)?;
            let a = i as f32 / n as f32;
            let b = (i + 1) as f32 / n as f32;
            self.pointwise_become_partial(piece, id, a, b)?;
            pieces.push(piece);
        }
        self.group_of(&pieces)
    }

    /// Stores a detached copy of the subtree, replacing any earlier one.
    pub fn save_state(&mut self, id: NodeId) -> Result<()> {
        if let Some(previous) = self.node(id)?.saved_state {
            self.despawn(previous)?;
        }
        let snapshot = self.copy(id)?;
        self.node_mut(id)?.saved_state = Some(snapshot);
        log::debug!("Saved state of {id} as {snapshot}");
        Ok(())
    }

    /// Makes the node become its saved copy again.
    pub fn restore(&mut self, id: NodeId) -> Result<()> {
        let snapshot = self
            .node(id)?
            .saved_state
            .ok_or(StructuralError::NoSavedState(id))?;
        self.become_like(id, snapshot)
    }

    /// The saved copy, if any.
    pub fn saved_state(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.node(id)?.saved_state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{NotImplementedError, SceneError};
    use crate::paths::straight_path;
    use approx::assert_abs_diff_eq;
    use tessera_core::math::LinearRgba;

    fn polyline(scene: &mut Scene, corners: &[Vec3]) -> NodeId {
        let id = scene.spawn_curve();
        scene.set_points_as_corners(id, corners).unwrap();
        id
    }

    fn triangle(scene: &mut Scene) -> NodeId {
        polyline(scene, &[Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::ZERO])
    }

    fn square(scene: &mut Scene) -> NodeId {
        polyline(
            scene,
            &[Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y, Vec3::ZERO],
        )
    }

    #[test]
    fn test_align_points_of_two_curves() {
        let mut scene = Scene::new();
        let tri = triangle(&mut scene);
        let sq = square(&mut scene);
        scene.align_data(tri, sq).unwrap();
        assert_eq!(scene.num_points(tri).unwrap(), 16);
        assert_eq!(scene.num_points(sq).unwrap(), 16);
        // Resampling keeps the path.
        assert_abs_diff_eq!(scene.width(tri).unwrap(), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(scene.start(tri).unwrap(), Vec3::ZERO, epsilon = 1e-6);
    }

    #[test]
    fn test_null_point_align_demotes_pointed_root() {
        let mut scene = Scene::new();
        let leaf = triangle(&mut scene);
        let a = square(&mut scene);
        let b = triangle(&mut scene);
        let group = scene.group_of(&[a, b]).unwrap();

        scene.align_data(leaf, group).unwrap();
        assert!(!scene.node(leaf).unwrap().has_points());
        assert_eq!(scene.children(leaf).unwrap().len(), 2);
        let pushed = scene.children(leaf).unwrap()[0];
        let copy = scene.children(leaf).unwrap()[1];
        assert_eq!(scene.node(copy).unwrap().color().a, 0.0);
        assert_eq!(scene.node(pushed).unwrap().color().a, 1.0);
        assert_eq!(scene.num_points(pushed).unwrap(), 16);
    }

    #[test]
    fn test_round_robin_padding() {
        let mut scene = Scene::new();
        let items: Vec<NodeId> = (0..2).map(|_| triangle(&mut scene)).collect();
        let small = scene.group_of(&items).unwrap();
        scene.add_n_more_children(small, 3).unwrap();

        let children = scene.children(small).unwrap().to_vec();
        assert_eq!(children.len(), 5);
        // j * 2 / 5 for j in 0..5 = [0, 0, 0, 1, 1]
        assert_eq!(children[0], items[0]);
        assert_eq!(children[3], items[1]);
        for &copy in &[children[1], children[2], children[4]] {
            assert!(!items.contains(&copy));
            assert_eq!(scene.color(copy).unwrap().a, 0.0);
            assert_eq!(scene.parents(copy).unwrap(), &[small]);
        }
        assert_eq!(scene.family(small).unwrap().len(), 6);
    }

    #[test]
    fn test_childless_padding_collapses_copies() {
        let mut scene = Scene::new();
        let tri = triangle(&mut scene);
        let center = scene.center(tri).unwrap();
        scene.add_n_more_children(tri, 2).unwrap();
        for &child in scene.children(tri).unwrap() {
            assert!(scene.all_points(child).unwrap().iter().all(|&p| p == center));
        }
    }

    #[test]
    fn test_padding_copies_do_not_inherit_updaters() {
        let mut scene = Scene::new();
        let tri = triangle(&mut scene);
        scene
            .add_updater(tri, crate::updater::Updater::state(|_, _| Ok(())), false)
            .unwrap();
        scene.add_n_more_children(tri, 2).unwrap();
        assert_eq!(scene.updaters(tri).unwrap().len(), 1);
        for &child in scene.children(tri).unwrap() {
            assert!(scene.updaters(child).unwrap().is_empty());
        }
    }

    #[test]
    fn test_empty_leaf_takes_collapsed_copies_of_counterpart() {
        let mut scene = Scene::new();
        let empty = scene.spawn_curve();
        let tri = triangle(&mut scene);
        scene
            .add_updater(tri, crate::updater::Updater::state(|_, _| Ok(())), false)
            .unwrap();

        scene.align_data(empty, tri).unwrap();
        assert!(!scene.node(tri).unwrap().has_points());
        let children = scene.children(empty).unwrap().to_vec();
        assert_eq!(children.len(), 1);
        assert_eq!(scene.num_points(children[0]).unwrap(), 12);
        assert!(scene.all_points(children[0]).unwrap().iter().all(|&p| p == Vec3::ZERO));
        assert!(scene.updaters(children[0]).unwrap().is_empty());
    }

    #[test]
    fn test_align_rejects_group_points_without_mutation() {
        let mut scene = Scene::new();
        let g = scene.spawn_group();
        scene.set_points(g, vec![Vec3::ZERO, Vec3::X]).unwrap();
        let tri = triangle(&mut scene);
        let before = scene.len();

        let err = scene.align_data(g, tri).unwrap_err();
        assert!(matches!(
            err,
            SceneError::Structural(StructuralError::NoAlignmentPolicy { node, kind: ShapeKind::Group }) if node == g
        ));
        assert_eq!(scene.len(), before);
        assert_eq!(scene.num_points(g).unwrap(), 2);
    }

    #[test]
    fn test_align_rejects_kind_mismatch() {
        let mut scene = Scene::new();
        let tri = triangle(&mut scene);
        let cloud = scene.spawn_point_cloud();
        scene.add_points(cloud, &[Vec3::ZERO], None).unwrap();
        let err = scene.align_data(cloud, tri).unwrap_err();
        assert!(matches!(
            err,
            SceneError::Structural(StructuralError::KindMismatch {
                left: ShapeKind::PointCloud,
                right: ShapeKind::Curve
            })
        ));
        assert_eq!(scene.num_points(cloud).unwrap(), 1);
    }

    #[test]
    fn test_interpolate_endpoints_and_midpoint() {
        let mut scene = Scene::new();
        let a = triangle(&mut scene);
        let b = square(&mut scene);
        scene.shift(b, Vec3::new(3.0, 0.0, 0.0)).unwrap();
        scene.set_color(b, LinearRgba::RED, true).unwrap();
        scene.set_stroke_width(b, 8.0, false).unwrap();
        scene.align_data(a, b).unwrap();
        let target = scene.copy(a).unwrap();

        scene.interpolate(target, a, b, 0.0, straight_path).unwrap();
        assert_eq!(scene.all_points(target).unwrap(), scene.all_points(a).unwrap());

        scene.interpolate(target, a, b, 1.0, straight_path).unwrap();
        assert_eq!(scene.all_points(target).unwrap(), scene.all_points(b).unwrap());
        assert_eq!(scene.color(target).unwrap(), LinearRgba::RED);
        assert_eq!(scene.node(target).unwrap().shape().stroke_width(), Some(8.0));

        scene.interpolate(target, a, b, 0.5, straight_path).unwrap();
        assert_eq!(scene.node(target).unwrap().shape().stroke_width(), Some(6.0));
    }

    #[test]
    fn test_interpolate_requires_alignment() {
        let mut scene = Scene::new();
        let a = triangle(&mut scene);
        let b = square(&mut scene);
        let err = scene.interpolate(a, a, b, 0.5, straight_path).unwrap_err();
        assert!(matches!(
            err,
            SceneError::Structural(StructuralError::MismatchedPointCounts { left: 12, right: 16, .. })
        ));

        let group = scene.group_of(&[b]).unwrap();
        let err = scene.interpolate(a, a, group, 0.5, straight_path).unwrap_err();
        assert!(matches!(
            err,
            SceneError::Structural(StructuralError::MismatchedFamilies { .. })
        ));
    }

    #[test]
    fn test_become_like_copies_exactly() {
        let mut scene = Scene::new();
        let tri = triangle(&mut scene);
        let parts: Vec<NodeId> = (0..3).map(|_| square(&mut scene)).collect();
        let group = scene.group_of(&parts).unwrap();
        scene.set_color(group, LinearRgba::BLUE, true).unwrap();

        scene.become_like(tri, group).unwrap();
        assert_eq!(scene.children(tri).unwrap().len(), 3);
        assert_eq!(scene.all_points(tri).unwrap(), scene.all_points(group).unwrap());
        assert_eq!(scene.color(scene.children(tri).unwrap()[2]).unwrap(), LinearRgba::BLUE);
    }

    #[test]
    fn test_point_from_proportion_hooks() {
        let mut scene = Scene::new();
        let line = polyline(&mut scene, &[Vec3::ZERO, Vec3::X * 2.0]);
        assert_abs_diff_eq!(
            scene.point_from_proportion(line, 0.5).unwrap(),
            Vec3::X,
            epsilon = 1e-6
        );

        let group = scene.spawn_group();
        let err = scene.point_from_proportion(group, 0.5).unwrap_err();
        assert_eq!(
            err,
            SceneError::NotImplemented(NotImplementedError {
                operation: "point_from_proportion",
                kind: ShapeKind::Group
            })
        );

        let empty = scene.spawn_curve();
        assert!(matches!(
            scene.point_from_proportion(empty, 0.5).unwrap_err(),
            SceneError::DegenerateGeometry(DegenerateGeometryError::NoPoints { .. })
        ));
    }

    #[test]
    fn test_pieces_cover_the_shape() {
        let mut scene = Scene::new();
        let sq = square(&mut scene);
        let pieces = scene.pieces(sq, 4).unwrap();
        let children = scene.children(pieces).unwrap().to_vec();
        assert_eq!(children.len(), 4);
        assert_abs_diff_eq!(
            scene.start(children[0]).unwrap(),
            scene.start(sq).unwrap(),
            epsilon = 1e-6
        );
        assert_abs_diff_eq!(
            scene.end(children[3]).unwrap(),
            scene.end(sq).unwrap(),
            epsilon = 1e-6
        );
        assert_abs_diff_eq!(
            scene.end(children[0]).unwrap(),
            scene.start(children[1]).unwrap(),
            epsilon = 1e-6
        );

        let group = scene.spawn_group();
        assert!(matches!(
            scene.pieces(group, 2).unwrap_err(),
            SceneError::NotImplemented(_)
        ));
    }

    #[test]
    fn test_save_and_restore() {
        let mut scene = Scene::new();
        let sq = square(&mut scene);
        assert!(matches!(
            scene.restore(sq).unwrap_err(),
            SceneError::Structural(StructuralError::NoSavedState(_))
        ));

        let original = scene.all_points(sq).unwrap();
        scene.save_state(sq).unwrap();
        scene.shift(sq, Vec3::UP * 3.0).unwrap();
        scene.set_color(sq, LinearRgba::RED, true).unwrap();
        scene.restore(sq).unwrap();
        assert_eq!(scene.all_points(sq).unwrap(), original);
        assert_eq!(scene.color(sq).unwrap(), LinearRgba::WHITE);

        // Saving again releases the previous snapshot.
        let first = scene.saved_state(sq).unwrap().unwrap();
        scene.save_state(sq).unwrap();
        assert!(!scene.contains(first));
        scene.despawn(sq).unwrap();
        assert!(scene.is_empty());
    }
}
