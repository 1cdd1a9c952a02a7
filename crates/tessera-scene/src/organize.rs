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

//! Layout and reordering of a node's children.

use crate::error::Result;
use crate::id::NodeId;
use crate::scene::Scene;
use rand::seq::SliceRandom;
use rand::Rng;
use tessera_core::math::Vec3;

/// How [`Scene::arrange_in_grid`] shapes the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridLayout {
    /// This many rows, filled left to right.
    Rows(usize),
    /// This many columns, filled top to bottom.
    Cols(usize),
    /// `floor(sqrt(n))` columns.
    #[default]
    Auto,
}

impl Scene {
    /// Places each child next to the previous one along `direction`, `buff`
    /// apart, then optionally centers the whole group on the origin.
    pub fn arrange(&mut self, id: NodeId, direction: Vec3, buff: Option<f32>, center: bool) -> Result<()> {
        let children = self.children(id)?.to_vec();
        for pair in children.windows(2) {
            self.next_to(pair[1], pair[0], direction, buff, Vec3::ZERO)?;
        }
        if center {
            self.center_on_origin(id)?;
        }
        Ok(())
    }

    /// Lays the children out in a grid centered on the origin.
    pub fn arrange_in_grid(&mut self, id: NodeId, layout: GridLayout, buff: Option<f32>) -> Result<()> {
        let children = self.children(id)?.to_vec();
        if children.is_empty() {
            return Ok(());
        }
        let (inner, outer, lines) = match layout {
            GridLayout::Rows(rows) => (Vec3::RIGHT, Vec3::DOWN, rows),
            GridLayout::Cols(cols) => (Vec3::DOWN, Vec3::RIGHT, cols),
            GridLayout::Auto => {
                let cols = (children.len() as f32).sqrt().floor() as usize;
                (Vec3::DOWN, Vec3::RIGHT, cols)
            }
        };
        let per_line = (children.len() / lines.max(1)).max(1);
        log::debug!(
            "Arranging {} children of {id} in lines of {per_line}",
            children.len()
        );

        // Temporary groups hold each line; the children stay owned by `id`.
        let grid = self.spawn_group();
        for chunk in children.chunks(per_line) {
            let line = self.spawn_group();
            self.add(line, chunk)?;
            self.arrange(line, inner, buff, false)?;
            self.add(grid, &[line])?;
        }
        self.arrange(grid, outer, buff, false)?;
        self.despawn(grid)?;
        self.center_on_origin(id)
    }

    /// Reorders the children by `key` evaluated at each child's center.
    /// The sort is stable.
    pub fn sort<F>(&mut self, id: NodeId, key: F) -> Result<()>
    where
        F: Fn(Vec3) -> f32,
    {
        let mut keyed = Vec::new();
        for &child in self.children(id)? {
            keyed.push((key(self.bounding_box(child)?.mid()), child));
        }
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
        self.node_mut(id)?.children = keyed.into_iter().map(|(_, child)| child).collect();
        self.assemble_family(id)
    }

    /// Shuffles the children with the caller's random source, and with
    /// `recursive` every descendant's children too.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, id: NodeId, rng: &mut R, recursive: bool) -> Result<()> {
        let mut children = self.children(id)?.to_vec();
        children.shuffle(rng);
        self.node_mut(id)?.children = children.clone();
        self.assemble_family(id)?;
        if recursive {
            for child in children {
                self.shuffle(child, rng, true)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn squares(scene: &mut Scene, n: usize) -> Vec<NodeId> {
        (0..n)
            .map(|_| {
                let square = scene.spawn_curve();
                scene
                    .set_points_as_corners(
                        square,
                        &[
                            Vec3::ZERO,
                            Vec3::X,
                            Vec3::new(1.0, 1.0, 0.0),
                            Vec3::Y,
                            Vec3::ZERO,
                        ],
                    )
                    .unwrap();
                square
            })
            .collect()
    }

    #[test]
    fn test_arrange_left_to_right_and_center() {
        let mut scene = Scene::new();
        let items = squares(&mut scene, 3);
        let row = scene.group_of(&items).unwrap();
        scene.arrange(row, Vec3::RIGHT, Some(1.0), true).unwrap();

        assert_abs_diff_eq!(scene.width(row).unwrap(), 5.0, epsilon = 1e-5);
        assert_abs_diff_eq!(scene.center(row).unwrap(), Vec3::ZERO, epsilon = 1e-5);
        assert_abs_diff_eq!(scene.center(items[1]).unwrap(), Vec3::ZERO, epsilon = 1e-5);
        assert!(scene.center(items[0]).unwrap().x < scene.center(items[2]).unwrap().x);
    }

    #[test]
    fn test_arrange_in_grid_rows() {
        let mut scene = Scene::new();
        let items = squares(&mut scene, 6);
        let group = scene.group_of(&items).unwrap();
        let before = scene.len();
        scene
            .arrange_in_grid(group, GridLayout::Rows(2), Some(0.0))
            .unwrap();

        assert_abs_diff_eq!(scene.width(group).unwrap(), 3.0, epsilon = 1e-5);
        assert_abs_diff_eq!(scene.height(group).unwrap(), 2.0, epsilon = 1e-5);
        // First row is on top.
        assert!(scene.center(items[0]).unwrap().y > scene.center(items[3]).unwrap().y);
        // Temporary groups are gone and the children keep a single parent.
        assert_eq!(scene.len(), before);
        assert_eq!(scene.parents(items[4]).unwrap(), &[group]);
    }

    #[test]
    fn test_arrange_in_grid_auto_columns() {
        let mut scene = Scene::new();
        let items = squares(&mut scene, 4);
        let group = scene.group_of(&items).unwrap();
        scene.arrange_in_grid(group, GridLayout::Auto, Some(0.0)).unwrap();
        assert_abs_diff_eq!(scene.width(group).unwrap(), 2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(scene.height(group).unwrap(), 2.0, epsilon = 1e-5);
        // Columns fill top to bottom.
        assert!(scene.center(items[0]).unwrap().y > scene.center(items[1]).unwrap().y);
    }

    #[test]
    fn test_sort_by_position_rederives_family() {
        let mut scene = Scene::new();
        let items = squares(&mut scene, 3);
        scene.shift(items[0], Vec3::X * 4.0).unwrap();
        scene.shift(items[2], Vec3::X * -4.0).unwrap();
        let group = scene.group_of(&items).unwrap();
        scene.sort(group, |p| p.x).unwrap();
        assert_eq!(scene.children(group).unwrap(), &[items[2], items[1], items[0]]);
        assert_eq!(
            scene.family(group).unwrap(),
            &[group, items[2], items[1], items[0]]
        );
    }

    #[test]
    fn test_shuffle_is_deterministic_with_seeded_rng() {
        let mut scene = Scene::new();
        let items = squares(&mut scene, 8);
        let a = scene.group_of(&items).unwrap();
        let b = scene.copy(a).unwrap();

        scene.shuffle(a, &mut StdRng::seed_from_u64(7), false).unwrap();
        let mut shuffled: Vec<NodeId> = scene.children(a).unwrap().to_vec();
        shuffled.sort();
        assert_eq!(shuffled, items);

        // Same seed, same permutation.
        let order_b: Vec<usize> = {
            let copies = scene.children(b).unwrap().to_vec();
            scene.shuffle(b, &mut StdRng::seed_from_u64(7), false).unwrap();
            let after = scene.children(b).unwrap();
            after
                .iter()
                .map(|c| copies.iter().position(|x| x == c).unwrap())
                .collect()
        };
        let order_a: Vec<usize> = scene
            .children(a)
            .unwrap()
            .iter()
            .map(|c| items.iter().position(|x| x == c).unwrap())
            .collect();
        assert_eq!(order_a, order_b);
        assert_eq!(scene.family(a).unwrap().len(), 9);
    }
}
