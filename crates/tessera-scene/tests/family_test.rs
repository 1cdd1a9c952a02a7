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

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tessera_scene::error::StructuralError;
use tessera_scene::{NodeId, Scene, SceneError};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn expected_family(scene: &Scene, id: NodeId) -> Vec<NodeId> {
    let mut family = vec![id];
    for &child in scene.children(id).unwrap() {
        family.extend(expected_family(scene, child));
    }
    family
}

fn assert_families_consistent(scene: &Scene) {
    for id in scene.node_ids() {
        assert_eq!(
            scene.family(id).unwrap(),
            expected_family(scene, id).as_slice(),
            "Family of {id} is stale"
        );
        for &child in scene.children(id).unwrap() {
            assert!(
                scene.parents(child).unwrap().contains(&id),
                "{child} is missing the back-link to {id}"
            );
        }
    }
}

#[test]
fn test_family_stays_consistent_under_random_edits() {
    init_logger();
    // --- 1. ARRANGE ---
    let mut scene = Scene::new();
    let nodes: Vec<NodeId> = (0..12).map(|_| scene.spawn_group()).collect();
    let mut rng = StdRng::seed_from_u64(42);

    // --- 2. ACT & ASSERT ---
    for _ in 0..400 {
        let parent = nodes[rng.gen_range(0..nodes.len())];
        let other = nodes[rng.gen_range(0..nodes.len())];
        let before: Vec<Vec<NodeId>> = nodes
            .iter()
            .map(|&n| scene.children(n).unwrap().to_vec())
            .collect();

        let outcome = match rng.gen_range(0..4) {
            0 => scene.add(parent, &[other]),
            1 => scene.add_to_back(parent, &[other]),
            2 => scene.remove(parent, &[other]),
            _ => {
                let len = scene.children(parent).unwrap().len();
                if len == 0 {
                    Ok(())
                } else {
                    scene.replace_child(parent, rng.gen_range(0..len), other)
                }
            }
        };

        if let Err(err) = outcome {
            assert!(
                matches!(err, SceneError::Structural(StructuralError::Cycle { .. })),
                "Only cycles may be rejected, got {err}"
            );
            let after: Vec<Vec<NodeId>> = nodes
                .iter()
                .map(|&n| scene.children(n).unwrap().to_vec())
                .collect();
            assert_eq!(before, after, "A rejected edit must leave the tree unchanged");
        }
        assert_families_consistent(&scene);
    }
}

#[test]
fn test_self_and_ancestor_adoption_is_rejected() {
    init_logger();
    // --- 1. ARRANGE ---
    let mut scene = Scene::new();
    let root = scene.spawn_group();
    let mid = scene.spawn_group();
    let leaf = scene.spawn_curve();
    scene.add(root, &[mid]).unwrap();
    scene.add(mid, &[leaf]).unwrap();
    let family_before = scene.family(root).unwrap().to_vec();

    // --- 2. ACT ---
    let onto_self = scene.add(root, &[root]);
    let onto_ancestor = scene.add(leaf, &[root]);

    // --- 3. ASSERT ---
    assert!(matches!(
        onto_self,
        Err(SceneError::Structural(StructuralError::Cycle { .. }))
    ));
    assert!(matches!(
        onto_ancestor,
        Err(SceneError::Structural(StructuralError::Cycle { .. }))
    ));
    assert_eq!(scene.family(root).unwrap(), family_before.as_slice());
    assert!(scene.children(leaf).unwrap().is_empty());
}

#[test]
fn test_despawn_keeps_shared_children_alive() {
    init_logger();
    // --- 1. ARRANGE ---
    let mut scene = Scene::new();
    let a = scene.spawn_group();
    let b = scene.spawn_group();
    let shared = scene.spawn_curve();
    let only_a = scene.spawn_curve();
    scene.add(a, &[shared, only_a]).unwrap();
    scene.add(b, &[shared]).unwrap();

    // --- 2. ACT ---
    scene.despawn(a).unwrap();

    // --- 3. ASSERT ---
    assert!(!scene.contains(a));
    assert!(!scene.contains(only_a), "Exclusively owned children are released");
    assert!(scene.contains(shared), "A child with another parent survives");
    assert_eq!(scene.parents(shared).unwrap(), &[b]);
    assert_eq!(scene.family(b).unwrap(), &[b, shared]);
    assert!(matches!(
        scene.node(a),
        Err(SceneError::Structural(StructuralError::MissingNode(_)))
    ));
}
