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

//! # Tessera Scene
//!
//! A hierarchical scene graph for programmatic animation. Nodes own ordered
//! points, a color and a shape family; a [`Scene`] arena owns the nodes and
//! keeps their flattened families consistent across every structural edit.
//!
//! On top of the tree sit pivot-relative transforms, per-node update
//! scheduling, the alignment protocol that makes two trees interpolable, and
//! extraction of batched render data.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod id;
pub mod node;
pub mod organize;
pub mod paths;
pub mod render;
pub mod scene;
pub mod shape;
pub mod transform;
pub mod updater;

mod align;
mod color;
mod geometry;

pub use config::SceneConfig;
pub use error::{Result, SceneError};
pub use id::NodeId;
pub use node::Node;
pub use organize::GridLayout;
pub use paths::{path_along_arc, straight_path, PathFn};
pub use render::{Material, Primitive, RenderBatch, RenderVertex};
pub use scene::Scene;
pub use shape::{CloudStyle, CurveStyle, PointPolicy, Shape, ShapeKind};
pub use transform::{Pivot, Target};
pub use updater::{Updater, UpdaterId};

pub use tessera_core::math::{LinearRgba, Vec3};
