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

//! Scene-wide defaults: colors, stroke widths, layout buffers and the frame.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tessera_core::math::LinearRgba;

/// Stroke width given to new curves and clouds.
pub const DEFAULT_STROKE_WIDTH: f32 = 4.0;
/// Gap left between two nodes placed next to each other.
pub const NODE_TO_NODE_BUFFER: f32 = 0.25;
/// Gap left between a node and the frame edge it is moved to.
pub const NODE_TO_EDGE_BUFFER: f32 = 0.5;
/// Half the frame height.
pub const FRAME_Y_RADIUS: f32 = 4.0;
/// Half the frame width, for a 16:9 frame.
pub const FRAME_X_RADIUS: f32 = FRAME_Y_RADIUS * 16.0 / 9.0;

/// Defaults a [`Scene`](crate::Scene) applies to new nodes and layout calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Color of newly spawned nodes.
    pub default_color: LinearRgba,
    /// Stroke width of newly spawned curves and clouds.
    pub default_stroke_width: f32,
    /// Default gap for `next_to` and `arrange`.
    pub node_to_node_buffer: f32,
    /// Default gap for `to_edge` and `to_corner`.
    pub node_to_edge_buffer: f32,
    /// Half the width of the visible frame.
    pub frame_x_radius: f32,
    /// Half the height of the visible frame.
    pub frame_y_radius: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            default_color: LinearRgba::WHITE,
            default_stroke_width: DEFAULT_STROKE_WIDTH,
            node_to_node_buffer: NODE_TO_NODE_BUFFER,
            node_to_edge_buffer: NODE_TO_EDGE_BUFFER,
            frame_x_radius: FRAME_X_RADIUS,
            frame_y_radius: FRAME_Y_RADIUS,
        }
    }
}

impl SceneConfig {
    /// Load a configuration from a JSON string. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("Failed to parse scene configuration")
    }

    /// Load a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene configuration '{}'", path.display()))?;
        Self::from_json(&content)
    }

    /// Save the configuration as pretty-printed JSON.
    pub fn to_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write scene configuration '{}'", path.display()))
    }

    /// Full frame width.
    pub fn frame_width(&self) -> f32 {
        2.0 * self.frame_x_radius
    }

    /// Full frame height.
    pub fn frame_height(&self) -> f32 {
        2.0 * self.frame_y_radius
    }
}
