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

//! # Tessera Core
//!
//! Foundational crate containing the math primitives shared by every scene
//! node, and the curve-fit kernel that turns anchor sequences into renderable
//! Bezier control points.

#![warn(missing_docs)]

pub mod curve;
pub mod math;

pub use curve::CurveFitError;
pub use math::{Aabb, LinearRgba, Mat3, Vec3};
