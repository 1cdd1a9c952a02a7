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

//! Defines the hierarchy of error types for the scene graph.
//!
//! Every error here signals a mistake in how the caller built or addressed a
//! tree. None of them are transient, so nothing in the crate retries.

use crate::id::NodeId;
use crate::shape::ShapeKind;
use std::fmt;
use tessera_core::CurveFitError;

/// An error in the shape of the tree or in the structure two trees must share.
#[derive(Debug, Clone, PartialEq)]
pub enum StructuralError {
    /// Adding `child` under `parent` would make a node its own descendant.
    Cycle {
        /// The node that would receive the child.
        parent: NodeId,
        /// The node that is already an ancestor of (or equal to) `parent`.
        child: NodeId,
    },
    /// The id does not address a live node (never spawned, or despawned).
    MissingNode(NodeId),
    /// A child index was past the end of the child list.
    ChildIndexOutOfRange {
        /// The node whose children were indexed.
        parent: NodeId,
        /// The requested index.
        index: usize,
        /// The number of children the node has.
        len: usize,
    },
    /// The node's kind has no point-count policy, so it cannot be resampled,
    /// interpolated or partially copied.
    NoAlignmentPolicy {
        /// The node that was asked.
        node: NodeId,
        /// Its kind.
        kind: ShapeKind,
    },
    /// Two corresponding nodes have different kinds and cannot share points.
    KindMismatch {
        /// The kind on the first tree.
        left: ShapeKind,
        /// The kind on the second tree.
        right: ShapeKind,
    },
    /// Two trees that must be aligned have families of different sizes.
    MismatchedFamilies {
        /// Family size of the first tree.
        left: usize,
        /// Family size of the second tree.
        right: usize,
    },
    /// Two corresponding nodes that must be aligned have different point counts.
    MismatchedPointCounts {
        /// The node on the first tree.
        node: NodeId,
        /// Its point count.
        left: usize,
        /// The point count of its counterpart.
        right: usize,
    },
    /// A node was asked to take the footprint of a node with nothing in it.
    EmptyReplacement {
        /// The empty node.
        node: NodeId,
    },
    /// `restore` was called on a node without a saved state.
    NoSavedState(NodeId),
    /// Per-point colors were supplied in a different number than the points.
    MismatchedColorCount {
        /// Number of points.
        points: usize,
        /// Number of colors.
        colors: usize,
    },
    /// A gradient was requested with no colors.
    EmptyGradient,
}

impl fmt::Display for StructuralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructuralError::Cycle { parent, child } => {
                write!(f, "Cannot add {child} to {parent}: a node cannot contain itself")
            }
            StructuralError::MissingNode(id) => write!(f, "No live node for id {id}"),
            StructuralError::ChildIndexOutOfRange { parent, index, len } => write!(
                f,
                "Child index {index} out of range for {parent} with {len} children"
            ),
            StructuralError::NoAlignmentPolicy { node, kind } => write!(
                f,
                "Node {node} of kind {kind} has no point-count policy"
            ),
            StructuralError::KindMismatch { left, right } => {
                write!(f, "Cannot align a {left} node with a {right} node")
            }
            StructuralError::MismatchedFamilies { left, right } => write!(
                f,
                "Trees are not aligned: families of {left} and {right} nodes"
            ),
            StructuralError::MismatchedPointCounts { node, left, right } => write!(
                f,
                "Node {node} has {left} points but its counterpart has {right}"
            ),
            StructuralError::EmptyReplacement { node } => {
                write!(f, "Cannot fit to {node}: it has no points and no children")
            }
            StructuralError::NoSavedState(id) => {
                write!(f, "Node {id} has no saved state to restore")
            }
            StructuralError::MismatchedColorCount { points, colors } => write!(
                f,
                "Got {colors} colors for {points} points; counts must match"
            ),
            StructuralError::EmptyGradient => write!(f, "A gradient needs at least one color"),
        }
    }
}

impl std::error::Error for StructuralError {}

/// An error caused by geometry that is too degenerate for the operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DegenerateGeometryError {
    /// The node's first and last points coincide, so no scale or rotation
    /// maps them onto a new segment.
    ZeroLengthSegment {
        /// The node being positioned.
        node: NodeId,
    },
    /// A directional point was requested from a family without points.
    EmptyBoundingBox {
        /// The node that was queried.
        node: NodeId,
    },
    /// The operation reads the node's own points, and it has none.
    NoPoints {
        /// The node that was queried.
        node: NodeId,
        /// The operation that needed points.
        operation: &'static str,
    },
}

impl fmt::Display for DegenerateGeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegenerateGeometryError::ZeroLengthSegment { node } => write!(
                f,
                "Cannot position endpoints of {node}: its start and end coincide"
            ),
            DegenerateGeometryError::EmptyBoundingBox { node } => {
                write!(f, "Node {node} and its family have no points to bound")
            }
            DegenerateGeometryError::NoPoints { node, operation } => {
                write!(f, "Cannot call {operation} on {node}: it has no points")
            }
        }
    }
}

impl std::error::Error for DegenerateGeometryError {}

/// A hook that the node's kind does not provide.
#[derive(Debug, Clone, PartialEq)]
pub struct NotImplementedError {
    /// The operation that was requested.
    pub operation: &'static str,
    /// The kind that lacks it.
    pub kind: ShapeKind,
}

impl fmt::Display for NotImplementedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is not implemented for {} nodes", self.operation, self.kind)
    }
}

impl std::error::Error for NotImplementedError {}

/// The top-level error for all scene operations.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneError {
    /// See [`StructuralError`].
    Structural(StructuralError),
    /// See [`DegenerateGeometryError`].
    DegenerateGeometry(DegenerateGeometryError),
    /// See [`NotImplementedError`].
    NotImplemented(NotImplementedError),
    /// The curve-fit kernel failed.
    CurveFit(CurveFitError),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::Structural(err) => write!(f, "Structural error: {err}"),
            SceneError::DegenerateGeometry(err) => write!(f, "Degenerate geometry: {err}"),
            SceneError::NotImplemented(err) => write!(f, "Not implemented: {err}"),
            SceneError::CurveFit(err) => write!(f, "Curve fit error: {err}"),
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneError::Structural(err) => Some(err),
            SceneError::DegenerateGeometry(err) => Some(err),
            SceneError::NotImplemented(err) => Some(err),
            SceneError::CurveFit(err) => Some(err),
        }
    }
}

impl From<StructuralError> for SceneError {
    fn from(err: StructuralError) -> Self {
        SceneError::Structural(err)
    }
}

impl From<DegenerateGeometryError> for SceneError {
    fn from(err: DegenerateGeometryError) -> Self {
        SceneError::DegenerateGeometry(err)
    }
}

impl From<NotImplementedError> for SceneError {
    fn from(err: NotImplementedError) -> Self {
        SceneError::NotImplemented(err)
    }
}

impl From<CurveFitError> for SceneError {
    fn from(err: CurveFitError) -> Self {
        SceneError::CurveFit(err)
    }
}

/// Result alias used across the scene crate.
pub type Result<T> = std::result::Result<T, SceneError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_structural_error_converts_and_chains() {
        let id = NodeId::new(3, 1);
        let err: SceneError = StructuralError::NoSavedState(id).into();
        assert!(matches!(err, SceneError::Structural(StructuralError::NoSavedState(_))));
        assert!(err.source().is_some());
        assert_eq!(
            err.to_string(),
            "Structural error: Node 3v1 has no saved state to restore"
        );
    }

    #[test]
    fn test_curve_fit_error_converts() {
        let err: SceneError = CurveFitError::SingularSystem { axis: 1 }.into();
        assert_eq!(err, SceneError::CurveFit(CurveFitError::SingularSystem { axis: 1 }));
    }

    #[test]
    fn test_not_implemented_display() {
        let err = NotImplementedError {
            operation: "point_from_proportion",
            kind: ShapeKind::Group,
        };
        assert_eq!(
            err.to_string(),
            "point_from_proportion is not implemented for group nodes"
        );
    }
}
