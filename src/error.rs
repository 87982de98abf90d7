//! Error types.

use crate::triangulation::{FaceId, VertexId};
use thiserror::Error;

/// Failures while building or editing a triangulation.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum TriangulationError {
    /// Fewer than three non-collinear input points.
    #[error("need at least three non-collinear points, got {count} point(s)")]
    Degenerate {
        /// Number of points supplied.
        count: usize,
    },
    /// A coordinate is NaN or infinite.
    #[error("point ({x}, {y}) has a non-finite coordinate")]
    NonFinitePoint { x: f64, y: f64 },
    /// An index refers to no input point.
    #[error("point index {index} out of range ({len} points)")]
    InvalidIndex { index: usize, len: usize },
    /// The requested constraint crosses an existing constrained edge.
    #[error("constraint {a:?}-{b:?} crosses an existing constrained edge")]
    ConstraintsCross { a: VertexId, b: VertexId },
    /// Edge recovery by flips did not finish.
    #[error("constraint {a:?}-{b:?} not recovered after {flips} flip attempts")]
    ConstraintRecoveryStalled {
        a: VertexId,
        b: VertexId,
        flips: usize,
    },
    /// Adjacency or orientation bookkeeping is broken.
    #[error("inconsistent triangulation: {message}")]
    Inconsistent { message: String },
}

/// Failures of an optimization run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OptimizeError {
    /// Driver configuration rejected by `validate()`.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// The region boundary is unusable.
    #[error("invalid region boundary: {0}")]
    Boundary(String),
    #[error(transparent)]
    Triangulation(#[from] TriangulationError),
    /// A face classified as obtuse has no obtuse corner. Predicates disagree,
    /// which is a logic error; the run is aborted.
    #[error("face {face:?} is classified obtuse but has no obtuse vertex")]
    NotObtuse { face: FaceId },
}
