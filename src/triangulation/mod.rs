//! Constrained planar triangulation.
//!
//! An arena of counter-clockwise triangles closed by an infinite vertex.
//! Supports Delaunay construction, constrained-edge recovery, point location,
//! local (flip-free) insertion and single edge flips. Faces are addressed by
//! stable [`FaceId`]s; [`FaceKey`] identifies a face by its vertices across
//! clones.
//!
//! # References
//!
//! - Lawson (1977), "Software for C1 Surface Interpolation"
//! - Sloan (1993), "A Fast Algorithm for Generating Constrained Delaunay
//!   Triangulations"
//! - Devillers, Pion & Teillaud (2002), "Walking in a Triangulation"

mod arena;
mod constraints;
mod insert;
mod types;

pub use arena::Triangulation;
pub use types::{ccw, cw, Face, FaceId, FaceKey, Location, VertexId};
