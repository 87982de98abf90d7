//! Steiner point generators.
//!
//! Each generator looks at one obtuse face and proposes a point to insert:
//!
//! | Method | Point | Fallback |
//! |--------|-------|----------|
//! | Circumcenter | circumcenter of the face | Centroid |
//! | Midpoint | midpoint of the longest side | none |
//! | Projection | foot of the perpendicular from the obtuse corner | none |
//! | AdjacentFaces | bounding-box center of the obtuse cluster | Projection |
//! | Centroid | centroid | never needed |
//!
//! Generators are pure. [`insert_candidate`] performs the insertion
//! (local split plus flip restoration); [`SteinerCandidate::update_boundary`]
//! keeps the region polygon in step when the point lands on its boundary.

mod adjacent;
mod generators;
mod types;

pub use adjacent::{adjacent_faces_progressive, obtuse_cluster};
pub use generators::{
    adjacent_candidate, centroid_candidate, circumcenter_candidate, insert_candidate,
    midpoint_candidate, projection_candidate, propose, propose_with_fallback, Generator,
};
pub use types::{SteinerCandidate, SteinerMethod};
