//! Planar geometric kernel.
//!
//! Floating-point predicates with a relative tolerance. All "zero" decisions
//! (collinearity, right angles, on-segment tests) compare a determinant or a
//! dot product against [`EPSILON`] scaled by the lengths of the vectors
//! involved, so the classification is invariant under uniform scaling of the
//! input.
//!
//! # References
//!
//! - de Berg, Cheong, van Kreveld & Overmars (2008), "Computational Geometry:
//!   Algorithms and Applications", ch. 1 and 9
//! - Shewchuk (1997), "Adaptive Precision Floating-Point Arithmetic and Fast
//!   Robust Geometric Predicates"

mod hull;
mod point;
mod predicates;

pub use hull::{convex_hull, is_convex_polygon, is_strictly_convex_quad};
pub use point::Point;
pub use predicates::{
    angle, circumcenter, incircle, is_obtuse, obtuse_vertex, orient2d, orientation,
    point_on_segment, project_onto_line, segments_properly_intersect,
    squared_distance_to_segment, triangle_side, Angle, BoundedSide, Orientation, EPSILON,
};
