//! Region of interest.
//!
//! An ordered polygon delimiting where obtuse faces are counted and where
//! Steiner points may go. The polygon grows by one vertex whenever a Steiner
//! point splits one of its edges, so it always matches the constrained
//! boundary edges of the triangulation.

use crate::error::OptimizeError;
use crate::geometry::{
    point_on_segment, segments_properly_intersect, BoundedSide, Point,
};
use crate::triangulation::{FaceId, Triangulation};

/// Closed polygonal region, vertices in boundary order (either orientation).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Boundary {
    vertices: Vec<Point>,
}

impl Boundary {
    pub fn new(vertices: Vec<Point>) -> Result<Self, OptimizeError> {
        if vertices.len() < 3 {
            return Err(OptimizeError::Boundary(format!(
                "need at least 3 vertices, got {}",
                vertices.len()
            )));
        }
        if let Some(p) = vertices.iter().find(|p| !p.is_finite()) {
            return Err(OptimizeError::Boundary(format!(
                "vertex ({}, {}) is not finite",
                p.x, p.y
            )));
        }
        Ok(Self { vertices })
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Polygon edges in order, closing edge last.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Position of `p` relative to the closed polygon (even-odd rule for the
    /// interior).
    pub fn bounded_side(&self, p: Point) -> BoundedSide {
        if self.edges().any(|(a, b)| point_on_segment(p, a, b)) {
            return BoundedSide::OnBoundary;
        }
        let mut inside = false;
        for (a, b) in self.edges() {
            if (a.y > p.y) != (b.y > p.y) {
                let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < x {
                    inside = !inside;
                }
            }
        }
        if inside {
            BoundedSide::Inside
        } else {
            BoundedSide::Outside
        }
    }

    /// Closed test: interior or boundary.
    pub fn contains(&self, p: Point) -> bool {
        self.bounded_side(p) != BoundedSide::Outside
    }

    /// Whether the segment `p`-`q` has both ends and its midpoint in the region.
    pub fn contains_edge(&self, p: Point, q: Point) -> bool {
        self.contains(p) && self.contains(q) && self.contains(p.midpoint(q))
    }

    /// Whether the triangle lies in the region: corners, edge midpoints and
    /// centroid inside, and no side properly crossing a boundary edge.
    pub fn contains_triangle(&self, [a, b, c]: [Point; 3]) -> bool {
        let samples = [
            a,
            b,
            c,
            a.midpoint(b),
            b.midpoint(c),
            c.midpoint(a),
            Point::centroid(a, b, c),
        ];
        if !samples.iter().all(|&s| self.contains(s)) {
            return false;
        }
        !self.edges().any(|(u, v)| {
            [(a, b), (b, c), (c, a)]
                .iter()
                .any(|&(s, t)| segments_properly_intersect(s, t, u, v))
        })
    }

    /// Region test for a face of `tri`; infinite faces are never inside.
    pub fn contains_face(&self, tri: &Triangulation, f: FaceId) -> bool {
        !tri.is_infinite(f) && self.contains_triangle(tri.face_points(f))
    }

    /// Whether `p`-`q` is a polygon edge, in either direction.
    pub fn has_edge(&self, p: Point, q: Point) -> bool {
        self.edge_position(p, q).is_some()
    }

    fn edge_position(&self, p: Point, q: Point) -> Option<usize> {
        self.edges()
            .position(|(a, b)| (a == p && b == q) || (a == q && b == p))
    }

    /// Splits the polygon edge `p`-`q` at `point` when `point` lies on the
    /// boundary and `p`-`q` is a polygon edge. Returns whether it grew.
    pub fn update_on_insert(&mut self, point: Point, p: Point, q: Point) -> bool {
        if self.bounded_side(point) != BoundedSide::OnBoundary {
            return false;
        }
        let Some(i) = self.edge_position(p, q) else {
            return false;
        };
        if self.vertices.contains(&point) {
            return false;
        }
        self.vertices.insert(i + 1, point);
        tracing::debug!(x = point.x, y = point.y, "boundary edge split");
        true
    }
}
