//! Construction from point sets and constrained-edge recovery.

use super::arena::Triangulation;
use super::types::{ccw, cw, VertexId};
use crate::error::TriangulationError;
use crate::geometry::{
    incircle, is_strictly_convex_quad, orientation, point_on_segment,
    segments_properly_intersect, Orientation, Point,
};
use std::collections::VecDeque;

impl Triangulation {
    /// Delaunay triangulation of `points`.
    pub fn from_points(points: &[Point]) -> Result<Self, TriangulationError> {
        Self::from_points_indexed(points).map(|(tri, _)| tri)
    }

    /// Delaunay triangulation of `points`, together with the vertex each
    /// input point became. Repeated points map to the same vertex.
    pub fn from_points_indexed(
        points: &[Point],
    ) -> Result<(Self, Vec<VertexId>), TriangulationError> {
        if let Some(p) = points.iter().find(|p| !p.is_finite()) {
            return Err(TriangulationError::NonFinitePoint { x: p.x, y: p.y });
        }
        let degenerate = || TriangulationError::Degenerate {
            count: points.len(),
        };
        let first = *points.first().ok_or_else(degenerate)?;
        let second = points
            .iter()
            .position(|&p| p != first)
            .ok_or_else(degenerate)?;
        let third = points
            .iter()
            .position(|&p| orientation(first, points[second], p) != Orientation::Collinear)
            .ok_or_else(degenerate)?;

        let mut tri = Self::seed(first, points[second], points[third]);
        let mut ids = vec![VertexId::INFINITE; points.len()];
        ids[0] = VertexId(1);
        ids[second] = VertexId(2);
        ids[third] = VertexId(3);
        for (k, &p) in points.iter().enumerate() {
            if ids[k].is_infinite() {
                ids[k] = tri.insert(p)?;
            }
        }
        tracing::debug!(
            vertices = tri.number_of_vertices(),
            faces = tri.number_of_faces(),
            "built delaunay triangulation"
        );
        Ok((tri, ids))
    }

    /// Makes `a`-`b` a constrained edge. Vertices lying on the segment split
    /// it into several constrained edges.
    pub fn insert_constraint(&mut self, a: VertexId, b: VertexId) -> Result<(), TriangulationError> {
        for v in [a, b] {
            if v.is_infinite() || v.0 >= self.points.len() {
                return Err(TriangulationError::InvalidIndex {
                    index: v.0,
                    len: self.points.len(),
                });
            }
        }
        if a == b {
            return Ok(());
        }
        let (pa, pb) = (self.point(a), self.point(b));
        let between = self
            .finite_vertices()
            .filter(|&c| c != a && c != b && point_on_segment(self.point(c), pa, pb))
            .min_by(|&c, &d| {
                pa.squared_distance(self.point(c))
                    .total_cmp(&pa.squared_distance(self.point(d)))
            });
        if let Some(c) = between {
            self.insert_constraint(a, c)?;
            return self.insert_constraint(c, b);
        }

        if self.find_edge(a, b).is_none() {
            self.recover_edge(a, b)?;
        }
        let (f, i) = self
            .find_edge(a, b)
            .ok_or(TriangulationError::ConstraintRecoveryStalled { a, b, flips: 0 })?;
        self.set_constrained(f, i, true);
        Ok(())
    }

    /// Flips away every edge crossing the open segment `a`-`b`.
    fn recover_edge(&mut self, a: VertexId, b: VertexId) -> Result<(), TriangulationError> {
        let (pa, pb) = (self.point(a), self.point(b));
        let mut crossing: VecDeque<(VertexId, VertexId)> = self
            .finite_edges()
            .into_iter()
            .map(|(f, i)| self.face(f).edge(i))
            .filter(|&(u, w)| segments_properly_intersect(pa, pb, self.point(u), self.point(w)))
            .collect();
        let limit = 16 * (crossing.len() + 1) * (crossing.len() + 1);
        let mut attempts = 0;

        while let Some((u, w)) = crossing.pop_front() {
            attempts += 1;
            if attempts > limit {
                return Err(TriangulationError::ConstraintRecoveryStalled {
                    a,
                    b,
                    flips: attempts,
                });
            }
            let Some((f, i)) = self.find_edge(u, w) else {
                continue;
            };
            if self.is_constrained(f, i) {
                return Err(TriangulationError::ConstraintsCross { a, b });
            }
            let apex = self.vertex(f, i);
            let opposite = self.mirror_vertex(f, i);
            let convex = is_strictly_convex_quad(
                self.point(apex),
                self.point(self.vertex(f, ccw(i))),
                self.point(opposite),
                self.point(self.vertex(f, cw(i))),
            );
            if convex {
                self.flip(f, i);
                if segments_properly_intersect(pa, pb, self.point(apex), self.point(opposite)) {
                    crossing.push_back((apex, opposite));
                }
            } else {
                crossing.push_back((u, w));
            }
        }
        Ok(())
    }

    /// Flips unconstrained non-Delaunay edges until none is left.
    pub fn make_delaunay(&mut self) {
        let max_passes = self.faces.len() + 8;
        for _ in 0..max_passes {
            let mut flipped = false;
            for (f, i) in self.finite_edges() {
                let g = self.neighbor(f, i);
                if self.is_infinite(f) || self.is_infinite(g) || self.is_constrained(f, i) {
                    continue;
                }
                let [p, a, b] = [i, ccw(i), cw(i)].map(|k| self.point(self.vertex(f, k)));
                let w = self.point(self.mirror_vertex(f, i));
                let face = self.face_points(f);
                if incircle(face[0], face[1], face[2], w) && is_strictly_convex_quad(p, a, w, b) {
                    self.flip(f, i);
                    flipped = true;
                }
            }
            if !flipped {
                return;
            }
        }
        tracing::warn!("delaunay restoration stopped after {max_passes} passes");
    }
}
