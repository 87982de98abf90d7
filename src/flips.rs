//! Obtuse-reducing edge flips.
//!
//! After a Steiner insertion the mesh is repaired locally: an interior edge
//! is flipped whenever the two triangles on the other diagonal have fewer
//! obtuse angles than the current pair. The scan restarts after each flip
//! (first improvement) and stops at a fixpoint. Constrained edges, boundary
//! edges and faces outside the region are never touched.
//!
//! Every flip lowers the total obtuse count of the mesh by at least one, so
//! the number of flips is bounded by the obtuse count before restoration.

use crate::geometry::{is_obtuse, is_strictly_convex_quad, Point};
use crate::region::Boundary;
use crate::triangulation::{ccw, cw, FaceId, Triangulation};

/// Whether replacing diagonal `p1`-`p3` of the quadrilateral `p1 p2 p3 p4`
/// by `p2`-`p4` strictly lowers the number of obtuse triangles.
pub fn is_it_worth_flip(p1: Point, p2: Point, p3: Point, p4: Point) -> bool {
    if !is_strictly_convex_quad(p1, p2, p3, p4) {
        return false;
    }
    let before = is_obtuse(p1, p2, p3) as u8 + is_obtuse(p1, p3, p4) as u8;
    let after = is_obtuse(p1, p2, p4) as u8 + is_obtuse(p2, p3, p4) as u8;
    after < before
}

/// Whether edge `i` of `f` may be flipped during restoration.
fn is_flippable(tri: &Triangulation, region: &Boundary, f: FaceId, i: usize) -> bool {
    let g = tri.neighbor(f, i);
    if tri.is_infinite(f) || tri.is_infinite(g) || tri.is_constrained(f, i) {
        return false;
    }
    if !region.contains_face(tri, f) || !region.contains_face(tri, g) {
        return false;
    }
    let (a, b) = tri.edge_points(f, i);
    region.contains_edge(a, b) && !region.has_edge(a, b)
}

/// Flips edges until no improving flip is left. Returns the number of flips.
pub fn restore(tri: &mut Triangulation, region: &Boundary) -> usize {
    let mut flips = 0;
    loop {
        let next = tri.finite_edges().into_iter().find(|&(f, i)| {
            if !is_flippable(tri, region, f, i) {
                return false;
            }
            let p1 = tri.point(tri.vertex(f, ccw(i)));
            let p2 = tri.point(tri.vertex(f, i));
            let p3 = tri.point(tri.vertex(f, cw(i)));
            let p4 = tri.point(tri.mirror_vertex(f, i));
            is_it_worth_flip(p1, p2, p3, p4)
        });
        match next {
            Some((f, i)) => {
                tri.flip(f, i);
                flips += 1;
            }
            None => break,
        }
    }
    if flips > 0 {
        tracing::debug!(flips, "flip restoration reached fixpoint");
    }
    flips
}
