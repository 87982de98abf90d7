//! Shared fixtures for driver tests.

use crate::geometry::{point_on_segment, Point};
use crate::region::Boundary;
use crate::triangulation::Triangulation;

pub(crate) fn p(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

/// A 10 x 6 rectangle with a zigzag row of interior points. The bottom edge
/// and the middle row point form an obtuse Delaunay triangle, and the
/// rectangle sides are constrained.
pub(crate) fn zigzag() -> (Triangulation, Boundary, Vec<(Point, Point)>) {
    let corners = [p(0.0, 0.0), p(10.0, 0.0), p(10.0, 6.0), p(0.0, 6.0)];
    let mut points = corners.to_vec();
    points.extend([
        p(1.0, 3.0),
        p(3.0, 3.2),
        p(5.0, 3.0),
        p(7.0, 3.2),
        p(9.0, 3.0),
    ]);
    let (mut tri, ids) = Triangulation::from_points_indexed(&points).unwrap();
    let mut segments = Vec::new();
    for k in 0..4 {
        tri.insert_constraint(ids[k], ids[(k + 1) % 4]).unwrap();
        segments.push((corners[k], corners[(k + 1) % 4]));
    }
    let region = Boundary::new(corners.to_vec()).unwrap();
    (tri, region, segments)
}

/// The square `[0, 1]^2` triangulated by one diagonal: two right triangles.
pub(crate) fn square() -> (Triangulation, Boundary) {
    let corners = vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)];
    let tri = Triangulation::from_points(&corners).unwrap();
    (tri, Boundary::new(corners).unwrap())
}

/// Every constrained edge lies on an original segment and together they
/// cover the segments' total length.
pub(crate) fn assert_constraints_preserved(tri: &Triangulation, segments: &[(Point, Point)]) {
    tri.validate().unwrap();
    let mut covered = 0.0;
    for (a, b) in tri.constrained_edges() {
        let (pa, pb) = (tri.point(a), tri.point(b));
        assert!(
            segments
                .iter()
                .any(|&(s, t)| point_on_segment(pa, s, t) && point_on_segment(pb, s, t)),
            "constrained edge {pa:?}-{pb:?} is not part of any input constraint"
        );
        covered += pa.distance(pb);
    }
    let expected: f64 = segments.iter().map(|&(s, t)| s.distance(t)).sum();
    assert!(
        (covered - expected).abs() < 1e-9 * expected.max(1.0),
        "constrained length {covered} != input constraint length {expected}"
    );
}
