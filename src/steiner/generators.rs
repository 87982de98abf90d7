//! Single-face generators and the generator table.

use super::adjacent::obtuse_cluster;
use super::types::{SteinerCandidate, SteinerMethod};
use crate::error::{OptimizeError, TriangulationError};
use crate::flips::restore;
use crate::geometry::{
    circumcenter, convex_hull, obtuse_vertex, project_onto_line,
    triangle_side, BoundedSide, Point,
};
use crate::quality::has_obtuse_neighbors;
use crate::region::Boundary;
use crate::triangulation::{FaceId, Triangulation, VertexId};

/// Signature shared by all generators. Generators never modify the mesh.
pub type Generator =
    fn(&Triangulation, FaceId, &Boundary) -> Result<SteinerCandidate, OptimizeError>;

const GENERATORS: [Generator; 5] = [
    circumcenter_candidate,
    midpoint_candidate,
    projection_candidate,
    adjacent_candidate,
    centroid_candidate,
];

/// Runs the generator for `method` on face `f`.
pub fn propose(
    method: SteinerMethod,
    tri: &Triangulation,
    f: FaceId,
    region: &Boundary,
) -> Result<SteinerCandidate, OptimizeError> {
    GENERATORS[method.index()](tri, f, region)
}

/// Runs `method`, then its fallback if the first candidate is inadmissible.
/// Returns `None` when neither yields an admissible point.
pub fn propose_with_fallback(
    method: SteinerMethod,
    tri: &Triangulation,
    f: FaceId,
    region: &Boundary,
) -> Result<Option<SteinerCandidate>, OptimizeError> {
    let candidate = propose(method, tri, f, region)?;
    if candidate.admissible {
        return Ok(Some(candidate));
    }
    match method.fallback() {
        Some(fallback) => {
            let candidate = propose(fallback, tri, f, region)?;
            Ok(candidate.admissible.then_some(candidate))
        }
        None => Ok(None),
    }
}

/// Inserts the candidate without Delaunay flips, then runs flip restoration.
pub fn insert_candidate(
    tri: &mut Triangulation,
    region: &Boundary,
    candidate: &SteinerCandidate,
) -> Result<VertexId, TriangulationError> {
    let v = tri.insert_local(candidate.point)?;
    restore(tri, region);
    Ok(v)
}

fn obtuse_corner(tri: &Triangulation, f: FaceId) -> Result<usize, OptimizeError> {
    let [a, b, c] = tri.face_points(f);
    obtuse_vertex(a, b, c).ok_or(OptimizeError::NotObtuse { face: f })
}

/// Circumcenter. Admissible when the side facing the obtuse corner is free,
/// the center lies in the region and in or on a finite neighbor, the four
/// points are in convex position, and the face it lands in is in the region.
pub fn circumcenter_candidate(
    tri: &Triangulation,
    f: FaceId,
    region: &Boundary,
) -> Result<SteinerCandidate, OptimizeError> {
    let k = obtuse_corner(tri, f)?;
    let [a, b, c] = tri.face_points(f);
    let Some(center) = circumcenter(a, b, c) else {
        return Ok(SteinerCandidate::new(
            SteinerMethod::Circumcenter,
            Point::centroid(a, b, c),
            false,
        ));
    };
    let admissible = !tri.is_constrained(f, k)
        && region.contains(center)
        && lands_in_neighbor(tri, f, center)
        && convex_hull(&[a, b, c, center]).len() == 4
        && tri
            .locate(center)
            .finite_face()
            .is_some_and(|g| region.contains_face(tri, g));
    Ok(SteinerCandidate::new(SteinerMethod::Circumcenter, center, admissible))
}

fn lands_in_neighbor(tri: &Triangulation, f: FaceId, p: Point) -> bool {
    (0..3).any(|i| {
        let g = tri.neighbor(f, i);
        if tri.is_infinite(g) {
            return false;
        }
        let [a, b, c] = tri.face_points(g);
        triangle_side(a, b, c, p) != BoundedSide::Outside
    })
}

/// Midpoint of the longest side. Ties go to the earlier side in the order
/// `(a, b)`, `(b, c)`, `(c, a)`.
pub fn midpoint_candidate(
    tri: &Triangulation,
    f: FaceId,
    region: &Boundary,
) -> Result<SteinerCandidate, OptimizeError> {
    let [a, b, c] = tri.face_points(f);
    let (l1, l2, l3) = (
        a.squared_distance(b),
        b.squared_distance(c),
        c.squared_distance(a),
    );
    let (p, q) = if l1 >= l2 && l1 >= l3 {
        (a, b)
    } else if l2 >= l1 && l2 >= l3 {
        (b, c)
    } else {
        (c, a)
    };
    let mid = p.midpoint(q);
    Ok(SteinerCandidate::new(SteinerMethod::Midpoint, mid, region.contains(mid)).with_edge(p, q))
}

/// Foot of the perpendicular from the obtuse corner onto the opposite side.
pub fn projection_candidate(
    tri: &Triangulation,
    f: FaceId,
    region: &Boundary,
) -> Result<SteinerCandidate, OptimizeError> {
    let k = obtuse_corner(tri, f)?;
    let pts = tri.face_points(f);
    let (p, q) = match k {
        0 => (pts[1], pts[2]),
        1 => (pts[0], pts[2]),
        _ => (pts[0], pts[1]),
    };
    let foot = project_onto_line(pts[k], p, q);
    Ok(
        SteinerCandidate::new(SteinerMethod::Projection, foot, region.contains(foot))
            .with_edge(p, q),
    )
}

/// Bounding-box center of the obtuse cluster around `f`, admissible when the
/// cluster has at least three points in convex position.
pub fn adjacent_candidate(
    tri: &Triangulation,
    f: FaceId,
    region: &Boundary,
) -> Result<SteinerCandidate, OptimizeError> {
    let [a, b, c] = tri.face_points(f);
    if !has_obtuse_neighbors(tri, f, region) {
        return Ok(SteinerCandidate::new(
            SteinerMethod::AdjacentFaces,
            Point::centroid(a, b, c),
            false,
        ));
    }
    let points = obtuse_cluster(tri, f, region);
    let center = bounding_box_center(&points);
    let admissible = points.len() >= 3
        && convex_hull(&points).len() == points.len()
        && region.contains(center);
    Ok(SteinerCandidate::new(SteinerMethod::AdjacentFaces, center, admissible))
}

/// Centroid; always admissible.
pub fn centroid_candidate(
    tri: &Triangulation,
    f: FaceId,
    _region: &Boundary,
) -> Result<SteinerCandidate, OptimizeError> {
    let [a, b, c] = tri.face_points(f);
    Ok(SteinerCandidate::new(SteinerMethod::Centroid, Point::centroid(a, b, c), true))
}

pub(crate) fn bounding_box_center(points: &[Point]) -> Point {
    let (mut min, mut max) = (
        Point::new(f64::INFINITY, f64::INFINITY),
        Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
    );
    for p in points {
        min = Point::new(min.x.min(p.x), min.y.min(p.y));
        max = Point::new(max.x.max(p.x), max.y.max(p.y));
    }
    min.midpoint(max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::{count_obtuse, is_obtuse_face, obtuse_faces};

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    /// A single obtuse triangle with its own outline as the region.
    fn single(pts: [Point; 3]) -> (Triangulation, Boundary, FaceId) {
        let tri = Triangulation::from_points(&pts).unwrap();
        let region = Boundary::new(pts.to_vec()).unwrap();
        let f = tri.finite_faces().next().unwrap();
        (tri, region, f)
    }

    #[test]
    fn test_projection_lands_on_long_side() {
        let (tri, region, f) = single([p(0.0, 0.0), p(4.0, 0.0), p(1.0, 1.0)]);
        let c = projection_candidate(&tri, f, &region).unwrap();
        assert!(c.admissible);
        assert!((c.point.x - 1.0).abs() < 1e-12 && c.point.y.abs() < 1e-12, "{:?}", c.point);
        let (a, b) = c.edge.unwrap();
        assert!(
            (a == p(0.0, 0.0) && b == p(4.0, 0.0)) || (a == p(4.0, 0.0) && b == p(0.0, 0.0))
        );
    }

    #[test]
    fn test_midpoint_of_longest_side() {
        let (tri, region, f) = single([p(0.0, 0.0), p(4.0, 0.0), p(1.0, 1.0)]);
        let c = midpoint_candidate(&tri, f, &region).unwrap();
        assert_eq!(c.point, p(2.0, 0.0));
        assert!(c.admissible);
    }

    #[test]
    fn test_circumcenter_outside_lone_triangle_falls_back() {
        // The circumcenter lies below the long side, outside the region.
        let (tri, region, f) = single([p(0.0, 0.0), p(4.0, 0.0), p(1.0, 1.0)]);
        let c = circumcenter_candidate(&tri, f, &region).unwrap();
        assert!(!c.admissible);
        let chosen = propose_with_fallback(SteinerMethod::Circumcenter, &tri, f, &region)
            .unwrap()
            .unwrap();
        assert_eq!(chosen.method, SteinerMethod::Centroid);
        assert_eq!(chosen.point, Point::centroid(p(0.0, 0.0), p(4.0, 0.0), p(1.0, 1.0)));
    }

    #[test]
    fn test_circumcenter_admissible_inside_neighbor() {
        // An obtuse cap on top of a large triangle; its circumcenter falls
        // into the triangle below.
        let pts = [p(0.0, 0.0), p(4.0, 0.0), p(2.0, 0.5), p(2.0, -9.0)];
        let tri = Triangulation::from_points(&pts).unwrap();
        let region = Boundary::new(vec![p(2.0, -9.0), p(4.0, 0.0), p(2.0, 0.5), p(0.0, 0.0)]).unwrap();
        let f = tri
            .finite_faces()
            .find(|&f| tri.face_points(f).contains(&p(2.0, 0.5)))
            .unwrap();
        assert!(is_obtuse_face(&tri, f));
        let c = circumcenter_candidate(&tri, f, &region).unwrap();
        // Center of the circle through (0,0), (4,0), (2,0.5) is (2, -3.75).
        assert!((c.point.x - 2.0).abs() < 1e-9 && (c.point.y + 3.75).abs() < 1e-9);
        assert!(c.admissible);
    }

    #[test]
    fn test_acute_face_is_an_error_for_circumcenter() {
        let (tri, region, f) = single([p(0.0, 0.0), p(2.0, 0.0), p(1.0, 1.5)]);
        assert!(matches!(
            circumcenter_candidate(&tri, f, &region),
            Err(OptimizeError::NotObtuse { .. })
        ));
        assert!(matches!(
            projection_candidate(&tri, f, &region),
            Err(OptimizeError::NotObtuse { .. })
        ));
    }

    #[test]
    fn test_adjacent_without_obtuse_neighbors_falls_back_to_projection() {
        let (tri, region, f) = single([p(0.0, 0.0), p(4.0, 0.0), p(1.0, 1.0)]);
        assert!(!adjacent_candidate(&tri, f, &region).unwrap().admissible);
        let chosen = propose_with_fallback(SteinerMethod::AdjacentFaces, &tri, f, &region)
            .unwrap()
            .unwrap();
        assert_eq!(chosen.method, SteinerMethod::Projection);
    }

    #[test]
    fn test_insert_projection_removes_obtuse_triangle() {
        let (mut tri, region, f) = single([p(0.0, 0.0), p(4.0, 0.0), p(1.0, 1.0)]);
        let c = projection_candidate(&tri, f, &region).unwrap();
        insert_candidate(&mut tri, &region, &c).unwrap();
        tri.validate().unwrap();
        assert_eq!(tri.number_of_vertices(), 4);
        assert_eq!(count_obtuse(&tri, &region), 0);
        assert!(obtuse_faces(&tri, &region).is_empty());
    }

    #[test]
    fn test_bounding_box_center() {
        let c = bounding_box_center(&[p(0.0, 0.0), p(4.0, 1.0), p(1.0, 3.0)]);
        assert_eq!(c, p(2.0, 1.5));
    }
}
