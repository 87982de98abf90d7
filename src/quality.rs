//! Obtuse-face bookkeeping and shape measures.
//!
//! # References
//!
//! - Shewchuk (2002), "What Is a Good Linear Element? Interpolation,
//!   Conditioning, Anisotropy, and Quality Measures"

use crate::geometry::{circumcenter, is_obtuse, Point};
use crate::region::Boundary;
use crate::triangulation::{FaceId, Triangulation};
use rand::Rng;

/// Whether a finite face has an obtuse angle.
pub fn is_obtuse_face(tri: &Triangulation, f: FaceId) -> bool {
    let [a, b, c] = tri.face_points(f);
    is_obtuse(a, b, c)
}

/// Obtuse faces inside the region, in arena order.
pub fn obtuse_faces(tri: &Triangulation, region: &Boundary) -> Vec<FaceId> {
    tri.finite_faces()
        .filter(|&f| is_obtuse_face(tri, f) && region.contains_face(tri, f))
        .collect()
}

/// Number of obtuse faces inside the region.
pub fn count_obtuse(tri: &Triangulation, region: &Boundary) -> usize {
    tri.finite_faces()
        .filter(|&f| is_obtuse_face(tri, f) && region.contains_face(tri, f))
        .count()
}

/// Uniformly random obtuse face inside the region, or `None` when the
/// region has none.
pub fn random_obtuse_face<R: Rng>(
    tri: &Triangulation,
    region: &Boundary,
    rng: &mut R,
) -> Option<FaceId> {
    let faces = obtuse_faces(tri, region);
    if faces.is_empty() {
        return None;
    }
    Some(faces[rng.random_range(0..faces.len())])
}

/// Whether some neighbor across an unconstrained edge is a finite, in-region,
/// obtuse face.
pub fn has_obtuse_neighbors(tri: &Triangulation, f: FaceId, region: &Boundary) -> bool {
    (0..3).any(|i| {
        let g = tri.neighbor(f, i);
        !tri.is_constrained(f, i)
            && !tri.is_infinite(g)
            && region.contains_face(tri, g)
            && is_obtuse_face(tri, g)
    })
}

/// Circumradius over the height on the longest side.
///
/// Equals 2/3 for an equilateral triangle and grows without bound as the
/// triangle flattens. Degenerate triangles report `f64::MAX`.
pub fn radius_to_height([a, b, c]: [Point; 3]) -> f64 {
    let Some(center) = circumcenter(a, b, c) else {
        return f64::MAX;
    };
    let radius = a.distance(center);
    let (d1, d2, d3) = (a.distance(b), b.distance(c), c.distance(a));
    let longest = d1.max(d2).max(d3);
    let s = (d1 + d2 + d3) / 2.0;
    let area = (s * (s - d1) * (s - d2) * (s - d3)).max(0.0).sqrt();
    let height = 2.0 * area / longest;
    if height <= 0.0 || !height.is_finite() {
        return f64::MAX;
    }
    radius / height
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_radius_to_height_equilateral() {
        let rho = radius_to_height([p(0.0, 0.0), p(1.0, 0.0), p(0.5, 3f64.sqrt() / 2.0)]);
        // R = 1/sqrt(3), h = sqrt(3)/2.
        assert!((rho - 2.0 / 3.0).abs() < 1e-9, "rho = {rho}");
    }

    #[test]
    fn test_radius_to_height_flat_triangle_is_large() {
        let rho = radius_to_height([p(0.0, 0.0), p(4.0, 0.0), p(1.0, 0.1)]);
        assert!(rho > 10.0, "rho = {rho}");
        assert_eq!(radius_to_height([p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0)]), f64::MAX);
    }

    #[test]
    fn test_counts_only_in_region() {
        let pts = [p(0.0, 0.0), p(4.0, 0.0), p(1.0, 1.0)];
        let tri = Triangulation::from_points(&pts).unwrap();
        let region = Boundary::new(pts.to_vec()).unwrap();
        assert_eq!(count_obtuse(&tri, &region), 1);
        let elsewhere = Boundary::new(vec![p(10.0, 10.0), p(11.0, 10.0), p(10.0, 11.0)]).unwrap();
        assert_eq!(count_obtuse(&tri, &elsewhere), 0);
    }

    #[test]
    fn test_random_obtuse_face() {
        let pts = [p(0.0, 0.0), p(4.0, 0.0), p(1.0, 1.0)];
        let tri = Triangulation::from_points(&pts).unwrap();
        let region = Boundary::new(pts.to_vec()).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let f = random_obtuse_face(&tri, &region, &mut rng).unwrap();
        assert!(is_obtuse_face(&tri, f));
    }
}
