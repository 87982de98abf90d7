//! Randomized escape from plateaus.
//!
//! Picks a random obtuse face and inserts a Gaussian sample around its
//! centroid. The spread is a fraction of the distance from the centroid to
//! the nearest side, so most samples stay inside the face; samples outside
//! the face or the region are redrawn.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::OptimizeError;
use crate::flips::restore;
use crate::geometry::{squared_distance_to_segment, Point};
use crate::quality::random_obtuse_face;
use crate::region::Boundary;
use crate::triangulation::{Location, Triangulation};

/// Sampling parameters for [`escape`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EscapeConfig {
    /// Standard deviation as a fraction of the centroid-to-side distance.
    pub stddev_ratio: f64,
    /// Draws before giving up.
    pub max_attempts: usize,
}

impl Default for EscapeConfig {
    fn default() -> Self {
        Self {
            stddev_ratio: 0.33,
            max_attempts: 10_000,
        }
    }
}

impl EscapeConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.stddev_ratio.is_finite() && self.stddev_ratio >= 0.0) {
            return Err("stddev_ratio must be finite and non-negative".into());
        }
        if self.max_attempts == 0 {
            return Err("max_attempts must be at least 1".into());
        }
        Ok(())
    }
}

/// Inserts one random point near the centroid of a random obtuse face and
/// runs flip restoration.
///
/// Returns the inserted point, or `None` when the region has no obtuse face
/// or no draw landed inside the chosen face.
pub fn escape<R: Rng>(
    tri: &mut Triangulation,
    region: &Boundary,
    rng: &mut R,
    config: &EscapeConfig,
) -> Result<Option<Point>, OptimizeError> {
    let Some(face) = random_obtuse_face(tri, region, rng) else {
        return Ok(None);
    };
    let [a, b, c] = tri.face_points(face);
    let key = tri.face_key(face);
    let center = Point::centroid(a, b, c);
    let radius = [(a, b), (b, c), (c, a)]
        .iter()
        .map(|&(u, v)| squared_distance_to_segment(center, u, v))
        .fold(f64::INFINITY, f64::min)
        .sqrt();
    let stddev = config.stddev_ratio * radius;
    let (Ok(nx), Ok(ny)) = (Normal::new(center.x, stddev), Normal::new(center.y, stddev)) else {
        return Ok(None);
    };

    for attempt in 0..config.max_attempts {
        let p = Point::new(nx.sample(rng), ny.sample(rng));
        if !region.contains(p) {
            continue;
        }
        let inside = match tri.locate(p) {
            Location::Face(g) => tri.face_key(g) == key,
            Location::Edge(g, i) => {
                tri.face_key(g) == key || tri.face_key(tri.neighbor(g, i)) == key
            }
            Location::Vertex(_) | Location::OutsideConvexHull(_) => false,
        };
        if !inside {
            continue;
        }
        tri.insert_local(p)?;
        restore(tri, region);
        tracing::debug!(x = p.x, y = p.y, attempt, "random point inserted");
        return Ok(Some(p));
    }
    tracing::debug!(
        attempts = config.max_attempts,
        "no random sample landed inside the chosen face"
    );
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{triangle_side, BoundedSide};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_escape_inserts_inside_face() {
        let pts = [p(0.0, 0.0), p(4.0, 0.0), p(1.0, 1.0)];
        let mut tri = Triangulation::from_points(&pts).unwrap();
        let region = Boundary::new(pts.to_vec()).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let point = escape(&mut tri, &region, &mut rng, &EscapeConfig::default())
            .unwrap()
            .expect("one obtuse face to escape from");
        assert_eq!(triangle_side(pts[0], pts[1], pts[2], point), BoundedSide::Inside);
        assert_eq!(tri.number_of_vertices(), 4);
        tri.validate().unwrap();
    }

    #[test]
    fn test_escape_without_obtuse_faces() {
        let pts = [p(0.0, 0.0), p(2.0, 0.0), p(1.0, 1.5)];
        let mut tri = Triangulation::from_points(&pts).unwrap();
        let region = Boundary::new(pts.to_vec()).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let before = tri.clone();
        assert!(escape(&mut tri, &region, &mut rng, &EscapeConfig::default())
            .unwrap()
            .is_none());
        assert_eq!(tri, before);
    }

    #[test]
    fn test_escape_is_reproducible() {
        let pts = [p(0.0, 0.0), p(4.0, 0.0), p(1.0, 1.0)];
        let region = Boundary::new(pts.to_vec()).unwrap();
        let run = |seed| {
            let mut tri = Triangulation::from_points(&pts).unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            escape(&mut tri, &region, &mut rng, &EscapeConfig::default()).unwrap()
        };
        assert_eq!(run(5), run(5));
    }

    #[test]
    fn test_config_validation() {
        assert!(EscapeConfig::default().validate().is_ok());
        let bad = EscapeConfig {
            max_attempts: 0,
            ..EscapeConfig::default()
        };
        assert!(bad.validate().is_err());
    }
}
