//! Convex hulls and convexity tests on small polygons.

use super::point::Point;
use super::predicates::{orientation, Orientation};

/// Convex hull by Andrew's monotone chain, counter-clockwise.
///
/// Points lying on a hull edge (collinear) and duplicates are not part of
/// the result, so `convex_hull(pts).len() == pts.len()` holds exactly when
/// every input point is a strict hull vertex.
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut pts = points.to_vec();
    pts.sort_by(Point::lex_cmp);
    pts.dedup();
    if pts.len() < 3 {
        return pts;
    }

    let mut hull: Vec<Point> = Vec::with_capacity(pts.len() * 2);
    for pass in 0..2 {
        let start = hull.len();
        let iter: Box<dyn Iterator<Item = &Point>> = if pass == 0 {
            Box::new(pts.iter())
        } else {
            Box::new(pts.iter().rev())
        };
        for &p in iter {
            while hull.len() >= start + 2
                && orientation(hull[hull.len() - 2], hull[hull.len() - 1], p)
                    != Orientation::CounterClockwise
            {
                hull.pop();
            }
            hull.push(p);
        }
        // Last point of each chain is the first point of the other.
        hull.pop();
    }
    hull
}

/// Weak convexity of a simple polygon given in order: every turn goes the
/// same way, collinear turns allowed.
pub fn is_convex_polygon(polygon: &[Point]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut turn: Option<Orientation> = None;
    for i in 0..n {
        let o = orientation(polygon[i], polygon[(i + 1) % n], polygon[(i + 2) % n]);
        if o == Orientation::Collinear {
            continue;
        }
        match turn {
            None => turn = Some(o),
            Some(t) if t != o => return false,
            _ => {}
        }
    }
    turn.is_some()
}

/// Strict convexity of the quadrilateral `p1 p2 p3 p4`: all turns agree and
/// no three of the four points are collinear.
pub fn is_strictly_convex_quad(p1: Point, p2: Point, p3: Point, p4: Point) -> bool {
    let quad = [p1, p2, p3, p4];
    let first = orientation(p1, p2, p3);
    if first == Orientation::Collinear {
        return false;
    }
    let turns_agree = (1..4).all(|i| orientation(quad[i], quad[(i + 1) % 4], quad[(i + 2) % 4]) == first);
    let no_collinear_triple = [(p1, p2, p4), (p1, p3, p4), (p2, p3, p4)]
        .iter()
        .all(|&(a, b, c)| orientation(a, b, c) != Orientation::Collinear);
    turns_agree && no_collinear_triple
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_hull_square_with_interior_point() {
        let pts = [p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0), p(0.5, 0.5)];
        let hull = convex_hull(&pts);
        assert_eq!(hull.len(), 4);
        assert!(!hull.contains(&p(0.5, 0.5)));
    }

    #[test]
    fn test_hull_drops_collinear() {
        let pts = [p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0), p(1.0, 1.0)];
        assert_eq!(convex_hull(&pts).len(), 3, "midpoint of bottom edge is not a hull vertex");
    }

    #[test]
    fn test_convex_polygon() {
        assert!(is_convex_polygon(&[p(0.0, 0.0), p(2.0, 0.0), p(2.0, 2.0), p(0.0, 2.0)]));
        assert!(!is_convex_polygon(&[p(0.0, 0.0), p(2.0, 0.0), p(0.5, 0.5), p(0.0, 2.0)]));
        // A vertex on an edge keeps the polygon weakly convex.
        assert!(is_convex_polygon(&[p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0), p(1.0, 1.0)]));
    }

    #[test]
    fn test_strictly_convex_quad() {
        assert!(is_strictly_convex_quad(p(0.0, 0.0), p(1.0, -1.0), p(2.0, 0.0), p(1.0, 1.0)));
        assert!(!is_strictly_convex_quad(p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0), p(1.0, 1.0)));
        assert!(!is_strictly_convex_quad(p(0.0, 0.0), p(1.0, -1.0), p(0.5, 0.0), p(1.0, 1.0)));
    }
}
