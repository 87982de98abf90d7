//! Tolerant orientation, angle and incidence predicates.

use super::point::Point;

/// Relative tolerance shared by every predicate of the kernel.
pub const EPSILON: f64 = 1e-10;

/// Turn direction of an ordered point triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    CounterClockwise,
    Clockwise,
    Collinear,
}

/// Classification of a single triangle angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Angle {
    Acute,
    Right,
    Obtuse,
}

/// Position of a point relative to a closed region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundedSide {
    Inside,
    OnBoundary,
    Outside,
}

/// Twice the signed area of `(a, b, c)`; positive for a left turn.
pub fn orient2d(a: Point, b: Point, c: Point) -> f64 {
    (b - a).cross(c - a)
}

/// Orientation of `(a, b, c)`.
///
/// The triple is collinear when twice its area is within [`EPSILON`] of the
/// squared longest side, i.e. when the height over the longest side is
/// negligible relative to that side. The test is symmetric under any
/// permutation of the arguments.
pub fn orientation(a: Point, b: Point, c: Point) -> Orientation {
    let det = orient2d(a, b, c);
    let scale = a
        .squared_distance(b)
        .max(b.squared_distance(c))
        .max(c.squared_distance(a));
    if det.abs() <= EPSILON * scale {
        Orientation::Collinear
    } else if det > 0.0 {
        Orientation::CounterClockwise
    } else {
        Orientation::Clockwise
    }
}

/// Classifies the angle at `b` in the triangle `(a, b, c)`.
pub fn angle(a: Point, b: Point, c: Point) -> Angle {
    let u = a - b;
    let v = c - b;
    let dot = u.dot(v);
    if dot.abs() <= EPSILON * u.norm() * v.norm() {
        Angle::Right
    } else if dot < 0.0 {
        Angle::Obtuse
    } else {
        Angle::Acute
    }
}

/// Index (0, 1 or 2) of the obtuse corner of `(a, b, c)`, if any.
pub fn obtuse_vertex(a: Point, b: Point, c: Point) -> Option<usize> {
    if angle(c, a, b) == Angle::Obtuse {
        Some(0)
    } else if angle(a, b, c) == Angle::Obtuse {
        Some(1)
    } else if angle(b, c, a) == Angle::Obtuse {
        Some(2)
    } else {
        None
    }
}

pub fn is_obtuse(a: Point, b: Point, c: Point) -> bool {
    obtuse_vertex(a, b, c).is_some()
}

/// Circumcenter of `(a, b, c)`, or `None` for a degenerate triangle.
pub fn circumcenter(a: Point, b: Point, c: Point) -> Option<Point> {
    if orientation(a, b, c) == Orientation::Collinear {
        return None;
    }
    let ab = b - a;
    let ac = c - a;
    let d = 2.0 * ab.cross(ac);
    let ab2 = ab.dot(ab);
    let ac2 = ac.dot(ac);
    let ux = (ac.y * ab2 - ab.y * ac2) / d;
    let uy = (ab.x * ac2 - ac.x * ab2) / d;
    Some(Point::new(a.x + ux, a.y + uy))
}

/// Whether `d` lies strictly inside the circumcircle of the
/// counter-clockwise triangle `(a, b, c)`, beyond the relative tolerance.
pub fn incircle(a: Point, b: Point, c: Point, d: Point) -> bool {
    let (ad, bd, cd) = (a - d, b - d, c - d);
    let (la, lb, lc) = (ad.dot(ad), bd.dot(bd), cd.dot(cd));
    let det = la * bd.cross(cd) - lb * ad.cross(cd) + lc * ad.cross(bd);
    let scale = la.max(lb).max(lc);
    det > EPSILON * scale * scale
}

/// Orthogonal projection of `p` onto the line through `a` and `b`.
pub fn project_onto_line(p: Point, a: Point, b: Point) -> Point {
    let ab = b - a;
    let len2 = ab.dot(ab);
    if len2 == 0.0 {
        return a;
    }
    let t = (p - a).dot(ab) / len2;
    a + ab * t
}

pub fn squared_distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len2 = ab.dot(ab);
    if len2 == 0.0 {
        return p.squared_distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.squared_distance(a + ab * t)
}

/// Closed test: does `p` lie on the segment `[a, b]`?
pub fn point_on_segment(p: Point, a: Point, b: Point) -> bool {
    if a == b {
        return p == a;
    }
    if orientation(a, b, p) != Orientation::Collinear {
        return false;
    }
    let ab = b - a;
    let t = (p - a).dot(ab) / ab.dot(ab);
    (-EPSILON..=1.0 + EPSILON).contains(&t)
}

/// Whether the open segments `(a, b)` and `(c, d)` cross at a single point
/// that is an endpoint of neither.
pub fn segments_properly_intersect(a: Point, b: Point, c: Point, d: Point) -> bool {
    let o1 = orientation(a, b, c);
    let o2 = orientation(a, b, d);
    let o3 = orientation(c, d, a);
    let o4 = orientation(c, d, b);
    [o1, o2, o3, o4].iter().all(|o| *o != Orientation::Collinear) && o1 != o2 && o3 != o4
}

/// Position of `p` relative to the closed triangle `(a, b, c)` of either
/// orientation.
pub fn triangle_side(a: Point, b: Point, c: Point, p: Point) -> BoundedSide {
    let inward = match orientation(a, b, c) {
        Orientation::CounterClockwise => Orientation::CounterClockwise,
        Orientation::Clockwise => Orientation::Clockwise,
        Orientation::Collinear => {
            return if point_on_segment(p, a, b) || point_on_segment(p, b, c) || point_on_segment(p, c, a) {
                BoundedSide::OnBoundary
            } else {
                BoundedSide::Outside
            };
        }
    };
    let mut on_edge = false;
    for (u, v) in [(a, b), (b, c), (c, a)] {
        match orientation(u, v, p) {
            Orientation::Collinear => on_edge = true,
            o if o != inward => return BoundedSide::Outside,
            _ => {}
        }
    }
    if on_edge {
        BoundedSide::OnBoundary
    } else {
        BoundedSide::Inside
    }
}
