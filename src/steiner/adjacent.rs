//! Clusters of neighboring obtuse faces.
//!
//! Both variants grow a breadth-first cluster from an obtuse face across
//! free edges into further obtuse faces and propose the bounding-box center
//! of the collected vertices. [`obtuse_cluster`] only gathers points; the
//! progressive variant tries the center after every expansion and keeps each
//! insertion that lowers the obtuse count.

use std::collections::{HashSet, VecDeque};

use super::generators::bounding_box_center;
use super::types::{SteinerCandidate, SteinerMethod};
use crate::error::OptimizeError;
use crate::flips::restore;
use crate::geometry::{convex_hull, Point};
use crate::quality::{count_obtuse, is_obtuse_face};
use crate::region::Boundary;
use crate::triangulation::{FaceId, FaceKey, Triangulation};

fn push_unique(points: &mut Vec<Point>, p: Point) {
    if !points.contains(&p) {
        points.push(p);
    }
}

fn in_convex_position(points: &[Point]) -> bool {
    points.len() >= 3 && convex_hull(points).len() == points.len()
}

/// Vertices of the obtuse cluster around `f`, sorted lexicographically.
///
/// Expansion stops at infinite faces, acute faces, constrained edges and
/// edges of the region boundary. Faces outside the region are not expanded.
pub fn obtuse_cluster(tri: &Triangulation, f: FaceId, region: &Boundary) -> Vec<Point> {
    let mut points = Vec::new();
    for p in tri.face_points(f) {
        push_unique(&mut points, p);
    }
    let mut visited = HashSet::from([f]);
    let mut queue = VecDeque::from([f]);

    while let Some(current) = queue.pop_front() {
        if !region.contains_face(tri, current) {
            continue;
        }
        for i in 0..3 {
            let g = tri.neighbor(current, i);
            if visited.contains(&g) || tri.is_infinite(g) || !is_obtuse_face(tri, g) {
                continue;
            }
            let (a, b) = tri.edge_points(current, i);
            if tri.is_constrained(current, i) || region.has_edge(a, b) {
                continue;
            }
            for p in tri.face_points(g) {
                push_unique(&mut points, p);
            }
            visited.insert(g);
            queue.push_back(g);
        }
    }
    points.sort_by(Point::lex_cmp);
    points
}

/// Progressive cluster insertion.
///
/// After each expansion the bounding-box center of the cluster is tried on a
/// copy of `tri`. The insertion is committed to `tri` when it strictly lowers
/// the obtuse count and the cluster is in convex position. Returns the last
/// committed candidate, or `None` if `tri` was left unchanged.
///
/// Faces are tracked by [`FaceKey`]; queued faces rewritten by a commit are
/// skipped.
pub fn adjacent_faces_progressive(
    tri: &mut Triangulation,
    f: FaceId,
    region: &Boundary,
) -> Result<Option<SteinerCandidate>, OptimizeError> {
    let mut best = count_obtuse(tri, region);
    let mut points = Vec::new();
    for p in tri.face_points(f) {
        push_unique(&mut points, p);
    }
    let start = tri.face_key(f);
    let mut visited: HashSet<FaceKey> = HashSet::from([start]);
    let mut queue = VecDeque::from([(f, start)]);
    let mut committed = None;

    while let Some((current, key)) = queue.pop_front() {
        if tri.is_infinite(current) || tri.face_key(current) != key {
            continue;
        }
        if !region.contains_face(tri, current) {
            continue;
        }
        for i in 0..3 {
            if tri.face_key(current) != key {
                break;
            }
            let g = tri.neighbor(current, i);
            if tri.is_infinite(g) {
                continue;
            }
            let g_key = tri.face_key(g);
            if visited.contains(&g_key)
                || !is_obtuse_face(tri, g)
                || tri.is_constrained(current, i)
                || !region.contains_face(tri, g)
            {
                continue;
            }
            for p in tri.face_points(g) {
                push_unique(&mut points, p);
            }
            visited.insert(g_key);
            queue.push_back((g, g_key));

            let center = bounding_box_center(&points);
            if !region.contains(center) {
                continue;
            }
            let mut trial = tri.clone();
            trial.insert_local(center)?;
            restore(&mut trial, region);
            let obtuse = count_obtuse(&trial, region);
            if obtuse < best && in_convex_position(&points) {
                tracing::trace!(obtuse, cluster = points.len(), "cluster insertion committed");
                best = obtuse;
                *tri = trial;
                committed = Some(SteinerCandidate::new(
                    SteinerMethod::AdjacentFaces,
                    center,
                    true,
                ));
            }
        }
    }
    Ok(committed)
}
