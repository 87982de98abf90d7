//! Arena storage, queries and point location.

use super::types::{ccw, cw, Face, FaceId, FaceKey, Location, VertexId};
use crate::error::TriangulationError;
use crate::geometry::{orientation, Orientation, Point};

/// A constrained triangulation of a planar point set.
///
/// Faces live in a flat arena closed by an infinite vertex, so every edge has
/// exactly two incident faces. Cloning is a deep value copy: vertex ids,
/// face ids and constrained flags are preserved, which lets drivers evaluate
/// a move on a copy and compare faces across copies by [`FaceKey`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Triangulation {
    /// Vertex coordinates; slot 0 belongs to the infinite vertex.
    pub(crate) points: Vec<Point>,
    pub(crate) faces: Vec<Face>,
    /// One incident face per vertex.
    pub(crate) vertex_face: Vec<FaceId>,
    /// Finite face where point location starts.
    pub(crate) hint: FaceId,
}

impl Triangulation {
    /// Number of finite vertices.
    pub fn number_of_vertices(&self) -> usize {
        self.points.len() - 1
    }

    /// Number of finite faces.
    pub fn number_of_faces(&self) -> usize {
        self.faces.iter().filter(|f| !f.is_infinite()).count()
    }

    pub fn point(&self, v: VertexId) -> Point {
        self.points[v.0]
    }

    pub fn face(&self, f: FaceId) -> &Face {
        &self.faces[f.0]
    }

    pub fn vertex(&self, f: FaceId, i: usize) -> VertexId {
        self.faces[f.0].vertices[i]
    }

    pub fn neighbor(&self, f: FaceId, i: usize) -> FaceId {
        self.faces[f.0].neighbors[i]
    }

    pub fn is_infinite(&self, f: FaceId) -> bool {
        self.faces[f.0].is_infinite()
    }

    pub fn is_constrained(&self, f: FaceId, i: usize) -> bool {
        self.faces[f.0].constrained[i]
    }

    /// Corner points of a finite face, in counter-clockwise order.
    pub fn face_points(&self, f: FaceId) -> [Point; 3] {
        self.faces[f.0].vertices.map(|v| self.points[v.0])
    }

    /// Endpoint coordinates of the edge opposite vertex `i` of `f`.
    pub fn edge_points(&self, f: FaceId, i: usize) -> (Point, Point) {
        let (a, b) = self.faces[f.0].edge(i);
        (self.points[a.0], self.points[b.0])
    }

    pub fn face_key(&self, f: FaceId) -> FaceKey {
        FaceKey::new(self.faces[f.0].vertices)
    }

    /// Index in `neighbor(f, i)` of the vertex facing `f` across edge `i`.
    pub fn mirror_index(&self, f: FaceId, i: usize) -> usize {
        let (a, b) = self.faces[f.0].edge(i);
        let g = &self.faces[self.neighbor(f, i).0];
        (0..3)
            .find(|&j| g.vertices[j] != a && g.vertices[j] != b)
            .unwrap_or(0)
    }

    pub fn mirror_vertex(&self, f: FaceId, i: usize) -> VertexId {
        let g = self.neighbor(f, i);
        self.vertex(g, self.mirror_index(f, i))
    }

    pub fn finite_vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        (1..self.points.len()).map(VertexId)
    }

    pub fn finite_faces(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.faces
            .iter()
            .enumerate()
            .filter(|(_, f)| !f.is_infinite())
            .map(|(i, _)| FaceId(i))
    }

    /// Every finite edge exactly once, as `(face, index)` with a finite face,
    /// in arena order.
    pub fn finite_edges(&self) -> Vec<(FaceId, usize)> {
        let mut edges = Vec::new();
        for f in self.finite_faces() {
            for i in 0..3 {
                let g = self.neighbor(f, i);
                if self.is_infinite(g) || f < g {
                    edges.push((f, i));
                }
            }
        }
        edges
    }

    /// Constrained edges as vertex pairs.
    pub fn constrained_edges(&self) -> Vec<(VertexId, VertexId)> {
        self.finite_edges()
            .into_iter()
            .filter(|&(f, i)| self.is_constrained(f, i))
            .map(|(f, i)| self.faces[f.0].edge(i))
            .collect()
    }

    /// Faces around `v`, walking across the edges incident to it.
    pub fn incident_faces(&self, v: VertexId) -> Vec<FaceId> {
        let start = self.vertex_face[v.0];
        let mut star = Vec::new();
        let mut f = start;
        for _ in 0..self.faces.len() {
            star.push(f);
            let Some(i) = self.faces[f.0].index_of(v) else {
                break;
            };
            f = self.neighbor(f, cw(i));
            if f == start {
                break;
            }
        }
        star
    }

    /// The face and index of the edge `a`-`b`, if the edge exists.
    pub fn find_edge(&self, a: VertexId, b: VertexId) -> Option<(FaceId, usize)> {
        self.incident_faces(a).into_iter().find_map(|f| {
            let face = &self.faces[f.0];
            face.index_of(b)?;
            let k = (0..3).find(|&k| face.vertices[k] != a && face.vertices[k] != b)?;
            Some((f, k))
        })
    }

    /// Classifies `p` against the finite face `f`: `Ok` when `p` is in the
    /// closed face, `Err(i)` with an edge whose line separates `p` from it.
    fn classify_in_face(&self, f: FaceId, p: Point, start: usize) -> Result<Location, usize> {
        let face = &self.faces[f.0];
        let pts = self.face_points(f);
        if let Some(i) = pts.iter().position(|&q| q == p) {
            return Ok(Location::Vertex(face.vertices[i]));
        }
        let mut on_line = [false; 3];
        for k in 0..3 {
            let i = (start + k) % 3;
            match orientation(pts[ccw(i)], pts[cw(i)], p) {
                Orientation::Clockwise => return Err(i),
                Orientation::Collinear => on_line[i] = true,
                Orientation::CounterClockwise => {}
            }
        }
        let location = match on_line.iter().filter(|&&z| z).count() {
            0 => Location::Face(f),
            1 => {
                let i = on_line.iter().position(|&z| z).unwrap_or(0);
                Location::Edge(f, i)
            }
            _ => {
                let k = on_line.iter().position(|&z| !z).unwrap_or(0);
                Location::Vertex(face.vertices[k])
            }
        };
        Ok(location)
    }

    /// Whether the infinite face `f` sees `p` across its hull edge.
    fn infinite_face_sees(&self, f: FaceId, p: Point) -> bool {
        let face = &self.faces[f.0];
        let Some(k) = face.index_of(VertexId::INFINITE) else {
            return false;
        };
        let (a, b) = self.edge_points(f, k);
        orientation(a, b, p) == Orientation::CounterClockwise
    }

    /// Locates `p` by a visibility walk from the hint face, falling back to
    /// an exhaustive scan if the walk does not settle.
    pub fn locate(&self, p: Point) -> Location {
        let mut f = self.hint;
        for step in 0..=self.faces.len() {
            if self.is_infinite(f) {
                return Location::OutsideConvexHull(f);
            }
            match self.classify_in_face(f, p, step % 3) {
                Ok(location) => return location,
                Err(i) => f = self.neighbor(f, i),
            }
        }
        self.locate_exhaustive(p)
    }

    fn locate_exhaustive(&self, p: Point) -> Location {
        for f in self.finite_faces() {
            if let Ok(location) = self.classify_in_face(f, p, 0) {
                return location;
            }
        }
        (0..self.faces.len())
            .map(FaceId)
            .find(|&f| self.is_infinite(f) && self.infinite_face_sees(f, p))
            .map(Location::OutsideConvexHull)
            .unwrap_or(Location::OutsideConvexHull(self.any_infinite_face()))
    }

    fn any_infinite_face(&self) -> FaceId {
        self.incident_faces(VertexId::INFINITE)
            .first()
            .copied()
            .unwrap_or(FaceId(0))
    }

    /// Checks adjacency symmetry, constrained-flag symmetry, vertex-to-face
    /// links and counter-clockwise orientation of finite faces.
    pub fn validate(&self) -> Result<(), TriangulationError> {
        let broken = |message: String| Err(TriangulationError::Inconsistent { message });
        for (idx, face) in self.faces.iter().enumerate() {
            let f = FaceId(idx);
            for i in 0..3 {
                let g = face.neighbors[i];
                if g.0 >= self.faces.len() {
                    return broken(format!("{f:?} has dangling neighbor {i}"));
                }
                let (a, b) = face.edge(i);
                let other = &self.faces[g.0];
                if !other.has_vertex(a) || !other.has_vertex(b) {
                    return broken(format!("{f:?} and {g:?} do not share edge {i}"));
                }
                let j = self.mirror_index(f, i);
                if other.neighbors[j] != f {
                    return broken(format!("{g:?} does not point back to {f:?}"));
                }
                if other.constrained[j] != face.constrained[i] {
                    return broken(format!("constrained flag mismatch on {f:?}/{i}"));
                }
            }
            if !face.is_infinite() {
                let [a, b, c] = self.face_points(f);
                if orientation(a, b, c) == Orientation::Clockwise {
                    return broken(format!("{f:?} is clockwise"));
                }
            }
        }
        for v in self.finite_vertices() {
            if !self.faces[self.vertex_face[v.0].0].has_vertex(v) {
                return broken(format!("{v:?} has a stale incident face"));
            }
        }
        Ok(())
    }
}
