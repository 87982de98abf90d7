//! Topological edits: face and edge splits, edge flips, hull growth and
//! Delaunay legalization.

use super::arena::Triangulation;
use super::types::{ccw, cw, Face, FaceId, Location, VertexId};
use crate::error::TriangulationError;
use crate::geometry::{incircle, orientation, Orientation, Point};
use std::collections::HashMap;

impl Triangulation {
    /// Seed triangle closed by three infinite faces.
    pub(crate) fn seed(a: Point, b: Point, c: Point) -> Self {
        let mut tri = Self {
            points: vec![Point::default(), a, b, c],
            faces: Vec::with_capacity(4),
            vertex_face: vec![FaceId::NONE; 4],
            hint: FaceId(0),
        };
        let (va, mut vb, mut vc) = (VertexId(1), VertexId(2), VertexId(3));
        if orientation(a, b, c) == Orientation::Clockwise {
            std::mem::swap(&mut vb, &mut vc);
        }
        let inf = VertexId::INFINITE;
        let faces = [
            Face::new([va, vb, vc]),
            Face::new([inf, vc, vb]),
            Face::new([inf, va, vc]),
            Face::new([inf, vb, va]),
        ];
        for face in faces {
            let f = FaceId(tri.faces.len());
            tri.faces.push(face);
            tri.register(f);
        }
        tri.wire_adjacency();
        tri
    }

    /// Wires every face to its neighbors by matching reversed directed edges.
    fn wire_adjacency(&mut self) {
        let mut half_edges: HashMap<(VertexId, VertexId), (FaceId, usize)> = HashMap::new();
        for (idx, face) in self.faces.iter().enumerate() {
            for i in 0..3 {
                half_edges.insert(face.edge(i), (FaceId(idx), i));
            }
        }
        for idx in 0..self.faces.len() {
            for i in 0..3 {
                let (a, b) = self.faces[idx].edge(i);
                if let Some(&(g, _)) = half_edges.get(&(b, a)) {
                    self.faces[idx].neighbors[i] = g;
                }
            }
        }
    }

    fn add_vertex(&mut self, p: Point) -> VertexId {
        self.points.push(p);
        self.vertex_face.push(FaceId::NONE);
        VertexId(self.points.len() - 1)
    }

    /// Records `f` as the incident face of each of its vertices.
    fn register(&mut self, f: FaceId) {
        for v in self.faces[f.0].vertices {
            self.vertex_face[v.0] = f;
        }
    }

    fn write_face(&mut self, f: FaceId, face: Face) {
        self.faces[f.0] = face;
        self.register(f);
    }

    fn push_face(&mut self, face: Face) -> FaceId {
        let f = FaceId(self.faces.len());
        self.faces.push(face);
        self.register(f);
        f
    }

    /// Points the outer neighbor across edge `i` of `f` back at `f`.
    fn relink(&mut self, f: FaceId, i: usize) {
        let (a, b) = self.faces[f.0].edge(i);
        let h = self.faces[f.0].neighbors[i];
        let outer = &mut self.faces[h.0];
        if let Some(j) = (0..3).find(|&j| outer.vertices[j] != a && outer.vertices[j] != b) {
            outer.neighbors[j] = f;
        }
    }

    fn refresh_hint(&mut self, touched: &[FaceId]) {
        if let Some(&f) = touched.iter().find(|&&f| !self.is_infinite(f)) {
            self.hint = f;
        }
    }

    pub(crate) fn set_constrained(&mut self, f: FaceId, i: usize, constrained: bool) {
        let g = self.neighbor(f, i);
        let j = self.mirror_index(f, i);
        self.faces[f.0].constrained[i] = constrained;
        self.faces[g.0].constrained[j] = constrained;
    }

    /// Flips the edge opposite vertex `i` of `f`.
    ///
    /// With `f = (p, a, b)` and `w` the vertex of the neighbor facing `p`,
    /// afterwards `f = (p, a, w)` and the former neighbor is `(p, w, b)`. The
    /// caller guarantees that the quadrilateral is convex and the edge is not
    /// constrained.
    pub fn flip(&mut self, f: FaceId, i: usize) {
        let g = self.neighbor(f, i);
        let j = self.mirror_index(f, i);
        let old_f = self.faces[f.0];
        let old_g = self.faces[g.0];
        let p = old_f.vertices[i];
        let a = old_f.vertices[ccw(i)];
        let b = old_f.vertices[cw(i)];
        let w = old_g.vertices[j];

        let new_f = Face {
            vertices: [p, a, w],
            neighbors: [old_g.neighbors[ccw(j)], g, old_f.neighbors[cw(i)]],
            constrained: [old_g.constrained[ccw(j)], false, old_f.constrained[cw(i)]],
        };
        let new_g = Face {
            vertices: [p, w, b],
            neighbors: [old_g.neighbors[cw(j)], old_f.neighbors[ccw(i)], f],
            constrained: [old_g.constrained[cw(j)], old_f.constrained[ccw(i)], false],
        };
        self.write_face(f, new_f);
        self.write_face(g, new_g);
        self.relink(f, 0);
        self.relink(f, 2);
        self.relink(g, 0);
        self.relink(g, 1);
        self.refresh_hint(&[f, g]);
    }

    /// Splits `f = (a, b, c)` into three faces around a new vertex at `p`.
    fn split_face(&mut self, f: FaceId, p: Point) -> VertexId {
        let v = self.add_vertex(p);
        let old = self.faces[f.0];
        let [a, b, c] = old.vertices;
        let [na, nb, nc] = old.neighbors;
        let [ca, cb, cc] = old.constrained;
        let f1 = FaceId(self.faces.len());
        let f2 = FaceId(self.faces.len() + 1);

        let f0 = Face {
            vertices: [v, b, c],
            neighbors: [na, f1, f2],
            constrained: [ca, false, false],
        };
        self.push_face(Face {
            vertices: [a, v, c],
            neighbors: [f, nb, f2],
            constrained: [false, cb, false],
        });
        self.push_face(Face {
            vertices: [a, b, v],
            neighbors: [f, f1, nc],
            constrained: [false, false, cc],
        });
        self.write_face(f, f0);
        self.relink(f, 0);
        self.relink(f1, 1);
        self.relink(f2, 2);
        self.refresh_hint(&[f, f1, f2]);
        v
    }

    /// Splits the edge opposite vertex `i` of `f` at `p`. A constrained edge
    /// leaves two constrained halves.
    fn split_edge(&mut self, f: FaceId, i: usize, p: Point) -> VertexId {
        let v = self.add_vertex(p);
        let g = self.neighbor(f, i);
        let j = self.mirror_index(f, i);
        let old_f = self.faces[f.0];
        let old_g = self.faces[g.0];
        let apex_f = old_f.vertices[i];
        let a = old_f.vertices[ccw(i)];
        let b = old_f.vertices[cw(i)];
        let apex_g = old_g.vertices[j];
        let split = old_f.constrained[i];
        let f2 = FaceId(self.faces.len());
        let g2 = FaceId(self.faces.len() + 1);

        let f1 = Face {
            vertices: [apex_f, a, v],
            neighbors: [g2, f2, old_f.neighbors[cw(i)]],
            constrained: [split, false, old_f.constrained[cw(i)]],
        };
        self.push_face(Face {
            vertices: [apex_f, v, b],
            neighbors: [g, old_f.neighbors[ccw(i)], f],
            constrained: [split, old_f.constrained[ccw(i)], false],
        });
        let g1 = Face {
            vertices: [apex_g, b, v],
            neighbors: [f2, g2, old_g.neighbors[cw(j)]],
            constrained: [split, false, old_g.constrained[cw(j)]],
        };
        self.push_face(Face {
            vertices: [apex_g, v, a],
            neighbors: [f, old_g.neighbors[ccw(j)], g],
            constrained: [split, old_g.constrained[ccw(j)], false],
        });
        self.write_face(f, f1);
        self.write_face(g, g1);
        self.relink(f, 2);
        self.relink(f2, 1);
        self.relink(g, 2);
        self.relink(g2, 1);
        self.refresh_hint(&[f, f2, g, g2]);
        v
    }

    /// After `v` was attached to the hull through one infinite face, flips
    /// infinite edges while `v` sees the adjacent hull edge.
    fn grow_hull(&mut self, v: VertexId) {
        let p = self.point(v);
        loop {
            let next = self.incident_faces(v).into_iter().find_map(|g| {
                if !self.is_infinite(g) {
                    return None;
                }
                let i = self.face(g).index_of(v)?;
                let h = self.neighbor(g, i);
                let k = self.face(h).index_of(VertexId::INFINITE)?;
                let (a, b) = self.edge_points(h, k);
                (orientation(a, b, p) == Orientation::CounterClockwise).then_some((g, i))
            });
            match next {
                Some((g, i)) => self.flip(g, i),
                None => break,
            }
        }
    }

    /// Inserts `p` by splitting the face or edge containing it, without any
    /// flip inside the existing hull. A point equal to an existing vertex
    /// returns that vertex.
    pub fn insert_local(&mut self, p: Point) -> Result<VertexId, TriangulationError> {
        if !p.is_finite() {
            return Err(TriangulationError::NonFinitePoint { x: p.x, y: p.y });
        }
        let v = match self.locate(p) {
            Location::Vertex(v) => v,
            Location::Face(f) => self.split_face(f, p),
            Location::Edge(f, i) => self.split_edge(f, i, p),
            Location::OutsideConvexHull(f) => {
                let v = self.split_face(f, p);
                self.grow_hull(v);
                v
            }
        };
        Ok(v)
    }

    /// Inserts `p` and restores the (constrained) Delaunay property around it.
    pub fn insert(&mut self, p: Point) -> Result<VertexId, TriangulationError> {
        let before = self.points.len();
        let v = self.insert_local(p)?;
        if v.0 >= before {
            self.legalize_around(v);
        }
        Ok(v)
    }

    /// Lawson flips on unconstrained edges facing `v`.
    fn legalize_around(&mut self, v: VertexId) {
        let mut stack = self.incident_faces(v);
        let mut budget = 64 * self.faces.len() + 64;
        while let Some(f) = stack.pop() {
            if budget == 0 {
                tracing::warn!("legalization budget exhausted around {v:?}");
                break;
            }
            budget -= 1;
            let Some(i) = self.face(f).index_of(v) else {
                continue;
            };
            if self.is_infinite(f) || self.is_constrained(f, i) {
                continue;
            }
            let g = self.neighbor(f, i);
            if self.is_infinite(g) {
                continue;
            }
            let [a, b, c] = self.face_points(f);
            if incircle(a, b, c, self.point(self.mirror_vertex(f, i))) {
                self.flip(f, i);
                stack.push(f);
                stack.push(g);
            }
        }
    }
}
