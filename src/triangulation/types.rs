//! Handles and records of the face arena.

/// Index of a vertex. Vertex 0 is the infinite vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VertexId(pub usize);

impl VertexId {
    pub const INFINITE: VertexId = VertexId(0);

    pub fn is_infinite(self) -> bool {
        self == Self::INFINITE
    }
}

/// Index of a face in the arena. Stays valid for the lifetime of the
/// triangulation (faces are rewritten, never removed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FaceId(pub usize);

impl FaceId {
    /// Placeholder for adjacency not yet wired during construction.
    pub(crate) const NONE: FaceId = FaceId(usize::MAX);
}

/// Face identity that survives cloning: the sorted vertex ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceKey(pub [VertexId; 3]);

impl FaceKey {
    pub fn new(mut vertices: [VertexId; 3]) -> Self {
        vertices.sort_unstable();
        Self(vertices)
    }
}

/// One triangle of the arena.
///
/// `neighbors[i]` lies across the edge opposite `vertices[i]`, which runs
/// from `vertices[ccw(i)]` to `vertices[cw(i)]`. `constrained[i]` flags that
/// same edge.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Face {
    pub vertices: [VertexId; 3],
    pub neighbors: [FaceId; 3],
    pub constrained: [bool; 3],
}

impl Face {
    pub(crate) fn new(vertices: [VertexId; 3]) -> Self {
        Self {
            vertices,
            neighbors: [FaceId::NONE; 3],
            constrained: [false; 3],
        }
    }

    pub fn index_of(&self, v: VertexId) -> Option<usize> {
        self.vertices.iter().position(|&w| w == v)
    }

    pub fn neighbor_index(&self, f: FaceId) -> Option<usize> {
        self.neighbors.iter().position(|&g| g == f)
    }

    pub fn has_vertex(&self, v: VertexId) -> bool {
        self.vertices.contains(&v)
    }

    pub fn is_infinite(&self) -> bool {
        self.has_vertex(VertexId::INFINITE)
    }

    /// Endpoints of the edge opposite vertex `i`.
    pub fn edge(&self, i: usize) -> (VertexId, VertexId) {
        (self.vertices[ccw(i)], self.vertices[cw(i)])
    }
}

/// Where a query point falls in the triangulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// Coincides with an existing vertex.
    Vertex(VertexId),
    /// On the edge opposite vertex `i` of the face, strictly between its endpoints.
    Edge(FaceId, usize),
    /// Strictly inside a finite face.
    Face(FaceId),
    /// Outside the convex hull; the infinite face sees the point.
    OutsideConvexHull(FaceId),
}

impl Location {
    /// A face incident to the location, if it is finite.
    pub fn finite_face(self) -> Option<FaceId> {
        match self {
            Location::Edge(f, _) | Location::Face(f) => Some(f),
            Location::Vertex(_) | Location::OutsideConvexHull(_) => None,
        }
    }
}

#[inline]
pub fn ccw(i: usize) -> usize {
    (i + 1) % 3
}

#[inline]
pub fn cw(i: usize) -> usize {
    (i + 2) % 3
}
