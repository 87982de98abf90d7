//! Generator identities and candidate records.

use crate::geometry::Point;
use crate::region::Boundary;

/// A Steiner point placement rule.
///
/// The discriminants double as indices into usage counters and, for the
/// first four, into the colony's pheromone vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SteinerMethod {
    /// Circumcenter of the obtuse triangle.
    Circumcenter = 0,
    /// Midpoint of the longest side.
    Midpoint = 1,
    /// Foot of the perpendicular from the obtuse corner.
    Projection = 2,
    /// Bounding-box center of a cluster of adjacent obtuse faces.
    AdjacentFaces = 3,
    /// Centroid of the triangle.
    Centroid = 4,
}

impl SteinerMethod {
    pub const ALL: [SteinerMethod; 5] = [
        SteinerMethod::Circumcenter,
        SteinerMethod::Midpoint,
        SteinerMethod::Projection,
        SteinerMethod::AdjacentFaces,
        SteinerMethod::Centroid,
    ];

    /// Methods steered by pheromone in the ant colony.
    pub const PHEROMONE: [SteinerMethod; 4] = [
        SteinerMethod::Circumcenter,
        SteinerMethod::Midpoint,
        SteinerMethod::Projection,
        SteinerMethod::AdjacentFaces,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            SteinerMethod::Circumcenter => "circumcenter",
            SteinerMethod::Midpoint => "midpoint",
            SteinerMethod::Projection => "projection",
            SteinerMethod::AdjacentFaces => "adjacent-faces",
            SteinerMethod::Centroid => "centroid",
        }
    }

    /// Replacement tried when this method's candidate is inadmissible.
    pub fn fallback(self) -> Option<SteinerMethod> {
        match self {
            SteinerMethod::Circumcenter => Some(SteinerMethod::Centroid),
            SteinerMethod::AdjacentFaces => Some(SteinerMethod::Projection),
            _ => None,
        }
    }

    /// Every non-empty subset of [`SteinerMethod::ALL`] that contains
    /// `required`, in bitmask order. Useful for sweeping generator
    /// configurations.
    pub fn subsets_containing(required: SteinerMethod) -> Vec<Vec<SteinerMethod>> {
        (1u32..1 << Self::ALL.len())
            .filter(|mask| mask & (1 << required.index()) != 0)
            .map(|mask| {
                Self::ALL
                    .iter()
                    .copied()
                    .filter(|m| mask & (1 << m.index()) != 0)
                    .collect()
            })
            .collect()
    }
}

/// A proposed Steiner point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteinerCandidate {
    pub method: SteinerMethod,
    pub point: Point,
    /// Segment the point was derived from (midpoint and projection only);
    /// used to split the region boundary when the point lands on it.
    pub edge: Option<(Point, Point)>,
    pub admissible: bool,
}

impl SteinerCandidate {
    pub(crate) fn new(method: SteinerMethod, point: Point, admissible: bool) -> Self {
        Self {
            method,
            point,
            edge: None,
            admissible,
        }
    }

    pub(crate) fn with_edge(mut self, a: Point, b: Point) -> Self {
        self.edge = Some((a, b));
        self
    }

    /// Splits the region boundary if the point landed on the edge it was
    /// derived from. Returns whether the boundary grew.
    pub fn update_boundary(&self, region: &mut Boundary) -> bool {
        match self.edge {
            Some((a, b)) => region.update_on_insert(self.point, a, b),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip() {
        for m in SteinerMethod::ALL {
            assert_eq!(SteinerMethod::from_index(m.index()), Some(m));
        }
        assert_eq!(SteinerMethod::from_index(5), None);
    }

    #[test]
    fn test_fallbacks() {
        assert_eq!(SteinerMethod::Circumcenter.fallback(), Some(SteinerMethod::Centroid));
        assert_eq!(SteinerMethod::AdjacentFaces.fallback(), Some(SteinerMethod::Projection));
        assert_eq!(SteinerMethod::Centroid.fallback(), None);
    }

    #[test]
    fn test_subsets_containing_projection() {
        let subsets = SteinerMethod::subsets_containing(SteinerMethod::Projection);
        assert_eq!(subsets.len(), 16);
        assert!(subsets.iter().all(|s| s.contains(&SteinerMethod::Projection)));
        assert_eq!(subsets[0], vec![SteinerMethod::Projection]);
        assert_eq!(subsets.last().unwrap().len(), 5);
    }
}
