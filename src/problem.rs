//! Problem instances, driver dispatch and solution export.
//!
//! An [`Instance`] is a point list plus a region boundary and optional
//! constraints, all given by index. [`optimize`] builds the constrained
//! triangulation, runs the selected [`Method`] and exports the result as a
//! [`Solution`] whose edges index into the input points followed by the
//! inserted Steiner points.

use std::cmp::Ordering;

use crate::aco::{AcoConfig, AcoRunner};
use crate::error::{OptimizeError, TriangulationError};
use crate::geometry::{is_convex_polygon, Point};
use crate::local::{LocalSearchConfig, LocalSearchRunner};
use crate::region::Boundary;
use crate::report::Outcome;
use crate::sa::{SaConfig, SaRunner};
use crate::triangulation::{Triangulation, VertexId};

/// Input of an optimization run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instance {
    pub points: Vec<Point>,
    /// Indices into `points`, in boundary order. The polygon closes itself.
    pub region_boundary: Vec<usize>,
    /// Index pairs of extra constrained segments.
    pub additional_constraints: Vec<(usize, usize)>,
}

/// Shape class of an instance. Descriptive only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InstanceCategory {
    /// Convex boundary, no additional constraints.
    ConvexUnconstrained,
    /// Convex boundary, constraints that close no cycle.
    ConvexOpenConstraints,
    /// Convex boundary, constraints closing a cycle with the boundary or among
    /// themselves.
    ConvexClosedConstraints,
    /// Non-convex boundary made of horizontal and vertical edges only.
    NonConvexAxisAligned,
    Unspecified,
}

impl Instance {
    pub fn new(
        points: Vec<Point>,
        region_boundary: Vec<usize>,
        additional_constraints: Vec<(usize, usize)>,
    ) -> Self {
        Self {
            points,
            region_boundary,
            additional_constraints,
        }
    }

    fn check_index(&self, index: usize) -> Result<(), TriangulationError> {
        if index >= self.points.len() {
            return Err(TriangulationError::InvalidIndex {
                index,
                len: self.points.len(),
            });
        }
        Ok(())
    }

    /// Delaunay triangulation of all points with the boundary edges and the
    /// additional segments constrained, together with the region.
    pub fn build(&self) -> Result<(Triangulation, Boundary), OptimizeError> {
        for &i in &self.region_boundary {
            self.check_index(i)?;
        }
        for &(a, b) in &self.additional_constraints {
            self.check_index(a)?;
            self.check_index(b)?;
        }

        let region = Boundary::new(
            self.region_boundary
                .iter()
                .map(|&i| self.points[i])
                .collect(),
        )?;
        let (mut tri, ids) = Triangulation::from_points_indexed(&self.points)?;
        let n = self.region_boundary.len();
        for k in 0..n {
            let (a, b) = (self.region_boundary[k], self.region_boundary[(k + 1) % n]);
            tri.insert_constraint(ids[a], ids[b])?;
        }
        for &(a, b) in &self.additional_constraints {
            tri.insert_constraint(ids[a], ids[b])?;
        }
        tracing::debug!(
            vertices = tri.number_of_vertices(),
            constraints = tri.constrained_edges().len(),
            "instance built"
        );
        Ok((tri, region))
    }

    /// Classifies the instance by boundary shape and constraint layout.
    pub fn category(&self) -> InstanceCategory {
        let Some(polygon) = self
            .region_boundary
            .iter()
            .map(|&i| self.points.get(i).copied())
            .collect::<Option<Vec<Point>>>()
        else {
            return InstanceCategory::Unspecified;
        };

        if is_convex_polygon(&polygon) {
            if self.additional_constraints.is_empty() {
                InstanceCategory::ConvexUnconstrained
            } else if self.constraints_closed() {
                InstanceCategory::ConvexClosedConstraints
            } else {
                InstanceCategory::ConvexOpenConstraints
            }
        } else {
            let n = polygon.len();
            let axis_aligned = (0..n).all(|k| {
                let (a, b) = (polygon[k], polygon[(k + 1) % n]);
                a.x == b.x || a.y == b.y
            });
            if axis_aligned {
                InstanceCategory::NonConvexAxisAligned
            } else {
                InstanceCategory::Unspecified
            }
        }
    }

    /// Whether the constraint graph, with every boundary vertex merged into
    /// one node, contains a cycle.
    fn constraints_closed(&self) -> bool {
        let boundary_node = self.points.len();
        let node = |i: usize| {
            if self.region_boundary.contains(&i) {
                boundary_node
            } else {
                i
            }
        };
        let mut parent: Vec<usize> = (0..=boundary_node).collect();
        fn find(parent: &mut [usize], mut x: usize) -> usize {
            while parent[x] != x {
                parent[x] = parent[parent[x]];
                x = parent[x];
            }
            x
        }
        for &(a, b) in &self.additional_constraints {
            if a == b || a >= boundary_node || b >= boundary_node {
                continue;
            }
            let (ra, rb) = (find(&mut parent, node(a)), find(&mut parent, node(b)));
            if ra == rb {
                return true;
            }
            parent[ra] = rb;
        }
        false
    }
}

/// Driver selection with its configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Method {
    LocalSearch(LocalSearchConfig),
    SimulatedAnnealing(SaConfig),
    AntColony(AcoConfig),
    /// Simulated annealing over all generators with the randomized escape.
    Auto { seed: Option<u64> },
}

impl Method {
    pub fn name(&self) -> &'static str {
        match self {
            Method::LocalSearch(_) => "local search",
            Method::SimulatedAnnealing(_) => "simulated annealing",
            Method::AntColony(_) => "ant colony",
            Method::Auto { .. } => "auto",
        }
    }

    /// Annealing configuration used by [`Method::Auto`].
    pub fn auto_config(seed: Option<u64>) -> SaConfig {
        let mut config = SaConfig::default().with_randomize(true);
        config.seed = seed;
        config
    }
}

/// Exported result of [`optimize`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    /// Points of the result that are not input points, in vertex order.
    pub steiner_points: Vec<Point>,
    /// Finite edges as sorted index pairs into the input points followed by
    /// `steiner_points`.
    pub edges: Vec<(usize, usize)>,
    pub outcome: Outcome,
}

impl Solution {
    /// Exports `outcome` against the input point list of `instance`.
    pub fn from_outcome(instance: &Instance, outcome: Outcome) -> Self {
        let tri = &outcome.triangulation;
        let mut sorted: Vec<(Point, usize)> = instance
            .points
            .iter()
            .enumerate()
            .map(|(i, &p)| (p, i))
            .collect();
        // Stable sort keeps the first index of repeated points.
        sorted.sort_by(|a, b| a.0.lex_cmp(&b.0));

        let input_index = |p: Point| -> Option<usize> {
            let k = sorted.partition_point(|(q, _)| q.lex_cmp(&p) == Ordering::Less);
            sorted.get(k).filter(|(q, _)| *q == p).map(|&(_, i)| i)
        };

        let mut index = vec![usize::MAX; tri.number_of_vertices() + 1];
        let mut steiner_points = Vec::new();
        for v in tri.finite_vertices() {
            let p = tri.point(v);
            index[v.0] = match input_index(p) {
                Some(i) => i,
                None => {
                    steiner_points.push(p);
                    instance.points.len() + steiner_points.len() - 1
                }
            };
        }

        let vertex_index = |v: VertexId| index[v.0];
        let mut edges: Vec<(usize, usize)> = tri
            .finite_edges()
            .into_iter()
            .map(|(f, i)| {
                let (a, b) = tri.face(f).edge(i);
                let (a, b) = (vertex_index(a), vertex_index(b));
                (a.min(b), a.max(b))
            })
            .collect();
        edges.sort_unstable();

        Self {
            steiner_points,
            edges,
            outcome,
        }
    }
}

/// Builds the instance, runs `method` and exports the result.
///
/// # Examples
///
/// ```
/// use u_steiner::geometry::Point;
/// use u_steiner::local::LocalSearchConfig;
/// use u_steiner::problem::{optimize, Instance, Method};
///
/// let instance = Instance::new(
///     vec![Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(1.0, 1.0)],
///     vec![0, 1, 2],
///     vec![],
/// );
/// let solution = optimize(&instance, &Method::LocalSearch(LocalSearchConfig::default())).unwrap();
/// assert_eq!(solution.outcome.obtuse_count, 0);
/// assert_eq!(solution.steiner_points.len(), solution.outcome.steiner_count);
/// ```
pub fn optimize(instance: &Instance, method: &Method) -> Result<Solution, OptimizeError> {
    let (tri, region) = instance.build()?;
    tracing::info!(
        points = instance.points.len(),
        category = ?instance.category(),
        method = method.name(),
        "optimizing instance"
    );
    let outcome = match method {
        Method::LocalSearch(config) => LocalSearchRunner::run(tri, region, config)?,
        Method::SimulatedAnnealing(config) => SaRunner::run(tri, region, config)?,
        Method::AntColony(config) => AcoRunner::run(tri, region, config)?,
        Method::Auto { seed } => SaRunner::run(tri, region, &Method::auto_config(*seed))?,
    };
    Ok(Solution::from_outcome(instance, outcome))
}
