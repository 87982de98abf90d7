//! Obtuse-triangle minimization for constrained planar triangulations.
//!
//! Inserts Steiner points into a constrained Delaunay triangulation to remove
//! obtuse triangles from a polygonal region while keeping the number of
//! inserted points small. Three drivers share one set of point generators and
//! one energy model:
//!
//! - **Local search**: greedy passes over the obtuse faces, keeping the best
//!   generator per face.
//! - **Simulated Annealing (SA)**: random generator moves accepted by the
//!   Metropolis rule, with batched resets and reheating.
//! - **Ant Colony Optimization (ACO)**: pheromone-guided generator choice,
//!   parallel ants and conflict resolution between overlapping insertions.
//!
//! Every inserted point is followed by a flip-restoration pass that removes
//! obtuse faces by swapping diagonals where that helps.
//!
//! # Architecture
//!
//! - [`geometry`] and [`triangulation`] form the kernel: `f64` predicates with
//!   a relative tolerance and an arena-based constrained triangulation.
//! - [`region`], [`flips`], [`quality`], [`steiner`], [`escape`] and
//!   [`energy`] are the building blocks the drivers compose.
//! - [`local`], [`sa`] and [`aco`] are the drivers; each returns a
//!   [`report::Outcome`].
//! - [`problem`] builds triangulations from indexed instances and exports
//!   solutions.
//!
//! # Example
//!
//! ```
//! use u_steiner::geometry::Point;
//! use u_steiner::problem::{optimize, Instance, Method};
//! use u_steiner::sa::SaConfig;
//!
//! let instance = Instance::new(
//!     vec![Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(1.0, 1.0)],
//!     vec![0, 1, 2],
//!     vec![],
//! );
//! let method = Method::SimulatedAnnealing(SaConfig::default().with_seed(7));
//! let solution = optimize(&instance, &method).unwrap();
//! assert!(solution.outcome.obtuse_count <= solution.outcome.initial_obtuse);
//! ```

pub mod aco;
pub mod energy;
pub mod error;
pub mod escape;
pub mod flips;
pub mod geometry;
pub mod local;
pub mod problem;
pub mod quality;
pub mod region;
pub mod report;
pub mod sa;
pub mod steiner;
pub mod triangulation;

#[cfg(test)]
mod test_support;

pub use error::{OptimizeError, TriangulationError};
pub use problem::{optimize, Instance, InstanceCategory, Method, Solution};
pub use report::{GeneratorUsage, Outcome};
