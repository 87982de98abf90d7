//! Steepest-descent local search.
//!
//! Every pass scans the obtuse faces of the region. For each face all
//! configured generators are tried on independent copies of the mesh and the
//! one leaving the fewest obtuse faces wins; the first face whose winner
//! beats the incumbent is committed and the scan restarts. A pass without
//! improvement spends one unit of the pass budget and, when enabled, tries a
//! randomized escape.

mod config;
mod runner;

pub use config::LocalSearchConfig;
pub use runner::LocalSearchRunner;
