//! Simulated Annealing (SA).
//!
//! Each iteration walks the obtuse faces of a working mesh and applies one
//! randomly chosen generator per face until a move is accepted. Moves that
//! lower the energy below the incumbent's are committed; others pass the
//! Metropolis test and are kept only tentatively. After `batch_size`
//! tentative moves, or one severe degradation, the working mesh is reset to
//! the incumbent. Cold runs are reheated inside fixed iteration windows.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Lundy & Mees (1986), "Convergence of an Annealing Algorithm"

mod config;
mod runner;

pub use config::{CoolingSchedule, SaConfig, DEFAULT_REHEAT_WINDOWS};
pub use runner::SaRunner;
