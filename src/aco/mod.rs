//! Ant Colony Optimization (ACO).
//!
//! Each cycle sends a fixed number of ants from the incumbent mesh. An ant
//! draws a random obtuse face, picks a generator by roulette over pheromone
//! and desirability, and inserts its point into a private copy. Improving
//! ants whose destroyed faces overlap are resolved in favor of the lower
//! energy; the survivors are committed to the incumbent one after another.
//! Trails evaporate every cycle and winners deposit on the generator they
//! used. A run that stops reducing obtuse faces may try a randomized escape.
//!
//! # References
//!
//! - Dorigo & Stützle (2004), "Ant Colony Optimization"
//! - Dorigo, Maniezzo & Colorni (1996), "Ant System: Optimization by a Colony
//!   of Cooperating Agents"

mod ant;
mod config;
mod pheromone;
mod runner;

pub use ant::{resolve_conflicts, Ant, AntPlan};
pub use config::AcoConfig;
pub use pheromone::{desirability, Trails, INITIAL_TRAIL};
pub use runner::AcoRunner;
