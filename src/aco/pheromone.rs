//! Pheromone trails, desirability curves and roulette selection.

use rand::Rng;

use crate::steiner::SteinerMethod;

/// Starting value of every trail.
pub const INITIAL_TRAIL: f64 = 0.5;

/// Heuristic desirability of each pheromone generator for a face with
/// radius-to-height ratio `rho`, in [`SteinerMethod::PHEROMONE`] order.
///
/// - circumcenter: `rho / (2 + rho)`
/// - midpoint: `(3 - 2 rho) / 3`, zero from `rho >= 1.5`
/// - projection: `(rho - 1) / rho`, zero up to `rho <= 1`
/// - adjacent faces: 1 with an obtuse neighbor, else 0
pub fn desirability(rho: f64, has_obtuse_neighbor: bool) -> [f64; 4] {
    let circumcenter = rho / (2.0 + rho);
    let midpoint = if rho >= 1.5 {
        0.0
    } else {
        ((3.0 - 2.0 * rho) / 3.0).max(0.0)
    };
    let projection = if rho <= 1.0 { 0.0 } else { (rho - 1.0) / rho };
    let adjacent = if has_obtuse_neighbor { 1.0 } else { 0.0 };
    [circumcenter, midpoint, projection, adjacent]
}

/// Per-generator pheromone levels.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trails {
    tau: [f64; 4],
}

impl Default for Trails {
    fn default() -> Self {
        Self {
            tau: [INITIAL_TRAIL; 4],
        }
    }
}

impl Trails {
    pub fn values(&self) -> [f64; 4] {
        self.tau
    }

    /// Selection probabilities `tau^chi * eta^psi`, normalized, with the
    /// rounding residual added to the last bucket. `None` when all weights
    /// vanish.
    pub fn probabilities(&self, eta: &[f64; 4], chi: f64, psi: f64) -> Option<[f64; 4]> {
        let mut weights = [0.0; 4];
        for i in 0..4 {
            weights[i] = self.tau[i].powf(chi) * eta[i].powf(psi);
        }
        let denominator: f64 = weights.iter().sum();
        if denominator <= 0.0 || !denominator.is_finite() {
            return None;
        }
        for w in &mut weights {
            *w /= denominator;
        }
        let residual = 1.0 - weights.iter().sum::<f64>();
        weights[3] += residual;
        Some(weights)
    }

    /// Roulette-wheel choice among the pheromone generators.
    ///
    /// A zero denominator logs a warning and returns
    /// [`SteinerMethod::Circumcenter`] without drawing.
    pub fn select<R: Rng>(&self, eta: &[f64; 4], chi: f64, psi: f64, rng: &mut R) -> SteinerMethod {
        let Some(probabilities) = self.probabilities(eta, chi, psi) else {
            tracing::warn!(?eta, tau = ?self.tau, "zero selection denominator");
            return SteinerMethod::Circumcenter;
        };
        let r: f64 = rng.random_range(0.0..1.0);
        let mut cumulative = 0.0;
        for (method, p) in SteinerMethod::PHEROMONE.iter().zip(probabilities) {
            cumulative += p;
            if r <= cumulative {
                return *method;
            }
        }
        SteinerMethod::AdjacentFaces
    }

    /// Evaporates every trail and deposits `1 / (1 + energy)` per winning
    /// ant on the generator it used. Centroid carries no trail.
    pub fn reinforce<I>(&mut self, winners: I, evaporation: f64)
    where
        I: IntoIterator<Item = (SteinerMethod, f64)>,
    {
        let mut deposit = [0.0; 4];
        for (method, energy) in winners {
            if method == SteinerMethod::Centroid {
                continue;
            }
            deposit[method.index()] += 1.0 / (1.0 + energy);
        }
        for (tau, delta) in self.tau.iter_mut().zip(deposit) {
            *tau = (1.0 - evaporation) * *tau + delta;
        }
    }
}
