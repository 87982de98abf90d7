//! Energy model and convergence statistic.
//!
//! Energy weighs the two quantities every driver trades off:
//!
//! ```text
//! E = alpha * obtuse_faces + beta * steiner_points
//! ```
//!
//! # References
//!
//! - Metropolis et al. (1953), "Equation of State Calculations by Fast
//!   Computing Machines"

use rand::Rng;

/// Replacement for a severe energy increase before the Metropolis test.
pub const SEVERE_DELTA: f64 = 1e-6;

/// Linear energy over obtuse count and Steiner count.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnergyModel {
    /// Weight of one obtuse face.
    pub alpha: f64,
    /// Weight of one inserted point.
    pub beta: f64,
}

impl Default for EnergyModel {
    fn default() -> Self {
        Self {
            alpha: 2.2,
            beta: 0.1,
        }
    }
}

impl EnergyModel {
    pub fn new(alpha: f64, beta: f64) -> Self {
        Self { alpha, beta }
    }

    pub fn energy(&self, obtuse: usize, steiner: usize) -> f64 {
        self.alpha * obtuse as f64 + self.beta * steiner as f64
    }

    /// Collapses a delta of at least `3 * alpha` to [`SEVERE_DELTA`].
    ///
    /// Such a move is accepted almost surely and then rolled back by the
    /// caller, so every large degradation is handled the same way.
    pub fn clamp_severe(&self, delta: f64) -> f64 {
        if delta >= 3.0 * self.alpha {
            SEVERE_DELTA
        } else {
            delta
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(format!("alpha must be positive, got {}", self.alpha));
        }
        if !(self.beta.is_finite() && self.beta >= 0.0) {
            return Err(format!("beta must be non-negative, got {}", self.beta));
        }
        Ok(())
    }
}

/// `exp(-delta / T)`.
pub fn acceptance_probability(delta: f64, temperature: f64) -> f64 {
    (-delta / temperature).exp()
}

/// Metropolis test for a non-improving move: accepts when
/// `exp(-delta / T)` is at least a uniform draw from `[0, 1)`.
pub fn metropolis_accept<R: Rng>(delta: f64, temperature: f64, rng: &mut R) -> bool {
    let r: f64 = rng.random_range(0.0..1.0);
    temperature > 0.0 && acceptance_probability(delta, temperature) >= r
}

/// Convergence term for a step from `previous` to `current` obtuse faces
/// taken with `n` points already inserted:
/// `|ln(current / previous)| / |ln((n + 1) / n)|`.
///
/// Zero when any argument is zero or the count did not change.
pub fn convergence_term(n: usize, previous: usize, current: usize) -> f64 {
    if previous == 0 || current == 0 || n == 0 || previous == current {
        return 0.0;
    }
    let num = (current as f64 / previous as f64).ln().abs();
    let den = ((n + 1) as f64 / n as f64).ln().abs();
    num / den
}

/// Accumulates convergence terms along accepted steps.
///
/// Terms of tentative steps (accepted but not yet improving the incumbent)
/// are held back until the next improvement, and dropped on rollback.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvergenceTracker {
    sum: f64,
    pending: f64,
    previous: usize,
}

impl ConvergenceTracker {
    pub fn new(initial_obtuse: usize) -> Self {
        Self {
            sum: 0.0,
            pending: 0.0,
            previous: initial_obtuse,
        }
    }

    /// Records an improvement reaching `obtuse` faces; `steiner_before` is
    /// the point count before the step.
    pub fn improve(&mut self, steiner_before: usize, obtuse: usize) {
        self.sum += convergence_term(steiner_before, self.previous, obtuse) + self.pending;
        self.pending = 0.0;
        self.previous = obtuse;
    }

    /// Records a tentative step.
    pub fn tentative(&mut self, steiner_before: usize, obtuse: usize) {
        self.pending += convergence_term(steiner_before, self.previous, obtuse);
        self.previous = obtuse;
    }

    /// Drops tentative terms after a rollback to an incumbent with
    /// `incumbent_obtuse` faces.
    pub fn rollback(&mut self, incumbent_obtuse: usize) {
        self.pending = 0.0;
        self.previous = incumbent_obtuse;
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// `sum / (N - 1)` for a final Steiner count `N > 1`, else 0.
    pub fn rate(&self, steiner_count: usize) -> f64 {
        if steiner_count > 1 {
            self.sum / (steiner_count - 1) as f64
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_energy_weights() {
        let model = EnergyModel::default();
        assert!((model.energy(3, 2) - (3.0 * 2.2 + 2.0 * 0.1)).abs() < 1e-12);
        assert_eq!(model.energy(0, 0), 0.0);
    }

    #[test]
    fn test_clamp_severe() {
        let model = EnergyModel::default();
        assert_eq!(model.clamp_severe(3.0 * 2.2), SEVERE_DELTA);
        assert_eq!(model.clamp_severe(10.0), SEVERE_DELTA);
        assert_eq!(model.clamp_severe(2.3), 2.3);
        assert_eq!(model.clamp_severe(-2.1), -2.1);
    }

    #[test]
    fn test_metropolis_extremes() {
        let mut rng = StdRng::seed_from_u64(1);
        // exp(-1e-6 / 1) is within a hair of 1: practically always accepted.
        let accepted = (0..200)
            .filter(|_| metropolis_accept(SEVERE_DELTA, 1.0, &mut rng))
            .count();
        assert!(accepted >= 199, "accepted {accepted}/200");
        // exp(-100 / 1e-3) underflows to 0: accepted only on a zero draw.
        let accepted = (0..200)
            .filter(|_| metropolis_accept(100.0, 1e-3, &mut rng))
            .count();
        assert_eq!(accepted, 0);
    }

    #[test]
    fn test_convergence_term() {
        assert_eq!(convergence_term(0, 4, 2), 0.0);
        assert_eq!(convergence_term(1, 4, 4), 0.0);
        assert_eq!(convergence_term(1, 0, 2), 0.0);
        // ln(2) / ln(2) = 1
        assert!((convergence_term(1, 4, 2) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_tracker_rollback_drops_pending() {
        let mut tracker = ConvergenceTracker::new(4);
        tracker.tentative(1, 2);
        tracker.rollback(4);
        tracker.improve(1, 2);
        assert!((tracker.sum() - 1.0).abs() < 1e-12);

        let mut tracker = ConvergenceTracker::new(4);
        tracker.tentative(1, 2);
        tracker.improve(2, 1);
        // ln(2)/ln(2) held back, then ln(2)/ln(3/2) on improvement.
        let expected = 1.0 + 2f64.ln() / 1.5f64.ln();
        assert!((tracker.sum() - expected).abs() < 1e-12);
        assert!((tracker.rate(3) - expected / 2.0).abs() < 1e-12);
        assert_eq!(tracker.rate(1), 0.0);
    }

    #[test]
    fn test_validate() {
        assert!(EnergyModel::default().validate().is_ok());
        assert!(EnergyModel::new(0.0, 0.1).validate().is_err());
        assert!(EnergyModel::new(1.0, -0.1).validate().is_err());
    }
}
