//! Ant colony configuration.

use crate::energy::EnergyModel;
use crate::escape::EscapeConfig;

/// Configuration for the ant colony driver.
///
/// # Examples
///
/// ```
/// use u_steiner::aco::AcoConfig;
///
/// let config = AcoConfig::default()
///     .with_cycles(100)
///     .with_ants(8)
///     .with_evaporation(0.3)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcoConfig {
    /// Maximum number of colony cycles (`L`).
    pub cycles: usize,

    /// Ants per cycle (`kappa`).
    pub ants: usize,

    /// Pheromone exponent (`chi`).
    pub chi: f64,

    /// Desirability exponent (`psi`).
    pub psi: f64,

    /// Evaporation rate in [0, 1] (`lambda`).
    pub evaporation: f64,

    /// Cycles without obtuse reduction before a randomized escape.
    pub stagnation_cycles: usize,

    pub energy: EnergyModel,

    /// Enable the randomized escape on stagnation.
    pub randomize: bool,

    pub escape: EscapeConfig,

    /// Evaluate ants in parallel using rayon (needs the `parallel`
    /// feature; ignored otherwise). Results do not depend on it.
    pub parallel: bool,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for AcoConfig {
    fn default() -> Self {
        Self {
            cycles: 1230,
            ants: 5,
            chi: 3.0,
            psi: 1.0,
            evaporation: 0.5,
            stagnation_cycles: 15,
            energy: EnergyModel::default(),
            randomize: false,
            escape: EscapeConfig::default(),
            parallel: false,
            seed: None,
        }
    }
}

impl AcoConfig {
    pub fn with_cycles(mut self, n: usize) -> Self {
        self.cycles = n;
        self
    }

    pub fn with_ants(mut self, n: usize) -> Self {
        self.ants = n;
        self
    }

    pub fn with_exponents(mut self, chi: f64, psi: f64) -> Self {
        self.chi = chi;
        self.psi = psi;
        self
    }

    pub fn with_evaporation(mut self, lambda: f64) -> Self {
        self.evaporation = lambda;
        self
    }

    pub fn with_stagnation_cycles(mut self, n: usize) -> Self {
        self.stagnation_cycles = n;
        self
    }

    pub fn with_energy(mut self, energy: EnergyModel) -> Self {
        self.energy = energy;
        self
    }

    pub fn with_randomize(mut self, randomize: bool) -> Self {
        self.randomize = randomize;
        self
    }

    pub fn with_escape(mut self, escape: EscapeConfig) -> Self {
        self.escape = escape;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.ants == 0 {
            return Err("ants must be at least 1".into());
        }
        if !(self.chi.is_finite() && self.chi >= 0.0) {
            return Err(format!("chi must be non-negative, got {}", self.chi));
        }
        if !(self.psi.is_finite() && self.psi >= 0.0) {
            return Err(format!("psi must be non-negative, got {}", self.psi));
        }
        if !(0.0..=1.0).contains(&self.evaporation) {
            return Err(format!(
                "evaporation must be in [0, 1], got {}",
                self.evaporation
            ));
        }
        if self.stagnation_cycles == 0 {
            return Err("stagnation_cycles must be at least 1".into());
        }
        self.energy.validate()?;
        self.escape.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AcoConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ants, 5);
        assert_eq!(config.stagnation_cycles, 15);
        assert!((config.chi - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(AcoConfig::default().with_ants(0).validate().is_err());
        assert!(AcoConfig::default().with_evaporation(1.5).validate().is_err());
        assert!(AcoConfig::default()
            .with_exponents(-1.0, 1.0)
            .validate()
            .is_err());
    }
}
