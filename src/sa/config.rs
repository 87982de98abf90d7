//! SA configuration and cooling schedules.

use crate::energy::EnergyModel;
use crate::escape::EscapeConfig;
use crate::steiner::SteinerMethod;

/// Cooling schedule for temperature reduction, applied once per iteration.
///
/// # References
///
/// - Geometric: standard textbook approach
/// - Linear: fixed-duration cooling
/// - LundyMees: Lundy & Mees (1986), with convergence proof
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoolingSchedule {
    /// Geometric (exponential) cooling: `T_{k+1} = alpha * T_k`.
    Geometric {
        /// Cooling factor in (0, 1). Higher = slower cooling.
        alpha: f64,
    },

    /// Linear cooling: `T_k = T_0 - k * (T_0 - T_min) / max_iterations`.
    Linear,

    /// Lundy-Mees cooling: `T_{k+1} = T_k / (1 + beta * T_k)`.
    ///
    /// Cools fast at high T, slow at low T.
    LundyMees {
        /// Cooling parameter. Typically `(T_0 - T_min) / (max_iter * T_0 * T_min)`.
        beta: f64,
    },
}

impl Default for CoolingSchedule {
    fn default() -> Self {
        CoolingSchedule::Geometric { alpha: 0.99 }
    }
}

/// Iteration windows (exclusive bounds) in which a cold run is reheated.
pub const DEFAULT_REHEAT_WINDOWS: [(usize, usize); 7] = [
    (180, 190),
    (320, 330),
    (440, 450),
    (560, 570),
    (680, 690),
    (830, 840),
    (940, 950),
];

/// Configuration for the simulated annealing driver.
///
/// # Examples
///
/// ```
/// use u_steiner::sa::{CoolingSchedule, SaConfig};
///
/// let config = SaConfig::default()
///     .with_max_iterations(500)
///     .with_cooling(CoolingSchedule::Geometric { alpha: 0.98 })
///     .with_batch_size(4)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaConfig {
    /// Maximum number of iterations. 0 returns the input unchanged.
    pub max_iterations: usize,

    /// Initial temperature.
    pub initial_temperature: f64,

    /// The run stops once the temperature drops to this floor.
    pub min_temperature: f64,

    pub cooling: CoolingSchedule,

    /// Accepted non-improving moves before the working mesh is reset to the
    /// incumbent.
    pub batch_size: usize,

    /// Iteration windows in which the temperature is multiplied by
    /// `reheat_factor` while it is below 1.
    pub reheat_windows: Vec<(usize, usize)>,

    pub reheat_factor: f64,

    /// Generators drawn uniformly at random for each move.
    pub generators: Vec<SteinerMethod>,

    pub energy: EnergyModel,

    /// Try a randomized escape on resets late in the run.
    pub randomize: bool,

    pub escape: EscapeConfig,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1230,
            initial_temperature: 1.0,
            min_temperature: 1e-6,
            cooling: CoolingSchedule::default(),
            batch_size: 5,
            reheat_windows: DEFAULT_REHEAT_WINDOWS.to_vec(),
            reheat_factor: 1.4,
            generators: SteinerMethod::ALL.to_vec(),
            energy: EnergyModel::default(),
            randomize: false,
            escape: EscapeConfig::default(),
            seed: None,
        }
    }
}

impl SaConfig {
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_cooling(mut self, cooling: CoolingSchedule) -> Self {
        self.cooling = cooling;
        self
    }

    pub fn with_batch_size(mut self, n: usize) -> Self {
        self.batch_size = n;
        self
    }

    pub fn with_reheat(mut self, windows: Vec<(usize, usize)>, factor: f64) -> Self {
        self.reheat_windows = windows;
        self.reheat_factor = factor;
        self
    }

    pub fn with_generators(mut self, generators: Vec<SteinerMethod>) -> Self {
        self.generators = generators;
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

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.initial_temperature <= 0.0 {
            return Err("initial_temperature must be positive".into());
        }
        if self.min_temperature <= 0.0 {
            return Err("min_temperature must be positive".into());
        }
        if self.min_temperature >= self.initial_temperature {
            return Err("min_temperature must be less than initial_temperature".into());
        }
        match self.cooling {
            CoolingSchedule::Geometric { alpha } => {
                if alpha <= 0.0 || alpha >= 1.0 {
                    return Err(format!("geometric alpha must be in (0, 1), got {alpha}"));
                }
            }
            CoolingSchedule::LundyMees { beta } => {
                if beta <= 0.0 {
                    return Err(format!("lundy-mees beta must be positive, got {beta}"));
                }
            }
            CoolingSchedule::Linear => {}
        }
        if self.batch_size == 0 {
            return Err("batch_size must be at least 1".into());
        }
        if self.reheat_factor < 1.0 {
            return Err(format!("reheat_factor must be at least 1, got {}", self.reheat_factor));
        }
        if self.generators.is_empty() {
            return Err("at least one generator is required".into());
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
        let config = SaConfig::default();
        assert!((config.initial_temperature - 1.0).abs() < 1e-10);
        assert!((config.min_temperature - 1e-6).abs() < 1e-15);
        assert_eq!(config.batch_size, 5);
        assert_eq!(config.reheat_windows.len(), 7);
        assert_eq!(config.cooling, CoolingSchedule::Geometric { alpha: 0.99 });
    }

    #[test]
    fn test_validate_ok() {
        assert!(SaConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_bad_temperature() {
        let config = SaConfig::default().with_initial_temperature(-1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_min_ge_initial() {
        let config = SaConfig::default()
            .with_initial_temperature(10.0)
            .with_min_temperature(20.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_alpha() {
        let config = SaConfig::default().with_cooling(CoolingSchedule::Geometric { alpha: 1.5 });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_beta() {
        let config = SaConfig::default().with_cooling(CoolingSchedule::LundyMees { beta: -1.0 });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_batch() {
        let config = SaConfig::default().with_batch_size(0);
        assert!(config.validate().is_err());
    }
}
