//! Local search configuration.

use crate::energy::EnergyModel;
use crate::escape::EscapeConfig;
use crate::steiner::SteinerMethod;

/// Configuration for [`LocalSearchRunner`](super::LocalSearchRunner).
///
/// # Examples
///
/// ```
/// use u_steiner::local::LocalSearchConfig;
/// use u_steiner::steiner::SteinerMethod;
///
/// let config = LocalSearchConfig::default()
///     .with_max_passes(200)
///     .with_generators(vec![SteinerMethod::Midpoint, SteinerMethod::Projection])
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalSearchConfig {
    /// Passes without improvement allowed before stopping (`L`).
    pub max_passes: usize,

    /// Generators tried on every obtuse face.
    pub generators: Vec<SteinerMethod>,

    pub energy: EnergyModel,

    /// Try a randomized escape after each pass without improvement.
    pub randomize: bool,

    pub escape: EscapeConfig,

    /// Random seed for the escape helper.
    pub seed: Option<u64>,
}

impl Default for LocalSearchConfig {
    fn default() -> Self {
        Self {
            max_passes: 1230,
            generators: SteinerMethod::ALL.to_vec(),
            energy: EnergyModel::default(),
            randomize: false,
            escape: EscapeConfig::default(),
            seed: None,
        }
    }
}

impl LocalSearchConfig {
    pub fn with_max_passes(mut self, n: usize) -> Self {
        self.max_passes = n;
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
        if self.generators.is_empty() {
            return Err("at least one generator is required".into());
        }
        self.energy.validate()?;
        self.escape.validate()
    }
}
