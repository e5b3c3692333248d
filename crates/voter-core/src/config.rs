//! Configuration System
//!
//! Per-run parameters, plus the optional `voter.toml` tuning file that
//! overrides the influence threshold, default seed and network parameters
//! without recompiling.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;
use voter_events::{InteractionKind, SimulationKind};

use crate::error::ConfigError;
use crate::network::NetworkParams;

/// Default tuning file path
pub const DEFAULT_TUNING_PATH: &str = "voter.toml";

/// Influence above which a group adopts opinion 1
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Seed used when neither the CLI nor the tuning file provides one
pub const DEFAULT_SEED: u64 = 42;

/// Immutable parameters of a single model run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub experiment_id: String,
    pub ensemble_id: usize,
    pub simulation: SimulationKind,
    pub interaction: InteractionKind,
    /// Group size `k` for higher-order sampling
    pub interactants: usize,
    /// Fraction `p0` of agents starting at opinion 1
    pub initial_fraction: f64,
    /// Population size `N`
    pub n: usize,
    /// Step budget `T`
    pub max_steps: u64,
    /// Adoption threshold `θ`
    pub threshold: f64,
    /// Seed of the run's generator
    pub seed: u64,
    /// Emit one agent record per agent per step
    pub record_agents: bool,
}

impl SimulationConfig {
    pub fn new(simulation: SimulationKind, interaction: InteractionKind, n: usize) -> Self {
        Self {
            experiment_id: "local".to_string(),
            ensemble_id: 0,
            simulation,
            interaction,
            interactants: 2,
            initial_fraction: 0.5,
            n,
            max_steps: 100,
            threshold: DEFAULT_THRESHOLD,
            seed: DEFAULT_SEED,
            record_agents: false,
        }
    }

    pub fn with_member(mut self, experiment_id: impl Into<String>, ensemble_id: usize) -> Self {
        self.experiment_id = experiment_id.into();
        self.ensemble_id = ensemble_id;
        self
    }

    pub fn with_interactants(mut self, interactants: usize) -> Self {
        self.interactants = interactants;
        self
    }

    pub fn with_initial_fraction(mut self, fraction: f64) -> Self {
        self.initial_fraction = fraction;
        self
    }

    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_agent_records(mut self, enabled: bool) -> Self {
        self.record_agents = enabled;
        self
    }

    /// Checks every parameter that can be wrong independently of the network.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.interactants == 0 {
            return Err(ConfigError::InvalidInteractants(self.interactants));
        }
        if !(0.0..=1.0).contains(&self.initial_fraction) {
            return Err(ConfigError::InvalidInitialFraction(self.initial_fraction));
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::InvalidThreshold(self.threshold));
        }
        Ok(())
    }

    /// Number of agents starting at opinion 1: `ceil(N · p0)`.
    ///
    /// Products within 1e-9 of an integer count as that integer, so
    /// `10 · 0.3` yields 3 rather than 4.
    pub fn initial_yes_count(&self) -> usize {
        let raw = self.n as f64 * self.initial_fraction;
        let nearest = raw.round();
        let count = if (raw - nearest).abs() < 1e-9 {
            nearest
        } else {
            raw.ceil()
        };
        (count.max(0.0) as usize).min(self.n)
    }
}

/// Parses a simulation kind code.
pub fn parse_simulation(code: &str) -> Result<SimulationKind, ConfigError> {
    code.parse()
        .map_err(|_| ConfigError::UnsupportedSimulation(code.to_string()))
}

/// Parses an interaction kind code.
pub fn parse_interaction(code: &str) -> Result<InteractionKind, ConfigError> {
    code.parse()
        .map_err(|_| ConfigError::UnsupportedInteraction(code.to_string()))
}

/// Contents of the tuning file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub simulation: SimulationTuning,
    pub network: NetworkParams,
}

/// Simulation-wide tuning values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationTuning {
    pub threshold: f64,
    pub seed: u64,
}

impl Default for SimulationTuning {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            seed: DEFAULT_SEED,
        }
    }
}

impl Tuning {
    /// Load tuning from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::TuningIo(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parse tuning from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::TuningParse(e.to_string()))
    }

    /// Load tuning from `path`, or use defaults if the file does not exist.
    ///
    /// A file that exists but does not parse is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("No tuning file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::TuningParse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(n: usize, p0: f64) -> SimulationConfig {
        SimulationConfig::new(SimulationKind::Matrix, InteractionKind::Dyadic, n)
            .with_initial_fraction(p0)
    }

    #[test]
    fn test_initial_yes_count_rounds_up() {
        assert_eq!(config(4, 0.5).initial_yes_count(), 2);
        assert_eq!(config(5, 0.5).initial_yes_count(), 3);
        assert_eq!(config(7, 0.01).initial_yes_count(), 1);
        assert_eq!(config(7, 0.0).initial_yes_count(), 0);
        assert_eq!(config(7, 1.0).initial_yes_count(), 7);
    }

    #[test]
    fn test_initial_yes_count_ignores_float_noise() {
        // 10 * 0.3 is 3.0000000000000004 in binary floating point
        assert_eq!(config(10, 0.3).initial_yes_count(), 3);
        assert_eq!(config(100, 0.07).initial_yes_count(), 7);
    }

    #[test]
    fn test_validate() {
        assert!(config(10, 0.5).validate().is_ok());
        assert_eq!(config(0, 0.5).validate(), Err(ConfigError::EmptyPopulation));
        assert_eq!(
            config(10, 1.5).validate(),
            Err(ConfigError::InvalidInitialFraction(1.5))
        );
        assert!(matches!(
            config(10, f64::NAN).validate(),
            Err(ConfigError::InvalidInitialFraction(_))
        ));
        assert_eq!(
            config(10, 0.5).with_interactants(0).validate(),
            Err(ConfigError::InvalidInteractants(0))
        );
        assert_eq!(
            config(10, 0.5).with_threshold(2.0).validate(),
            Err(ConfigError::InvalidThreshold(2.0))
        );
    }

    #[test]
    fn test_parse_kind_codes() {
        assert_eq!(parse_simulation("abm").unwrap(), SimulationKind::Agent);
        assert_eq!(parse_interaction("hord").unwrap(), InteractionKind::HigherOrder);
        assert_eq!(
            parse_interaction("triad"),
            Err(ConfigError::UnsupportedInteraction("triad".into()))
        );
        assert_eq!(
            parse_simulation("gpu"),
            Err(ConfigError::UnsupportedSimulation("gpu".into()))
        );
    }

    #[test]
    fn test_default_tuning() {
        let tuning = Tuning::default();
        assert_eq!(tuning.simulation.threshold, 0.5);
        assert_eq!(tuning.network.ws_k, 5);
        assert_eq!(tuning.network.er_p, 0.1);
    }

    #[test]
    fn test_partial_tuning_file() {
        let tuning = Tuning::from_toml(
            r#"
            [network]
            er_p = 0.25
            ba_m = 3
            "#,
        )
        .unwrap();
        assert_eq!(tuning.network.er_p, 0.25);
        assert_eq!(tuning.network.ba_m, 3);
        assert_eq!(tuning.network.ws_p, 0.4);
        assert_eq!(tuning.simulation.seed, DEFAULT_SEED);
    }

    #[test]
    fn test_tuning_round_trips_through_toml() {
        let mut tuning = Tuning::default();
        tuning.simulation.threshold = 0.6;
        let text = tuning.to_toml().unwrap();
        assert_eq!(Tuning::from_toml(&text).unwrap(), tuning);
    }

    #[test]
    fn test_missing_tuning_file_uses_defaults() {
        let tuning = Tuning::load_or_default("does/not/exist/voter.toml").unwrap();
        assert_eq!(tuning, Tuning::default());
        assert!(matches!(
            Tuning::load("does/not/exist/voter.toml"),
            Err(ConfigError::TuningIo(_))
        ));
    }

    #[test]
    fn test_malformed_tuning_file() {
        assert!(matches!(
            Tuning::from_toml("[network]\ner_p = \"high\""),
            Err(ConfigError::TuningParse(_))
        ));
    }
}
