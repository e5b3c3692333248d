//! Error Types
//!
//! Configuration failures surface at construction before anything is written.
//! Persistence failures abort the ensemble member that hit them.

use thiserror::Error;
use voter_events::NetworkKind;

/// Failures while generating a network.
#[derive(Debug, Error, PartialEq)]
pub enum NetworkError {
    #[error("invalid size {n} for {kind} network: {reason}")]
    InvalidSize {
        kind: NetworkKind,
        n: usize,
        reason: String,
    },

    #[error("unsupported network kind: '{0}'")]
    UnsupportedKind(String),

    #[error("invalid {kind} parameter {name} = {value}")]
    InvalidParameter {
        kind: NetworkKind,
        name: &'static str,
        value: f64,
    },
}

/// Invalid run parameters, detected before a model is built.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("unsupported interaction kind: '{0}'")]
    UnsupportedInteraction(String),

    #[error("unsupported simulation kind: '{0}'")]
    UnsupportedSimulation(String),

    #[error("interactant count must be positive, got {0}")]
    InvalidInteractants(usize),

    #[error("initial fraction must lie in [0, 1], got {0}")]
    InvalidInitialFraction(f64),

    #[error("influence threshold must lie in [0, 1], got {0}")]
    InvalidThreshold(f64),

    #[error("population must be positive")]
    EmptyPopulation,

    #[error("ensemble size must be positive")]
    EmptyEnsemble,

    #[error("network has {actual} nodes but the population is {expected}")]
    PopulationMismatch { expected: usize, actual: usize },

    #[error("invalid initial opinion set: {0}")]
    InvalidInitialSet(String),

    #[error("could not read tuning file: {0}")]
    TuningIo(String),

    #[error("could not parse tuning file: {0}")]
    TuningParse(String),
}

/// Failures reported by a persistence sink.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("sink I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("record serialization failure: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("sink is closed")]
    Closed,
}

/// Top-level error for model and runner operations.
#[derive(Debug, Error)]
pub enum VoterError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("unknown agent {index}, population is {population}")]
    UnknownAgent { index: usize, population: usize },

    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

impl From<NetworkError> for VoterError {
    fn from(err: NetworkError) -> Self {
        VoterError::Config(ConfigError::Network(err))
    }
}

pub type Result<T, E = VoterError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_error_converts_to_voter_error() {
        let err: VoterError = NetworkError::UnsupportedKind("torus".into()).into();
        assert!(matches!(
            err,
            VoterError::Config(ConfigError::Network(NetworkError::UnsupportedKind(_)))
        ));
        assert_eq!(
            err.to_string(),
            "configuration error: unsupported network kind: 'torus'"
        );
    }

    #[test]
    fn test_invalid_size_message() {
        let err = NetworkError::InvalidSize {
            kind: NetworkKind::Hypercube,
            n: 12,
            reason: "not a power of two".into(),
        };
        assert_eq!(err.to_string(), "invalid size 12 for hc network: not a power of two");
    }
}
