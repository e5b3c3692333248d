//! Voter model simulation engine.
//!
//! Builds network ensembles, runs one of four update strategies on each
//! member and streams per-step records into a persistence sink.

pub mod config;
pub mod error;
pub mod model;
pub mod network;
pub mod output;
pub mod runner;
pub mod strategy;

// Re-export configuration types
pub use config::{SimulationConfig, Tuning};

// Re-export error types
pub use error::{ConfigError, NetworkError, PersistenceError, VoterError};

// Re-export model types
pub use model::{Opinion, RunSummary, VoterModel};

// Re-export network types
pub use network::{Network, NetworkEnsembleFactory, NetworkParams, Topology};

// Re-export output types
pub use output::{JsonlSink, MemorySink, PersistenceSink};

// Re-export runner types
pub use runner::{
    run_experiment, run_experiment_to_file, EnsembleOutcome, EnsemblePlan, EnsembleReport,
    Experiment, ModelRunner,
};

pub use strategy::{Strategy, UpdateStrategy};

pub use voter_events::{InteractionKind, NetworkKind, SimulationKind};
