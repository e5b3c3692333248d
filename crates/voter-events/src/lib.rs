//! Shared kinds and output records for the voter simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! Persistence sinks and analysis tools depend on it without pulling in the engine.

pub mod kinds;
pub mod record;

// Re-export kind types
pub use kinds::{InteractionKind, NetworkKind, ParseKindError, SimulationKind};

// Re-export record types
pub use record::{AgentRecord, OutputRecord, SimulationRecord, StepRecord};
