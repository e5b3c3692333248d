//! Output System
//!
//! Persistence sinks that receive simulation, step and agent records.

pub mod jsonl;
pub mod sink;

pub use jsonl::JsonlSink;
pub use sink::{MemorySink, PersistenceSink};
