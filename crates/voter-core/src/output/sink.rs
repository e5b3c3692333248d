//! Persistence Sink
//!
//! The interface a run writes through. Per step a model calls zero or more
//! `insert_*` methods; the runner calls `checkpoint` once per ensemble
//! member and the owner calls `close` when the experiment is over.

use voter_events::{AgentRecord, OutputRecord, SimulationRecord, StepRecord};

use crate::error::PersistenceError;

pub trait PersistenceSink {
    fn insert_simulation_record(
        &mut self,
        _record: &SimulationRecord,
    ) -> Result<(), PersistenceError> {
        Ok(())
    }

    fn insert_step_record(&mut self, record: &StepRecord) -> Result<(), PersistenceError>;

    fn insert_agent_record(&mut self, _record: &AgentRecord) -> Result<(), PersistenceError> {
        Ok(())
    }

    /// Commit boundary: everything inserted so far must be durable.
    fn checkpoint(&mut self) -> Result<(), PersistenceError>;

    fn close(&mut self) -> Result<(), PersistenceError>;
}

/// Sink that keeps every record in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Vec<OutputRecord>,
    checkpoints: usize,
    closed: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[OutputRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<OutputRecord> {
        self.records
    }

    pub fn simulation_records(&self) -> impl Iterator<Item = &SimulationRecord> {
        self.records.iter().filter_map(|record| match record {
            OutputRecord::Simulation(r) => Some(r),
            _ => None,
        })
    }

    pub fn step_records(&self) -> impl Iterator<Item = &StepRecord> {
        self.records.iter().filter_map(|record| match record {
            OutputRecord::Step(r) => Some(r),
            _ => None,
        })
    }

    pub fn agent_records(&self) -> impl Iterator<Item = &AgentRecord> {
        self.records.iter().filter_map(|record| match record {
            OutputRecord::Agent(r) => Some(r),
            _ => None,
        })
    }

    /// Number of checkpoints seen
    pub fn checkpoints(&self) -> usize {
        self.checkpoints
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn push(&mut self, record: OutputRecord) -> Result<(), PersistenceError> {
        if self.closed {
            return Err(PersistenceError::Closed);
        }
        self.records.push(record);
        Ok(())
    }
}

impl PersistenceSink for MemorySink {
    fn insert_simulation_record(
        &mut self,
        record: &SimulationRecord,
    ) -> Result<(), PersistenceError> {
        self.push(record.clone().into())
    }

    fn insert_step_record(&mut self, record: &StepRecord) -> Result<(), PersistenceError> {
        self.push(record.clone().into())
    }

    fn insert_agent_record(&mut self, record: &AgentRecord) -> Result<(), PersistenceError> {
        self.push(record.clone().into())
    }

    fn checkpoint(&mut self) -> Result<(), PersistenceError> {
        if self.closed {
            return Err(PersistenceError::Closed);
        }
        self.checkpoints += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), PersistenceError> {
        self.closed = true;
        Ok(())
    }
}
