//! Output Records
//!
//! Rows written by a run: one simulation record per experiment, one step
//! record per simulation step and, optionally, one agent record per agent
//! per step. Records travel as JSON lines tagged by `record`.

use serde::{Deserialize, Serialize};

use crate::{InteractionKind, NetworkKind, SimulationKind};

/// Parameters of an experiment, written once before its ensemble runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRecord {
    pub experiment_id: String,
    pub ensemble_size: usize,
    pub n: usize,
    pub simulation: SimulationKind,
    pub interaction: InteractionKind,
    pub interactants: usize,
    pub initial_fraction: f64,
    pub network: NetworkKind,
    pub max_steps: u64,
    pub seed: u64,
}

/// Population summary after one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub experiment_id: String,
    pub ensemble_id: usize,
    pub step: u64,
    pub total_yes: usize,
    pub total_no: usize,
    pub avg_influence: f64,
}

impl StepRecord {
    /// Population size covered by this record.
    pub fn population(&self) -> usize {
        self.total_yes + self.total_no
    }

    /// Fraction of agents holding opinion 1.
    pub fn yes_fraction(&self) -> f64 {
        match self.population() {
            0 => 0.0,
            n => self.total_yes as f64 / n as f64,
        }
    }
}

/// State of a single agent after one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub experiment_id: String,
    pub ensemble_id: usize,
    pub step: u64,
    pub agent_id: usize,
    pub opinion: u8,
    pub influence: f64,
}

/// Any record, as written to a JSONL stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum OutputRecord {
    Simulation(SimulationRecord),
    Step(StepRecord),
    Agent(AgentRecord),
}

impl OutputRecord {
    /// Serializes the record to a JSON line (for JSONL format).
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes a record from a JSON line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    pub fn experiment_id(&self) -> &str {
        match self {
            OutputRecord::Simulation(r) => &r.experiment_id,
            OutputRecord::Step(r) => &r.experiment_id,
            OutputRecord::Agent(r) => &r.experiment_id,
        }
    }
}

impl From<SimulationRecord> for OutputRecord {
    fn from(record: SimulationRecord) -> Self {
        OutputRecord::Simulation(record)
    }
}

impl From<StepRecord> for OutputRecord {
    fn from(record: StepRecord) -> Self {
        OutputRecord::Step(record)
    }
}

impl From<AgentRecord> for OutputRecord {
    fn from(record: AgentRecord) -> Self {
        OutputRecord::Agent(record)
    }
}
