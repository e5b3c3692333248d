//! Agent State
//!
//! Opinions and influence values, in the two physical layouts the update
//! strategies use: dense per-index vectors and one entity per agent.

use serde::{Deserialize, Serialize};

/// Binary opinion held by an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Opinion {
    #[default]
    No,
    Yes,
}

impl Opinion {
    pub fn value(self) -> u8 {
        match self {
            Opinion::No => 0,
            Opinion::Yes => 1,
        }
    }

    /// Majority rule: `Yes` only when `influence` is strictly above `threshold`.
    pub fn from_influence(influence: f64, threshold: f64) -> Self {
        if influence > threshold {
            Opinion::Yes
        } else {
            Opinion::No
        }
    }
}

impl From<Opinion> for u8 {
    fn from(opinion: Opinion) -> Self {
        opinion.value()
    }
}

impl TryFrom<u8> for Opinion {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Opinion::No),
            1 => Ok(Opinion::Yes),
            other => Err(format!("opinion must be 0 or 1, got {}", other)),
        }
    }
}

/// Fraction of `Yes` among `opinions`; 0 for an empty group.
pub fn mean_opinion(opinions: impl IntoIterator<Item = Opinion>) -> f64 {
    let (yes, total) = opinions
        .into_iter()
        .fold((0usize, 0usize), |(yes, total), opinion| {
            (yes + opinion.value() as usize, total + 1)
        });
    if total == 0 {
        0.0
    } else {
        yes as f64 / total as f64
    }
}

/// Dense state vectors indexed by agent.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentStates {
    opinions: Vec<Opinion>,
    influence: Vec<f64>,
}

impl AgentStates {
    /// Starts every agent at its initial opinion with influence 0.
    pub fn new(initial: &[Opinion]) -> Self {
        Self {
            opinions: initial.to_vec(),
            influence: vec![0.0; initial.len()],
        }
    }

    pub fn len(&self) -> usize {
        self.opinions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.opinions.is_empty()
    }

    pub fn opinion(&self, agent: usize) -> Option<Opinion> {
        self.opinions.get(agent).copied()
    }

    pub fn influence(&self, agent: usize) -> Option<f64> {
        self.influence.get(agent).copied()
    }

    pub fn set(&mut self, agent: usize, opinion: Opinion, influence: f64) {
        if let (Some(o), Some(f)) = (self.opinions.get_mut(agent), self.influence.get_mut(agent)) {
            *o = opinion;
            *f = influence;
        }
    }
}

/// A single voter entity for the agent-based strategies.
///
/// A staged decision sits in `pending` until [`VoterAgent::apply`] commits
/// it, so neighbors keep reading the previous opinion for the whole step.
#[derive(Debug, Clone, PartialEq)]
pub struct VoterAgent {
    pub id: usize,
    pub opinion: Opinion,
    pub influence: f64,
    pending: Option<(Opinion, f64)>,
}

impl VoterAgent {
    pub fn new(id: usize, opinion: Opinion) -> Self {
        Self {
            id,
            opinion,
            influence: 0.0,
            pending: None,
        }
    }

    /// Stages a decision; a later stage in the same step replaces it.
    pub fn stage(&mut self, opinion: Opinion, influence: f64) {
        self.pending = Some((opinion, influence));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Commits the staged decision, if any. Returns whether the opinion changed.
    pub fn apply(&mut self) -> bool {
        match self.pending.take() {
            Some((opinion, influence)) => {
                let changed = opinion != self.opinion;
                self.opinion = opinion;
                self.influence = influence;
                changed
            }
            None => false,
        }
    }
}

/// Builds one agent per initial opinion, ids matching indices.
pub fn spawn_agents(initial: &[Opinion]) -> Vec<VoterAgent> {
    initial
        .iter()
        .enumerate()
        .map(|(id, &opinion)| VoterAgent::new(id, opinion))
        .collect()
}
