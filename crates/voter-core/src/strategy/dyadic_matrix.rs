//! Dyadic Matrix Strategy
//!
//! Synchronous neighbor majority over dense state vectors. Every agent is
//! recomputed each step from the previous vectors, then the vectors are
//! replaced wholesale.

use super::{GroupInfluence, UpdateStrategy};
use crate::model::{mean_opinion, AgentStates, ModelCore, Opinion};

#[derive(Debug, Clone)]
pub struct DyadicMatrix {
    states: AgentStates,
}

impl DyadicMatrix {
    pub fn new(initial: &[Opinion]) -> Self {
        Self {
            states: AgentStates::new(initial),
        }
    }
}

impl UpdateStrategy for DyadicMatrix {
    fn step(&mut self, core: &mut ModelCore) {
        let mut next = self.states.clone();

        for agent in 0..self.states.len() {
            let group = self.compute_influence(core, agent);
            if group.is_isolated() {
                // Isolated agents keep their opinion
                let current = self.states.opinion(agent).unwrap_or_default();
                next.set(agent, current, 0.0);
            } else {
                next.set(agent, core.adopt(group.value), group.value);
            }
        }

        self.states = next;
    }

    /// Mean opinion of `agent`'s neighbors.
    fn compute_influence(&self, core: &mut ModelCore, agent: usize) -> GroupInfluence {
        let neighbors = core.neighbors(agent);
        if neighbors.is_empty() {
            return GroupInfluence::isolated();
        }

        let value = mean_opinion(neighbors.iter().filter_map(|&j| self.states.opinion(j)));
        GroupInfluence {
            value,
            adopters: vec![agent],
        }
    }

    fn opinion(&self, agent: usize) -> Option<Opinion> {
        self.states.opinion(agent)
    }

    fn influence(&self, agent: usize) -> Option<f64> {
        self.states.influence(agent)
    }
}
