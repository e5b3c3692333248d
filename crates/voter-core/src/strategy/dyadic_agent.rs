//! Dyadic Agent Strategy
//!
//! The dyadic majority rule with one entity per voter. Each voter stages its
//! decision while every neighbor still shows its committed opinion; the
//! whole population then applies at once.

use super::{GroupInfluence, UpdateStrategy};
use crate::model::{mean_opinion, spawn_agents, ModelCore, Opinion, VoterAgent};

#[derive(Debug, Clone)]
pub struct DyadicAgent {
    agents: Vec<VoterAgent>,
}

impl DyadicAgent {
    pub fn new(initial: &[Opinion]) -> Self {
        Self {
            agents: spawn_agents(initial),
        }
    }

    pub fn agents(&self) -> &[VoterAgent] {
        &self.agents
    }
}

impl UpdateStrategy for DyadicAgent {
    fn step(&mut self, core: &mut ModelCore) {
        let decisions: Vec<GroupInfluence> = (0..self.agents.len())
            .map(|agent| self.compute_influence(core, agent))
            .collect();

        for (voter, group) in self.agents.iter_mut().zip(decisions) {
            if group.is_isolated() {
                voter.stage(voter.opinion, 0.0);
            } else {
                voter.stage(core.adopt(group.value), group.value);
            }
        }

        for voter in &mut self.agents {
            voter.apply();
        }
    }

    fn compute_influence(&self, core: &mut ModelCore, agent: usize) -> GroupInfluence {
        let neighbors = core.neighbors(agent);
        if neighbors.is_empty() {
            return GroupInfluence::isolated();
        }

        let value = mean_opinion(
            neighbors
                .iter()
                .filter_map(|&j| self.agents.get(j).map(|voter| voter.opinion)),
        );
        GroupInfluence {
            value,
            adopters: vec![agent],
        }
    }

    fn opinion(&self, agent: usize) -> Option<Opinion> {
        self.agents.get(agent).map(|voter| voter.opinion)
    }

    fn influence(&self, agent: usize) -> Option<f64> {
        self.agents.get(agent).map(|voter| voter.influence)
    }
}
