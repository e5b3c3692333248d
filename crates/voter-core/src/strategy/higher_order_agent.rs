//! Higher-Order Agent Strategy
//!
//! Group majority with one entity per voter. Sampled centroids run in draw
//! order; each stages its group's decision on every sampled interactant,
//! replacing any decision an earlier group staged. All staged decisions are
//! applied together before the step returns.

use super::{GroupInfluence, UpdateStrategy};
use crate::model::{mean_opinion, spawn_agents, ModelCore, Opinion, VoterAgent};

#[derive(Debug, Clone)]
pub struct HigherOrderAgent {
    agents: Vec<VoterAgent>,
}

impl HigherOrderAgent {
    pub fn new(initial: &[Opinion]) -> Self {
        Self {
            agents: spawn_agents(initial),
        }
    }

    pub fn agents(&self) -> &[VoterAgent] {
        &self.agents
    }
}

impl UpdateStrategy for HigherOrderAgent {
    fn step(&mut self, core: &mut ModelCore) {
        for centroid in core.sample_centroids() {
            let group = self.compute_influence(core, centroid);
            let opinion = core.adopt(group.value);
            for &member in &group.adopters {
                if let Some(voter) = self.agents.get_mut(member) {
                    voter.stage(opinion, group.value);
                }
            }
        }

        for voter in &mut self.agents {
            voter.apply();
        }
    }

    fn compute_influence(&self, core: &mut ModelCore, centroid: usize) -> GroupInfluence {
        let sample = core.sample_group(centroid);
        let value = mean_opinion(
            sample
                .iter()
                .filter_map(|&j| self.agents.get(j).map(|voter| voter.opinion)),
        );
        GroupInfluence {
            value,
            adopters: sample,
        }
    }

    fn opinion(&self, agent: usize) -> Option<Opinion> {
        self.agents.get(agent).map(|voter| voter.opinion)
    }

    fn influence(&self, agent: usize) -> Option<f64> {
        self.agents.get(agent).map(|voter| voter.influence)
    }
}
