//! Higher-Order Matrix Strategy
//!
//! Group majority over sampled partitions, with dense state vectors.
//!
//! Each step draws `ceil(N / k)` centroids. A centroid's partition is its
//! neighborhood plus itself, subsampled to `k` members; the whole sample
//! adopts the majority of its own committed opinions. Coverage is partial
//! within a step. Centroids are processed in draw order and a later group
//! overwrites an earlier one on shared members.

use super::{GroupInfluence, UpdateStrategy};
use crate::model::{mean_opinion, AgentStates, ModelCore, Opinion};

#[derive(Debug, Clone)]
pub struct HigherOrderMatrix {
    states: AgentStates,
}

impl HigherOrderMatrix {
    pub fn new(initial: &[Opinion]) -> Self {
        Self {
            states: AgentStates::new(initial),
        }
    }
}

impl UpdateStrategy for HigherOrderMatrix {
    fn step(&mut self, core: &mut ModelCore) {
        let centroids = core.sample_centroids();
        let mut next = self.states.clone();

        for centroid in centroids {
            let group = self.compute_influence(core, centroid);
            let opinion = core.adopt(group.value);
            for &member in &group.adopters {
                next.set(member, opinion, group.value);
            }
        }

        self.states = next;
    }

    /// Draws the group anchored at `centroid` and averages its opinions.
    fn compute_influence(&self, core: &mut ModelCore, centroid: usize) -> GroupInfluence {
        let sample = core.sample_group(centroid);
        let value = mean_opinion(sample.iter().filter_map(|&j| self.states.opinion(j)));
        GroupInfluence {
            value,
            adopters: sample,
        }
    }

    fn opinion(&self, agent: usize) -> Option<Opinion> {
        self.states.opinion(agent)
    }

    fn influence(&self, agent: usize) -> Option<f64> {
        self.states.influence(agent)
    }
}
