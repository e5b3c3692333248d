//! Model Core
//!
//! State shared by every update strategy: configuration, topology, the
//! index map, the run's seeded generator and the step counter.

use petgraph::graph::NodeIndex;
use rand::rngs::SmallRng;
use rand::seq::index;
use rand::SeedableRng;

use super::index::NodeIndexMap;
use super::state::Opinion;
use crate::config::SimulationConfig;
use crate::error::{ConfigError, VoterError};
use crate::network::{Network, Topology};

pub struct ModelCore {
    config: SimulationConfig,
    network: Network,
    index: NodeIndexMap<NodeIndex>,
    rng: SmallRng,
    pub(crate) stepno: u64,
    pub(crate) running: bool,
}

impl ModelCore {
    /// Validates `config` against `network` and seeds the run's generator.
    pub fn new(config: SimulationConfig, network: Network) -> Result<Self, ConfigError> {
        config.validate()?;
        if network.node_count() != config.n {
            return Err(ConfigError::PopulationMismatch {
                expected: config.n,
                actual: network.node_count(),
            });
        }

        let index = NodeIndexMap::build(&network);
        let rng = SmallRng::seed_from_u64(config.seed);
        Ok(Self {
            config,
            network,
            index,
            rng,
            stepno: 0,
            running: true,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn population(&self) -> usize {
        self.config.n
    }

    pub fn stepno(&self) -> u64 {
        self.stepno
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn index_map(&self) -> &NodeIndexMap<NodeIndex> {
        &self.index
    }

    pub fn check_agent(&self, agent: usize) -> Result<(), VoterError> {
        if agent < self.config.n {
            Ok(())
        } else {
            Err(VoterError::UnknownAgent {
                index: agent,
                population: self.config.n,
            })
        }
    }

    /// Neighbor indices of `agent`, empty when it has none or is unknown.
    pub fn neighbors(&self, agent: usize) -> Vec<usize> {
        let Some(node) = self.index.node(agent) else {
            return Vec::new();
        };
        self.network
            .neighbors(node)
            .into_iter()
            .filter_map(|neighbor| self.index.index(neighbor))
            .collect()
    }

    /// Opinion a group with influence `f` adopts.
    pub fn adopt(&self, influence: f64) -> Opinion {
        Opinion::from_influence(influence, self.config.threshold)
    }

    /// Initial opinions: `ceil(N · p0)` agents drawn without replacement hold `Yes`.
    pub(crate) fn draw_initial_opinions(&mut self) -> Vec<Opinion> {
        let n = self.config.n;
        let yes = index::sample(&mut self.rng, n, self.config.initial_yes_count());
        let mut opinions = vec![Opinion::No; n];
        for agent in yes.iter() {
            opinions[agent] = Opinion::Yes;
        }
        opinions
    }

    /// Centroids for one higher-order step: `ceil(N / k)` distinct agents,
    /// in the order they were drawn.
    pub(crate) fn sample_centroids(&mut self) -> Vec<usize> {
        let n = self.config.n;
        let amount = n.div_ceil(self.config.interactants).min(n);
        index::sample(&mut self.rng, n, amount).into_vec()
    }

    /// Interaction group anchored at `centroid`: its neighbors plus itself,
    /// subsampled to `k` members when larger.
    pub(crate) fn sample_group(&mut self, centroid: usize) -> Vec<usize> {
        let mut partition = self.neighbors(centroid);
        partition.push(centroid);

        let k = self.config.interactants;
        if partition.len() > k {
            index::sample(&mut self.rng, partition.len(), k)
                .iter()
                .map(|position| partition[position])
                .collect()
        } else {
            partition
        }
    }
}
