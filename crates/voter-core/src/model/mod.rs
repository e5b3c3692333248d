//! Voter Model
//!
//! One run of one strategy on one network: construction, state queries and
//! the step loop that feeds a persistence sink.

pub mod base;
pub mod index;
pub mod state;

pub use base::ModelCore;
pub use index::NodeIndexMap;
pub use state::{mean_opinion, spawn_agents, AgentStates, Opinion, VoterAgent};

use serde::Serialize;
use tracing::{debug, info};
use voter_events::{AgentRecord, StepRecord};

use crate::config::SimulationConfig;
use crate::error::{ConfigError, PersistenceError, Result};
use crate::network::Network;
use crate::output::PersistenceSink;
use crate::strategy::{Strategy, UpdateStrategy};

/// Final state of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub ensemble_id: usize,
    pub steps: u64,
    pub total_yes: usize,
    pub total_no: usize,
    pub avg_influence: f64,
}

pub struct VoterModel {
    core: ModelCore,
    strategy: Strategy,
}

impl VoterModel {
    /// Builds a model whose initial opinions are drawn from the configured fraction.
    pub fn new(config: SimulationConfig, network: Network) -> Result<Self, ConfigError> {
        let mut core = ModelCore::new(config, network)?;
        let initial = core.draw_initial_opinions();
        Ok(Self::assemble(core, &initial))
    }

    /// Builds a model with exactly the agents in `yes` starting at opinion 1.
    ///
    /// The configured initial fraction is ignored.
    pub fn with_initial_yes(
        config: SimulationConfig,
        network: Network,
        yes: &[usize],
    ) -> Result<Self, ConfigError> {
        let core = ModelCore::new(config, network)?;
        let mut initial = vec![Opinion::No; core.population()];
        for &agent in yes {
            match initial.get_mut(agent) {
                Some(opinion) if *opinion == Opinion::No => *opinion = Opinion::Yes,
                Some(_) => {
                    return Err(ConfigError::InvalidInitialSet(format!(
                        "agent {} listed twice",
                        agent
                    )))
                }
                None => {
                    return Err(ConfigError::InvalidInitialSet(format!(
                        "agent {} outside population of {}",
                        agent,
                        core.population()
                    )))
                }
            }
        }
        Ok(Self::assemble(core, &initial))
    }

    fn assemble(core: ModelCore, initial: &[Opinion]) -> Self {
        let config = core.config();
        let strategy = Strategy::new(config.simulation, config.interaction, initial);
        debug!(
            ensemble_id = config.ensemble_id,
            strategy = strategy.name(),
            n = config.n,
            "model constructed"
        );
        Self { core, strategy }
    }

    pub fn config(&self) -> &SimulationConfig {
        self.core.config()
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    pub fn population(&self) -> usize {
        self.core.population()
    }

    /// Number of steps applied so far.
    pub fn stepno(&self) -> u64 {
        self.core.stepno()
    }

    pub fn is_running(&self) -> bool {
        self.core.is_running()
    }

    pub fn get_neighbors(&self, agent: usize) -> Vec<usize> {
        self.core.neighbors(agent)
    }

    pub fn get_opinion(&self, agent: usize) -> Result<Opinion> {
        self.core.check_agent(agent)?;
        Ok(self.strategy.opinion(agent).unwrap_or_default())
    }

    pub fn get_f(&self, agent: usize) -> Result<f64> {
        self.core.check_agent(agent)?;
        Ok(self.strategy.influence(agent).unwrap_or_default())
    }

    pub fn count_opinion(&self, opinion: Opinion) -> usize {
        (0..self.population())
            .filter(|&agent| self.strategy.opinion(agent) == Some(opinion))
            .count()
    }

    pub fn average_influence(&self) -> f64 {
        let n = self.population();
        if n == 0 {
            return 0.0;
        }
        let total: f64 = (0..n).filter_map(|agent| self.strategy.influence(agent)).sum();
        total / n as f64
    }

    /// Applies one step. Returns `false`, without touching any state, once
    /// the step budget is spent.
    pub fn step(&mut self) -> bool {
        let max_steps = self.core.config().max_steps;
        if self.core.stepno >= max_steps {
            self.core.running = false;
            return false;
        }

        self.strategy.step(&mut self.core);
        self.core.stepno += 1;
        if self.core.stepno >= max_steps {
            self.core.running = false;
        }
        true
    }

    pub fn step_record(&self, step: u64) -> StepRecord {
        let config = self.core.config();
        StepRecord {
            experiment_id: config.experiment_id.clone(),
            ensemble_id: config.ensemble_id,
            step,
            total_yes: self.count_opinion(Opinion::Yes),
            total_no: self.count_opinion(Opinion::No),
            avg_influence: self.average_influence(),
        }
    }

    pub fn agent_records(&self, step: u64) -> Vec<AgentRecord> {
        let config = self.core.config();
        (0..self.population())
            .map(|agent| AgentRecord {
                experiment_id: config.experiment_id.clone(),
                ensemble_id: config.ensemble_id,
                step,
                agent_id: agent,
                opinion: self.strategy.opinion(agent).unwrap_or_default().value(),
                influence: self.strategy.influence(agent).unwrap_or_default(),
            })
            .collect()
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            ensemble_id: self.core.config().ensemble_id,
            steps: self.core.stepno(),
            total_yes: self.count_opinion(Opinion::Yes),
            total_no: self.count_opinion(Opinion::No),
            avg_influence: self.average_influence(),
        }
    }

    /// Runs the remaining step budget, writing one step record after each step.
    ///
    /// The record for step `s` describes the population after step `s` was
    /// applied. Agent records follow their step record when enabled.
    pub fn run(&mut self, sink: &mut dyn PersistenceSink) -> Result<RunSummary, PersistenceError> {
        let config = self.core.config();
        info!(
            experiment_id = %config.experiment_id,
            ensemble_id = config.ensemble_id,
            strategy = self.strategy.name(),
            max_steps = config.max_steps,
            "running model"
        );

        while self.core.stepno < self.core.config().max_steps {
            let step = self.core.stepno;
            self.step();

            let record = self.step_record(step);
            debug!(
                step,
                total_yes = record.total_yes,
                total_no = record.total_no,
                avg_influence = record.avg_influence,
                "step applied"
            );
            sink.insert_step_record(&record)?;

            if self.core.config().record_agents {
                for agent_record in self.agent_records(step) {
                    sink.insert_agent_record(&agent_record)?;
                }
            }
        }

        self.core.running = false;
        Ok(self.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VoterError;
    use crate::network::lattice;
    use crate::output::MemorySink;
    use voter_events::{InteractionKind, SimulationKind};

    fn cycle() -> Network {
        Network::from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0)])
    }

    fn dyadic(n: usize) -> SimulationConfig {
        SimulationConfig::new(SimulationKind::Matrix, InteractionKind::Dyadic, n)
    }

    #[test]
    fn test_initial_state() {
        let model = VoterModel::with_initial_yes(dyadic(4).with_max_steps(3), cycle(), &[0, 2])
            .unwrap();
        assert_eq!(model.count_opinion(Opinion::Yes), 2);
        assert_eq!(model.count_opinion(Opinion::No), 2);
        assert_eq!(model.average_influence(), 0.0);
        assert_eq!(model.get_opinion(0).unwrap(), Opinion::Yes);
        assert_eq!(model.get_opinion(1).unwrap(), Opinion::No);
        assert!(model.is_running());
        assert_eq!(model.stepno(), 0);
    }

    #[test]
    fn test_unknown_agent() {
        let model = VoterModel::new(dyadic(4), cycle()).unwrap();
        assert!(matches!(
            model.get_opinion(4),
            Err(VoterError::UnknownAgent { index: 4, population: 4 })
        ));
        assert!(matches!(model.get_f(9), Err(VoterError::UnknownAgent { .. })));
        assert!(model.get_neighbors(9).is_empty());
    }

    #[test]
    fn test_invalid_initial_set() {
        assert!(matches!(
            VoterModel::with_initial_yes(dyadic(4), cycle(), &[4]),
            Err(ConfigError::InvalidInitialSet(_))
        ));
        assert!(matches!(
            VoterModel::with_initial_yes(dyadic(4), cycle(), &[1, 1]),
            Err(ConfigError::InvalidInitialSet(_))
        ));
    }

    #[test]
    fn test_step_past_budget_is_noop() {
        let mut model =
            VoterModel::with_initial_yes(dyadic(4).with_max_steps(1), cycle(), &[0, 2]).unwrap();

        assert!(model.step());
        assert!(!model.is_running());
        let after_budget: Vec<_> = (0..4).map(|i| model.get_opinion(i).unwrap()).collect();

        assert!(!model.step());
        assert!(!model.is_running());
        assert_eq!(model.stepno(), 1);
        let unchanged: Vec<_> = (0..4).map(|i| model.get_opinion(i).unwrap()).collect();
        assert_eq!(after_budget, unchanged);
    }

    #[test]
    fn test_run_emits_one_record_per_step() {
        let mut model = VoterModel::new(dyadic(9).with_max_steps(5), lattice::complete(9)).unwrap();
        let mut sink = MemorySink::new();

        let summary = model.run(&mut sink).unwrap();
        let steps: Vec<u64> = sink.step_records().map(|r| r.step).collect();
        assert_eq!(steps, vec![0, 1, 2, 3, 4]);
        assert_eq!(summary.steps, 5);
        assert!(!model.is_running());
        assert_eq!(sink.agent_records().count(), 0);
    }

    #[test]
    fn test_zero_step_budget() {
        let mut model = VoterModel::new(dyadic(4).with_max_steps(0), cycle()).unwrap();
        let mut sink = MemorySink::new();

        model.run(&mut sink).unwrap();
        assert_eq!(sink.step_records().count(), 0);
        assert!(!model.is_running());
    }

    #[test]
    fn test_agent_records_follow_step_record() {
        let config = dyadic(4).with_max_steps(2).with_agent_records(true);
        let mut model = VoterModel::with_initial_yes(config, cycle(), &[0]).unwrap();
        let mut sink = MemorySink::new();

        model.run(&mut sink).unwrap();
        assert_eq!(sink.step_records().count(), 2);
        assert_eq!(sink.agent_records().count(), 8);

        let first_step: Vec<usize> = sink
            .agent_records()
            .filter(|r| r.step == 0)
            .map(|r| r.agent_id)
            .collect();
        assert_eq!(first_step, vec![0, 1, 2, 3]);
    }
}
