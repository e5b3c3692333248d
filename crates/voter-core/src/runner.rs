//! Experiment Runner
//!
//! Drives one model per ensemble member through a shared persistence sink.
//!
//! An experiment seed feeds a master generator. The master first builds the
//! network ensemble, then draws one seed per member in member order, so an
//! experiment is reproducible from its seed alone.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};
use uuid::Uuid;
use voter_events::{InteractionKind, NetworkKind, SimulationKind, SimulationRecord};

use crate::config::{SimulationConfig, DEFAULT_SEED, DEFAULT_THRESHOLD};
use crate::error::{ConfigError, Result, VoterError};
use crate::model::{RunSummary, VoterModel};
use crate::network::{Network, NetworkEnsembleFactory, NetworkParams};
use crate::output::{JsonlSink, PersistenceSink};

/// Runs single models under a fixed configuration.
#[derive(Debug, Clone)]
pub struct ModelRunner {
    config: SimulationConfig,
}

impl ModelRunner {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Builds a model on `network`, runs its full step budget and checkpoints
    /// the sink once.
    pub fn run(&self, network: Network, sink: &mut dyn PersistenceSink) -> Result<RunSummary> {
        let mut model = VoterModel::new(self.config.clone(), network)?;
        let summary = model.run(sink)?;
        sink.checkpoint()?;
        Ok(summary)
    }
}

/// Parameters of a whole ensemble experiment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Experiment {
    pub simulation: SimulationKind,
    pub interaction: InteractionKind,
    pub network: NetworkKind,
    pub interactants: usize,
    pub n: usize,
    pub max_steps: u64,
    pub ensemble_size: usize,
    pub initial_fraction: f64,
    pub threshold: f64,
    pub seed: u64,
    pub record_agents: bool,
    /// Fixed id; a random one is generated when unset
    pub experiment_id: Option<String>,
}

impl Experiment {
    pub fn new(
        simulation: SimulationKind,
        interaction: InteractionKind,
        network: NetworkKind,
        n: usize,
    ) -> Self {
        Self {
            simulation,
            interaction,
            network,
            interactants: 2,
            n,
            max_steps: 100,
            ensemble_size: 1,
            initial_fraction: 0.5,
            threshold: DEFAULT_THRESHOLD,
            seed: DEFAULT_SEED,
            record_agents: false,
            experiment_id: None,
        }
    }

    pub fn with_interactants(mut self, interactants: usize) -> Self {
        self.interactants = interactants;
        self
    }

    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_ensemble_size(mut self, ensemble_size: usize) -> Self {
        self.ensemble_size = ensemble_size;
        self
    }

    pub fn with_initial_fraction(mut self, fraction: f64) -> Self {
        self.initial_fraction = fraction;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_agent_records(mut self, enabled: bool) -> Self {
        self.record_agents = enabled;
        self
    }

    pub fn with_experiment_id(mut self, id: impl Into<String>) -> Self {
        self.experiment_id = Some(id.into());
        self
    }

    /// Checks the experiment before any network is generated.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ensemble_size == 0 {
            return Err(ConfigError::EmptyEnsemble);
        }
        self.member_config("", 0, self.seed).validate()
    }

    /// Configuration of one ensemble member.
    pub fn member_config(&self, experiment_id: &str, ensemble_id: usize, seed: u64) -> SimulationConfig {
        SimulationConfig::new(self.simulation, self.interaction, self.n)
            .with_member(experiment_id, ensemble_id)
            .with_interactants(self.interactants)
            .with_initial_fraction(self.initial_fraction)
            .with_max_steps(self.max_steps)
            .with_threshold(self.threshold)
            .with_seed(seed)
            .with_agent_records(self.record_agents)
    }

    pub fn simulation_record(&self, experiment_id: &str) -> SimulationRecord {
        SimulationRecord {
            experiment_id: experiment_id.to_string(),
            ensemble_size: self.ensemble_size,
            n: self.n,
            simulation: self.simulation,
            interaction: self.interaction,
            interactants: self.interactants,
            initial_fraction: self.initial_fraction,
            network: self.network,
            max_steps: self.max_steps,
            seed: self.seed,
        }
    }
}

/// How far an ensemble got.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EnsembleOutcome {
    Complete,
    /// Members before `failed_member` were written and checkpointed.
    Partial { failed_member: usize, error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnsembleReport {
    pub experiment_id: String,
    pub runs: Vec<RunSummary>,
    pub outcome: EnsembleOutcome,
}

impl EnsembleReport {
    pub fn is_complete(&self) -> bool {
        self.outcome == EnsembleOutcome::Complete
    }
}

/// A validated experiment with its network ensemble already generated.
///
/// Planning never touches a sink, so configuration and network errors
/// surface before any output exists.
#[derive(Debug)]
pub struct EnsemblePlan {
    experiment: Experiment,
    experiment_id: String,
    ensemble: BTreeMap<usize, Network>,
    master: SmallRng,
}

impl EnsemblePlan {
    pub fn new(experiment: &Experiment, params: &NetworkParams) -> Result<Self> {
        experiment.validate()?;

        let mut master = SmallRng::seed_from_u64(experiment.seed);
        let factory = NetworkEnsembleFactory::new(params.clone());
        let ensemble = factory.make_ensemble(
            experiment.n,
            experiment.ensemble_size,
            experiment.network,
            &mut master,
        )?;

        let experiment_id = experiment
            .experiment_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Ok(Self {
            experiment: experiment.clone(),
            experiment_id,
            ensemble,
            master,
        })
    }

    pub fn experiment_id(&self) -> &str {
        &self.experiment_id
    }

    pub fn members(&self) -> usize {
        self.ensemble.len()
    }

    /// Runs every member in ascending id order.
    ///
    /// A persistence failure stops the ensemble and is reported as
    /// [`EnsembleOutcome::Partial`].
    pub fn run(self, sink: &mut dyn PersistenceSink) -> Result<EnsembleReport> {
        let Self {
            experiment,
            experiment_id,
            ensemble,
            mut master,
        } = self;

        info!(
            experiment_id = %experiment_id,
            simulation = %experiment.simulation,
            interaction = %experiment.interaction,
            network = %experiment.network,
            n = experiment.n,
            members = experiment.ensemble_size,
            "starting experiment"
        );

        let mut runs = Vec::with_capacity(ensemble.len());
        if let Err(e) = sink.insert_simulation_record(&experiment.simulation_record(&experiment_id)) {
            warn!(experiment_id = %experiment_id, "could not write simulation record: {}", e);
            return Ok(EnsembleReport {
                experiment_id,
                runs,
                outcome: EnsembleOutcome::Partial {
                    failed_member: 0,
                    error: e.to_string(),
                },
            });
        }

        for (member, network) in ensemble {
            let seed: u64 = master.gen();
            let runner = ModelRunner::new(experiment.member_config(&experiment_id, member, seed));

            match runner.run(network, sink) {
                Ok(summary) => runs.push(summary),
                Err(VoterError::Persistence(e)) => {
                    warn!(
                        experiment_id = %experiment_id,
                        member,
                        "ensemble stopped early: {}",
                        e
                    );
                    return Ok(EnsembleReport {
                        experiment_id,
                        runs,
                        outcome: EnsembleOutcome::Partial {
                            failed_member: member,
                            error: e.to_string(),
                        },
                    });
                }
                Err(e) => return Err(e),
            }
        }

        info!(experiment_id = %experiment_id, members = runs.len(), "experiment complete");
        Ok(EnsembleReport {
            experiment_id,
            runs,
            outcome: EnsembleOutcome::Complete,
        })
    }
}

/// Plans `experiment` and runs every member into `sink`.
pub fn run_experiment(
    experiment: &Experiment,
    params: &NetworkParams,
    sink: &mut dyn PersistenceSink,
) -> Result<EnsembleReport> {
    EnsemblePlan::new(experiment, params)?.run(sink)
}

/// Plans `experiment`, then appends its records to the JSONL file at `path`.
///
/// The file and its directories are created only once planning succeeded.
pub fn run_experiment_to_file(
    experiment: &Experiment,
    params: &NetworkParams,
    path: impl AsRef<Path>,
) -> Result<EnsembleReport> {
    let plan = EnsemblePlan::new(experiment, params)?;
    let mut sink = JsonlSink::open(path)?;
    let report = plan.run(&mut sink)?;
    sink.close()?;
    Ok(report)
}
