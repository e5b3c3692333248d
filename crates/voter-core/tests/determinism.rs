//! Determinism verification tests
//!
//! The same seed must reproduce the same record stream, and the matrix and
//! agent renditions of an interaction rule must agree step for step.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use voter_core::{
    run_experiment, Experiment, InteractionKind, MemorySink, NetworkEnsembleFactory, NetworkKind,
    NetworkParams, SimulationConfig, SimulationKind, VoterModel,
};
use voter_events::StepRecord;

fn steps(experiment: &Experiment) -> Vec<StepRecord> {
    let mut sink = MemorySink::new();
    let report = run_experiment(experiment, &NetworkParams::default(), &mut sink).unwrap();
    assert!(report.is_complete());
    sink.step_records().cloned().collect()
}

fn experiment(
    simulation: SimulationKind,
    interaction: InteractionKind,
    network: NetworkKind,
    seed: u64,
) -> Experiment {
    Experiment::new(simulation, interaction, network, 64)
        .with_interactants(4)
        .with_max_steps(20)
        .with_ensemble_size(3)
        .with_seed(seed)
        .with_experiment_id("determinism")
}

/// Test that two models with the same seed agree on every agent after every step
#[test]
fn test_model_replays_agent_states() {
    let mut rng = SmallRng::seed_from_u64(21);
    let network = NetworkEnsembleFactory::default()
        .make_network(49, NetworkKind::WattsStrogatz, &mut rng)
        .unwrap();

    for simulation in SimulationKind::all() {
        let config = SimulationConfig::new(*simulation, InteractionKind::HigherOrder, 49)
            .with_interactants(3)
            .with_max_steps(12)
            .with_seed(8);
        let mut first = VoterModel::new(config.clone(), network.clone()).unwrap();
        let mut second = VoterModel::new(config, network.clone()).unwrap();

        loop {
            for agent in 0..49 {
                assert_eq!(first.get_opinion(agent).unwrap(), second.get_opinion(agent).unwrap());
                assert_eq!(first.get_f(agent).unwrap(), second.get_f(agent).unwrap());
            }
            let advanced = first.step();
            assert_eq!(advanced, second.step());
            if !advanced {
                break;
            }
        }
        assert_eq!(first.stepno(), 12);
    }
}

/// Test that a seeded experiment replays exactly
#[test]
fn test_experiment_replays_with_same_seed() {
    for network in [NetworkKind::WattsStrogatz, NetworkKind::ErdosRenyi] {
        for interaction in [InteractionKind::Dyadic, InteractionKind::HigherOrder] {
            let exp = experiment(SimulationKind::Agent, interaction, network, 7);
            assert_eq!(steps(&exp), steps(&exp), "{} {} should replay", network, interaction);
        }
    }
}

/// Test that different seeds lead to different trajectories
#[test]
fn test_different_seeds_diverge() {
    let first = experiment(
        SimulationKind::Matrix,
        InteractionKind::HigherOrder,
        NetworkKind::WattsStrogatz,
        1,
    );
    let second = experiment(
        SimulationKind::Matrix,
        InteractionKind::HigherOrder,
        NetworkKind::WattsStrogatz,
        2,
    );
    assert_ne!(steps(&first), steps(&second));
}

/// Test that dyadic matrix and agent strategies agree exactly
#[test]
fn test_dyadic_matrix_matches_agent() {
    for network in [NetworkKind::Lattice2dRectangle, NetworkKind::BarabasiAlbert] {
        let matrix = experiment(SimulationKind::Matrix, InteractionKind::Dyadic, network, 11);
        let agent = experiment(SimulationKind::Agent, InteractionKind::Dyadic, network, 11);
        assert_eq!(steps(&matrix), steps(&agent), "dyadic on {}", network);
    }
}

/// Test that higher-order matrix and agent strategies agree exactly
#[test]
fn test_higher_order_matrix_matches_agent() {
    for network in [NetworkKind::Complete, NetworkKind::PowerLaw] {
        let matrix = experiment(SimulationKind::Matrix, InteractionKind::HigherOrder, network, 5);
        let agent = experiment(SimulationKind::Agent, InteractionKind::HigherOrder, network, 5);
        assert_eq!(steps(&matrix), steps(&agent), "higher-order on {}", network);
    }
}
