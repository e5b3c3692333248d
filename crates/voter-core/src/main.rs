//! Voter Model Simulation
//!
//! Runs one ensemble experiment and appends its records to a JSONL file.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

use voter_core::config::{parse_interaction, parse_simulation, DEFAULT_TUNING_PATH};
use voter_core::network::parse_kind;
use voter_core::{
    run_experiment_to_file, EnsembleOutcome, EnsembleReport, Experiment, Tuning, VoterError,
};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "voter_sim")]
#[command(about = "Binary-opinion voter model on network ensembles")]
struct Args {
    /// Simulation kind: matrix or abm
    #[arg(long, default_value = "matrix")]
    simulation: String,

    /// Interaction kind: dy (dyadic) or ho (higher-order)
    #[arg(long, default_value = "dy")]
    interaction: String,

    /// Network kind: l2dr, l2dt, l2dh, k_n, ws, pl, hc, er, ba
    #[arg(long, default_value = "k_n")]
    network: String,

    /// Group size for higher-order interaction
    #[arg(long, default_value_t = 2)]
    interactants: usize,

    /// Number of agents
    #[arg(short = 'n', long = "population", default_value_t = 100)]
    population: usize,

    /// Steps per ensemble member
    #[arg(long, default_value_t = 100)]
    max_steps: u64,

    /// Number of networks in the ensemble
    #[arg(long, default_value_t = 1)]
    ensemble_size: usize,

    /// Fraction of agents starting at opinion 1
    #[arg(long, default_value_t = 0.5)]
    initial_fraction: f64,

    /// Output JSONL file (appended to)
    #[arg(long, default_value = "output/voter.jsonl")]
    output: PathBuf,

    /// Random seed; overrides the tuning file
    #[arg(long)]
    seed: Option<u64>,

    /// Tuning file
    #[arg(long, default_value = DEFAULT_TUNING_PATH)]
    tuning: PathBuf,

    /// Write one record per agent per step
    #[arg(long)]
    record_agents: bool,
}

fn build_experiment(args: &Args, tuning: &Tuning) -> Result<Experiment, VoterError> {
    let simulation = parse_simulation(&args.simulation)?;
    let interaction = parse_interaction(&args.interaction)?;
    let network = parse_kind(&args.network)?;

    let experiment = Experiment::new(simulation, interaction, network, args.population)
        .with_interactants(args.interactants)
        .with_max_steps(args.max_steps)
        .with_ensemble_size(args.ensemble_size)
        .with_initial_fraction(args.initial_fraction)
        .with_threshold(tuning.simulation.threshold)
        .with_seed(args.seed.unwrap_or(tuning.simulation.seed))
        .with_agent_records(args.record_agents);
    experiment.validate()?;
    Ok(experiment)
}

fn print_report(report: &EnsembleReport) {
    println!();
    println!("Experiment {}", report.experiment_id);
    for run in &report.runs {
        println!(
            "  member {:>3}: {} steps, yes={} no={} avg_f={:.4}",
            run.ensemble_id, run.steps, run.total_yes, run.total_no, run.avg_influence
        );
    }
    match &report.outcome {
        EnsembleOutcome::Complete => println!("Ensemble complete"),
        EnsembleOutcome::Partial {
            failed_member,
            error,
        } => println!("Ensemble stopped at member {}: {}", failed_member, error),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let tuning = match Tuning::load_or_default(&args.tuning) {
        Ok(tuning) => tuning,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(1);
        }
    };

    let experiment = match build_experiment(&args, &tuning) {
        Ok(experiment) => experiment,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(1);
        }
    };

    println!("Voter Model Simulation");
    println!("======================");
    println!("Simulation: {}", experiment.simulation);
    println!("Interaction: {}", experiment.interaction);
    println!("Network: {}", experiment.network);
    println!("Population: {}", experiment.n);
    println!("Steps: {}", experiment.max_steps);
    println!("Ensemble size: {}", experiment.ensemble_size);
    println!("Seed: {}", experiment.seed);
    println!("Output: {}", args.output.display());

    let report = match run_experiment_to_file(&experiment, &tuning.network, &args.output) {
        Ok(report) => report,
        Err(VoterError::Persistence(e)) => {
            error!("Could not write {}: {}", args.output.display(), e);
            return ExitCode::from(2);
        }
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(1);
        }
    };

    print_report(&report);
    if report.is_complete() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    }
}
