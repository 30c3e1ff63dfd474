//! Society Simulation
//!
//! Runs the turn economy with the built-in weighted proposer standing in for
//! an LLM-backed decision maker.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use society_core::config::{default_config_toml, SimulationConfig, DEFAULT_CONFIG_PATH};
use society_core::{SimulationError, TurnController, WeightedProposer};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "society_sim")]
#[command(about = "A turn-based society simulation with a shared resource economy")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Override the configured turn limit
    #[arg(long)]
    max_turns: Option<u64>,

    /// Override the configured random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Write turn events as JSONL to this path
    #[arg(long)]
    event_log: Option<PathBuf>,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing();

    if args.print_default_config {
        print!("{}", default_config_toml());
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn run(args: &Args) -> Result<(), SimulationError> {
    let mut config = SimulationConfig::load_or_default(&args.config)?;
    if let Some(max_turns) = args.max_turns {
        config.simulation.max_turns = max_turns;
    }
    if let Some(seed) = args.seed {
        config.simulation.seed = seed;
    }
    if let Some(path) = &args.event_log {
        config.simulation.event_log = Some(path.clone());
    }

    println!("Society Simulation");
    println!("==================");
    println!("Seed: {}", config.simulation.seed);
    println!("Max turns: {}", config.simulation.max_turns);
    println!("Agents: {}", config.persona_names().join(", "));
    println!();

    let proposer = WeightedProposer::new(config.simulation.seed);
    let mut controller = TurnController::new(&config, proposer)?;
    let summary = controller.run()?;

    for event in controller.events() {
        println!("{}", event.history_line());
    }

    println!();
    println!(
        "Simulation complete after {} turns: {}.",
        summary.turns_played, summary.halt_reason
    );
    println!("Final state: {}", summary.final_state.summary_line());
    println!(
        "{} events, {} failed actions.",
        summary.total_events, summary.failed_actions
    );
    if let Some(path) = &config.simulation.event_log {
        println!("Event log written to {}", path.display());
    }
    Ok(())
}
