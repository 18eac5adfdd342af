//! ED Flow Simulator CLI
//!
//! Runs seeded replications of the emergency department model and prints
//! the averaged statistics as JSON.

use clap::Parser;
use ed_simulator_core::orchestrator::run_replication_batch;
use ed_simulator_core::{fingerprint, AveragedResult, SimulationConfig, SimulationError};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "ed-sim")]
#[command(about = "Discrete-event simulation of emergency department patient flow")]
#[command(version)]
struct Cli {
    /// JSON config file; missing fields take their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Master RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Horizon in minutes
    #[arg(long)]
    horizon: Option<f64>,

    /// Number of independent replications
    #[arg(short = 'n', long, default_value = "1")]
    replications: usize,

    /// Number of doctors
    #[arg(long)]
    doctors: Option<usize>,

    /// Disable class 1–2 preemption of lower-priority workups
    #[arg(long)]
    no_preemption: bool,

    /// Also print each replication's result
    #[arg(long)]
    each: bool,

    /// Print the SHA-256 fingerprints of the config and the averaged result
    #[arg(long)]
    fingerprint: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn load_config(&self) -> Result<SimulationConfig, SimulationError> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    SimulationError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
                })?;
                SimulationConfig::from_json(&text)?
            }
            None => SimulationConfig::default(),
        };

        if let Some(seed) = self.seed {
            config.rng_seed = seed;
        }
        if let Some(horizon) = self.horizon {
            config.horizon_minutes = horizon;
        }
        if let Some(doctors) = self.doctors {
            config.doctors = doctors;
        }
        if self.no_preemption {
            config.preemption_enabled = false;
        }
        config.validate()?;
        Ok(config)
    }

    fn print_json<T: serde::Serialize>(&self, record: &T) -> Result<(), SimulationError> {
        let json = if self.pretty {
            serde_json::to_string_pretty(record)
        } else {
            serde_json::to_string(record)
        }
        .map_err(|e| SimulationError::Serialization(e.to_string()))?;
        println!("{}", json);
        Ok(())
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli) -> Result<(), SimulationError> {
    let config = cli.load_config()?;
    info!(
        "running {} replication(s), master seed {}",
        cli.replications, config.rng_seed
    );

    let results = run_replication_batch(&config, cli.replications)?;
    if cli.each {
        for result in &results {
            cli.print_json(result)?;
        }
    }

    let averaged = AveragedResult::average(&results)?;
    cli.print_json(&averaged)?;

    if cli.fingerprint {
        println!("config  {}", fingerprint(&config)?);
        println!("result  {}", fingerprint(&averaged)?);
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ed-sim: {}", e);
            ExitCode::FAILURE
        }
    }
}
