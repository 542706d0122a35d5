use std::path::PathBuf;

use clap::Parser;
use log::{info, LevelFilter};
use rocket_physics::*;

/// Point-mass rocket flight over a spherical body, stopped at impact.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// TOML scenario file; built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the integration time step (s)
    #[arg(long)]
    time_step: Option<f64>,

    /// Override the simulated time limit (s)
    #[arg(long)]
    max_time: Option<f64>,

    /// Print every recorded flight sample
    #[arg(long)]
    telemetry: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading scenario from {}", path.display());
            SimulationConfig::load(path)?
        }
        None => SimulationConfig::default(),
    };
    if let Some(time_step) = args.time_step {
        config.integration.time_step = time_step;
    }
    if let Some(max_time) = args.max_time {
        config.integration.max_time = max_time;
    }

    let mut simulation = Simulation::from_config(&config)?;
    let report = simulation.run()?;

    if args.telemetry {
        println!("--- Telemetry Data ---");
        for line in simulation.telemetry.log_lines() {
            println!("{}", line);
        }
        println!("--- End of Telemetry ---");
    }

    println!("{}", report);
    println!("{}", simulation.telemetry.summary());

    Ok(())
}
