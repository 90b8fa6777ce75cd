//! CLI entrypoint: run a simulation, print gate kinetics, or probe a trace.
//! Logging goes to stderr and follows `RUST_LOG` (default `warn`).

mod commands;
mod report;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hh")]
#[command(about = "Single-compartment Hodgkin-Huxley simulator", long_about = None)]
struct Cli {
    /// Log at debug level regardless of RUST_LOG
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Integrate the model and report detected events
    Run {
        /// TOML run configuration (reference values when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        overrides: commands::Overrides,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Tabulate steady states and time constants of n, m, h
    Kinetics {
        /// First voltage (mV)
        #[arg(long, default_value_t = -100.0, allow_hyphen_values = true)]
        from: f64,

        /// Upper bound, exclusive (mV)
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        to: f64,

        /// Voltage step (mV)
        #[arg(long, default_value_t = 0.1)]
        step: f64,
    },

    /// List samples whose voltage passes within a tolerance of a target
    Probe {
        /// Target voltage (mV)
        #[arg(short, long, default_value_t = -54.87, allow_hyphen_values = true)]
        target: f64,

        /// Absolute tolerance (mV)
        #[arg(long, default_value_t = 0.01)]
        tolerance: f64,

        /// TOML run configuration (reference values when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        overrides: commands::Overrides,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run {
            config,
            overrides,
            json,
        } => commands::run(config.as_deref(), &overrides, json),
        Commands::Kinetics { from, to, step } => commands::kinetics(from, to, step),
        Commands::Probe {
            target,
            tolerance,
            config,
            overrides,
        } => commands::probe(config.as_deref(), &overrides, target, tolerance),
    }
}
