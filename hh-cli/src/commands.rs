// Subcommand implementations. Each loads its inputs, runs the library, and hands
// the result to `report` for printing.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use hh_analysis::{Simulation, SimulationConfig};
use hh_core::kinetics_table;
use tracing::info;

use crate::report;

/// Command-line overrides applied on top of the loaded configuration.
#[derive(Args, Debug, Default)]
pub struct Overrides {
    /// Stimulus amplitude (uA/cm^2); negative for a hyperpolarising pulse
    #[arg(short, long, allow_hyphen_values = true)]
    pub amplitude: Option<f64>,

    /// Stimulus onset (ms); defaults to a third of the duration
    #[arg(long)]
    pub onset: Option<f64>,

    /// Total simulated time (ms)
    #[arg(short = 'T', long)]
    pub duration: Option<f64>,

    /// Integration step (ms)
    #[arg(long)]
    pub dt: Option<f64>,

    /// Resting potential (mV)
    #[arg(long, allow_hyphen_values = true)]
    pub v_rest: Option<f64>,
}

impl Overrides {
    fn apply(&self, config: &mut SimulationConfig, from_file: bool) {
        if let Some(duration) = self.duration {
            config.grid.duration = duration;
            // Keep the reference pulse placement at T/3 unless a file or flag pins it.
            if !from_file && self.onset.is_none() {
                config.stimulus.onset = duration / 3.0;
            }
        }
        if let Some(dt) = self.dt {
            config.grid.dt = dt;
        }
        if let Some(amplitude) = self.amplitude {
            config.stimulus.amplitude = amplitude;
        }
        if let Some(onset) = self.onset {
            config.stimulus.onset = onset;
        }
        if let Some(v_rest) = self.v_rest {
            config.v_rest = v_rest;
        }
    }
}

pub fn load_config(path: Option<&Path>, overrides: &Overrides) -> Result<SimulationConfig> {
    let mut config = match path {
        Some(p) => SimulationConfig::from_file(p)
            .with_context(|| format!("failed to load config from {}", p.display()))?,
        None => SimulationConfig::reference(),
    };
    overrides.apply(&mut config, path.is_some());
    config.validate().context("invalid configuration")?;
    Ok(config)
}

pub fn run(path: Option<&Path>, overrides: &Overrides, json: bool) -> Result<()> {
    let config = load_config(path, overrides)?;
    info!(
        duration = config.grid.duration,
        dt = config.grid.dt,
        amplitude = config.stimulus.amplitude,
        "running simulation"
    );
    let report = Simulation::new(config)?.run()?;
    let summary = report.summary();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &summary)?;
        writeln!(out)?;
    } else {
        report::write_summary(&mut out, &summary)?;
    }
    Ok(())
}

pub fn kinetics(from: f64, to: f64, step: f64) -> Result<()> {
    let rows = kinetics_table(from, to, step).context("invalid voltage range")?;
    let stdout = io::stdout();
    report::write_kinetics(&mut stdout.lock(), &rows)?;
    Ok(())
}

pub fn probe(
    path: Option<&Path>,
    overrides: &Overrides,
    target: f64,
    tolerance: f64,
) -> Result<()> {
    let config = load_config(path, overrides)?;
    let report = Simulation::new(config)?.run()?;
    let samples = report
        .probe(target, tolerance)
        .context("invalid probe parameters")?;
    let stdout = io::stdout();
    report::write_probe(&mut stdout.lock(), target, &samples)?;
    Ok(())
}
