//! End-to-end run: stimulus -> integrator -> derivatives -> detection.
//!
//! Each stage consumes the previous stage's owned output; a [`Simulation`] holds
//! only immutable configuration, so repeated runs are identical.

use hh_core::{integrate, HhParams, Stimulus, Trace};
use serde::Serialize;
use tracing::{debug, info_span};

use crate::config::SimulationConfig;
use crate::derivative::Derivatives;
use crate::detector::{Detection, EventDetector, SearchWindow};
use crate::error::Result;
use crate::probe::{probe_voltage, ProbeSample};

#[derive(Clone, Debug)]
pub struct Simulation {
    config: SimulationConfig,
    params: HhParams,
}

impl Simulation {
    /// Validates the configuration; nothing is allocated until [`run`](Self::run).
    pub fn new(config: SimulationConfig) -> Result<Self> {
        Self::with_params(config, HhParams::REFERENCE)
    }

    pub fn with_params(config: SimulationConfig, params: HhParams) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, params })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn params(&self) -> &HhParams {
        &self.params
    }

    /// Generate the configured pulse and run the full pipeline.
    pub fn run(&self) -> Result<SimulationReport> {
        let grid = self.config.time_grid()?;
        let stimulus = Stimulus::generate(&grid, &self.config.stimulus)?;
        self.run_with(stimulus)
    }

    /// Run against a caller-built waveform. The inflection window still comes
    /// from the configured pulse shape.
    pub fn run_with(&self, stimulus: Stimulus) -> Result<SimulationReport> {
        let span = info_span!("simulation", amplitude = self.config.stimulus.amplitude);
        let _guard = span.enter();

        let grid = self.config.time_grid()?;
        let trace = integrate(self.params, grid, &stimulus, self.config.v_rest)?;
        let derivatives = Derivatives::from_trace(&trace);

        let detector = EventDetector::new(self.config.detector);
        let window = SearchWindow::for_stimulus(&self.config.stimulus);
        let onset = detector.onset(&trace, &derivatives)?;
        let inflection = detector.inflection(&trace, &derivatives, window)?;
        let onset_crossings = detector.onset_crossings(&derivatives);
        debug!(crossings = onset_crossings.len(), "detection finished");

        Ok(SimulationReport {
            stimulus,
            trace,
            derivatives,
            window,
            onset,
            inflection,
            onset_crossings,
        })
    }
}

/// Everything a run produced. Read-only once returned.
#[derive(Clone, Debug)]
pub struct SimulationReport {
    pub stimulus: Stimulus,
    pub trace: Trace,
    pub derivatives: Derivatives,
    pub window: SearchWindow,
    pub onset: Detection,
    pub inflection: Detection,
    /// Indices where dV/dt rises through the onset threshold. A steep stimulus
    /// edge crosses it too, so this can exceed the number of action potentials.
    pub onset_crossings: Vec<usize>,
}

impl SimulationReport {
    pub fn summary(&self) -> RunSummary {
        let (v_min, v_max) = self.trace.voltage_range();
        let grid = self.trace.grid();
        RunSummary {
            samples: self.trace.len(),
            dt: grid.dt(),
            duration: grid.duration(),
            v_min,
            v_max,
            onset_crossings: self.onset_crossings.len(),
            gates_in_unit_range: self.trace.gates_in_unit_range(),
            window: self.window,
            onset: self.onset,
            inflection: self.inflection,
        }
    }

    pub fn probe(&self, target: f64, tolerance: f64) -> Result<Vec<ProbeSample>> {
        probe_voltage(&self.trace, &self.derivatives, target, tolerance)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunSummary {
    pub samples: usize,
    pub dt: f64,
    pub duration: f64,
    pub v_min: f64,
    pub v_max: f64,
    /// Rising crossings of the onset threshold, stimulus edges included
    pub onset_crossings: usize,
    pub gates_in_unit_range: bool,
    pub window: SearchWindow,
    pub onset: Detection,
    pub inflection: Detection,
}
