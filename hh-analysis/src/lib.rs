//! hh-analysis: post-hoc characterisation of hh-core voltage traces
//!
//! Additions over hh-core:
//! - forward-difference first and second derivatives of V
//! - spike onset (dV/dt threshold) and inflection (d2V/dt near zero) detection,
//!   with a search window chosen from the stimulus polarity
//! - voltage probes, run summaries, and a TOML-backed run configuration
//!
//! Everything here consumes immutable hh-core output; nothing feeds back.

pub mod config;
pub mod derivative;
pub mod detector;
pub mod error;
pub mod pipeline;
pub mod probe;

// Re-exports
pub use config::{GridConfig, SimulationConfig};
pub use derivative::Derivatives;
pub use detector::{Detection, DetectorConfig, EventDetector, EventPoint, SearchWindow};
pub use error::{AnalysisError, Result};
pub use pipeline::{RunSummary, Simulation, SimulationReport};
pub use probe::{probe_voltage, ProbeSample};
