//! Run configuration, loadable from TOML.
//!
//! ```toml
//! v_rest = -65.0
//!
//! [grid]
//! duration = 1000.0
//! dt = 0.001
//!
//! [stimulus]
//! amplitude = 30.0
//! onset = 333.333
//! width = 1.0
//! duration = 300.0
//!
//! [detector]
//! onset_rate = 15.0
//! inflection_band = 0.01
//! ```
//!
//! Every field is optional; omitted values take the reference configuration.

use std::path::Path;

use hh_core::error::ensure_finite;
use hh_core::{PulseShape, TimeGrid};
use serde::{Deserialize, Serialize};

use crate::detector::DetectorConfig;
use crate::error::{AnalysisError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Total simulated time (ms)
    pub duration: f64,
    /// Euler step (ms)
    pub dt: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            duration: 1000.0,
            dt: 0.001,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Resting potential used as the initial voltage (mV)
    pub v_rest: f64,
    pub grid: GridConfig,
    pub stimulus: PulseShape,
    pub detector: DetectorConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::reference()
    }
}

impl SimulationConfig {
    /// Reference run: 1 s at dt = 0.001 ms, 30 uA/cm^2 pulse from T/3 for 300 ms.
    pub fn reference() -> Self {
        Self {
            v_rest: -65.0,
            grid: GridConfig::default(),
            stimulus: PulseShape::REFERENCE,
            detector: DetectorConfig::default(),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig =
            toml::from_str(content).map_err(|e| AnalysisError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Check every numeric input; runs before anything is allocated.
    pub fn validate(&self) -> Result<()> {
        ensure_finite("v_rest", self.v_rest)?;
        self.time_grid()?;
        self.stimulus.validate()?;
        self.detector.validate()
    }

    pub fn time_grid(&self) -> Result<TimeGrid> {
        Ok(TimeGrid::new(self.grid.duration, self.grid.dt)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hh_core::HhError;

    #[test]
    fn empty_toml_is_reference() {
        let config = SimulationConfig::from_toml_str("").unwrap();
        assert_eq!(config, SimulationConfig::reference());
        assert_eq!(config.stimulus, PulseShape::REFERENCE);
        assert_eq!(config.detector.onset_rate, 15.0);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = SimulationConfig::from_toml_str(
            r#"
            v_rest = -65.0

            [grid]
            duration = 100.0

            [stimulus]
            amplitude = -30.0
            "#,
        )
        .unwrap();
        assert_eq!(config.grid.duration, 100.0);
        assert_eq!(config.grid.dt, 0.001);
        assert_eq!(config.stimulus.amplitude, -30.0);
        assert_eq!(config.stimulus.width, 1.0);
    }

    #[test]
    fn invalid_values_fail_validation() {
        let err = SimulationConfig::from_toml_str("[grid]\ndt = 0.0").unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Core(HhError::InvalidConfig { field: "dt", .. })
        ));

        let err = SimulationConfig::from_toml_str("[stimulus]\nwidth = -1.0").unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Core(HhError::InvalidConfig {
                field: "stimulus.width",
                ..
            })
        ));
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = SimulationConfig::from_toml_str("[grid\n").unwrap_err();
        assert!(matches!(err, AnalysisError::Config(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SimulationConfig::from_file("/nonexistent/hh.toml").unwrap_err();
        assert!(matches!(err, AnalysisError::Io(_)));
    }
}
