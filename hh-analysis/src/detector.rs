//! Spike onset and inflection detection on a voltage trace.
//!
//! - Onset: first sample whose `dV/dt` exceeds `onset_rate`.
//! - Inflection: first sample inside a stimulus-dependent window whose `d2V/dt`
//!   lies in `[-inflection_band, +inflection_band]`. For a depolarising pulse the
//!   window is `(onset, end)`; for a hyperpolarising pulse it is `[end, inf)`,
//!   where `end = onset + duration + 3 * width`.
//!
//! Absence is reported as [`Detection::NotFound`], never as an error.

use hh_core::error::{ensure_finite, HhError};
use hh_core::{PulseShape, Trace};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::derivative::Derivatives;
use crate::error::Result;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// dV/dt threshold for spike onset (mV/ms)
    pub onset_rate: f64,
    /// Half-width of the zero band for d2V/dt (mV/ms^2)
    pub inflection_band: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            onset_rate: 15.0,
            inflection_band: 0.01,
        }
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<()> {
        ensure_finite("detector.onset_rate", self.onset_rate)?;
        ensure_finite("detector.inflection_band", self.inflection_band)?;
        if self.inflection_band < 0.0 {
            return Err(HhError::InvalidConfig {
                field: "detector.inflection_band",
                value: self.inflection_band,
                reason: "must be >= 0",
            }
            .into());
        }
        Ok(())
    }
}

/// A located event on the trace.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventPoint {
    pub index: usize,
    /// ms
    pub time: f64,
    /// mV
    pub voltage: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Detection {
    Found(EventPoint),
    NotFound,
}

impl Detection {
    pub fn is_found(&self) -> bool {
        matches!(self, Detection::Found(_))
    }

    pub fn point(&self) -> Option<&EventPoint> {
        match self {
            Detection::Found(p) => Some(p),
            Detection::NotFound => None,
        }
    }
}

impl From<Option<EventPoint>> for Detection {
    fn from(p: Option<EventPoint>) -> Self {
        p.map_or(Detection::NotFound, Detection::Found)
    }
}

/// Time range searched for the inflection point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchWindow {
    /// `start < t < end`
    Between { start: f64, end: f64 },
    /// `t >= start`
    From { start: f64 },
}

impl SearchWindow {
    /// During the pulse for depolarising stimuli, after it for hyperpolarising ones.
    pub fn for_stimulus(shape: &PulseShape) -> Self {
        if shape.is_inhibitory() {
            SearchWindow::From {
                start: shape.end_time(),
            }
        } else {
            SearchWindow::Between {
                start: shape.onset,
                end: shape.end_time(),
            }
        }
    }

    #[inline]
    pub fn contains(&self, t: f64) -> bool {
        match *self {
            SearchWindow::Between { start, end } => t > start && t < end,
            SearchWindow::From { start } => t >= start,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct EventDetector {
    config: DetectorConfig,
}

impl EventDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// First sample with `dV/dt > onset_rate`.
    pub fn onset(&self, trace: &Trace, derivatives: &Derivatives) -> Result<Detection> {
        derivatives.ensure_matches(trace)?;
        let found = derivatives
            .dv_dt()
            .iter()
            .position(|&r| r > self.config.onset_rate)
            .map(|i| event_at(trace, i));
        Ok(log_detection("onset", found))
    }

    /// First sample inside `window` with `|d2V/dt| <= inflection_band`.
    pub fn inflection(
        &self,
        trace: &Trace,
        derivatives: &Derivatives,
        window: SearchWindow,
    ) -> Result<Detection> {
        derivatives.ensure_matches(trace)?;
        let band = self.config.inflection_band;
        let found = derivatives
            .d2v_dt()
            .iter()
            .enumerate()
            .find(|&(i, &a)| window.contains(trace.time(i)) && (-band..=band).contains(&a))
            .map(|(i, _)| event_at(trace, i));
        Ok(log_detection("inflection", found))
    }

    /// Every sample where `dV/dt` rises through `onset_rate`.
    pub fn onset_crossings(&self, derivatives: &Derivatives) -> Vec<usize> {
        let rate = self.config.onset_rate;
        let dv = derivatives.dv_dt();
        (0..dv.len())
            .filter(|&i| dv[i] > rate && (i == 0 || dv[i - 1] <= rate))
            .collect()
    }
}

fn event_at(trace: &Trace, index: usize) -> EventPoint {
    EventPoint {
        index,
        time: trace.time(index),
        voltage: trace.voltage()[index],
    }
}

fn log_detection(kind: &'static str, found: Option<EventPoint>) -> Detection {
    match found {
        Some(p) => info!(kind, time = p.time, voltage = p.voltage, "event detected"),
        None => debug!(kind, "no event in trace"),
    }
    found.into()
}
