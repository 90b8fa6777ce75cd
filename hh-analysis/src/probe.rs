//! Voltage probe: every sample that passes close to a target potential, with the
//! local curvature there.

use hh_core::error::{ensure_finite, ensure_positive};
use hh_core::Trace;
use serde::{Deserialize, Serialize};

use crate::derivative::Derivatives;
use crate::error::Result;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProbeSample {
    pub index: usize,
    pub time: f64,
    pub voltage: f64,
    pub d2v_dt: f64,
}

/// Samples with `|V - target| < tolerance`, in time order. May be empty.
pub fn probe_voltage(
    trace: &Trace,
    derivatives: &Derivatives,
    target: f64,
    tolerance: f64,
) -> Result<Vec<ProbeSample>> {
    ensure_finite("probe.target", target)?;
    ensure_positive("probe.tolerance", tolerance)?;
    derivatives.ensure_matches(trace)?;
    Ok(trace
        .voltage()
        .iter()
        .zip(derivatives.d2v_dt())
        .enumerate()
        .filter(|&(_, (&v, _))| (v - target).abs() < tolerance)
        .map(|(index, (&voltage, &d2v_dt))| ProbeSample {
            index,
            time: trace.time(index),
            voltage,
            d2v_dt,
        })
        .collect())
}
