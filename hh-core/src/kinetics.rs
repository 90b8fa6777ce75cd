//! Voltage-dependent rate functions for the n, m and h gates.
//!
//! ```text
//! alpha_n(V) = 0.01 (V+55) / (1 - exp(-0.1 (V+55)))
//! beta_n(V)  = 0.125 exp(-0.0125 (V+65))
//! alpha_m(V) = 0.1 (V+40) / (1 - exp(-0.1 (V+40)))
//! beta_m(V)  = 4 exp(-0.0556 (V+65))
//! alpha_h(V) = 0.07 exp(-0.05 (V+65))
//! beta_h(V)  = 1 / (1 + exp(-0.1 (V+35)))
//! ```
//!
//! `alpha_n` and `alpha_m` are 0/0 at V = -55 and V = -40. Both are written in
//! terms of `u / (1 - exp(-u))`, which is evaluated through `exp_m1` and takes
//! its limit of 1 at `u = 0`, so no voltage produces NaN.

use crate::error::{ensure_finite, ensure_positive, HhError, Result};
use crate::grid::sample_count;

/// Below this |u| the first-order series of `u / (1 - exp(-u))` is exact to f64.
const EXPREL_SERIES_CUTOFF: f64 = 1e-6;

/// `u / (1 - exp(-u))`, continuous through `u = 0`.
#[inline]
fn exprel(u: f64) -> f64 {
    if u.abs() < EXPREL_SERIES_CUTOFF {
        1.0 + 0.5 * u
    } else {
        u / -(-u).exp_m1()
    }
}

#[inline]
pub fn alpha_n(v: f64) -> f64 {
    0.1 * exprel(0.1 * (v + 55.0))
}

#[inline]
pub fn beta_n(v: f64) -> f64 {
    0.125 * (-0.0125 * (v + 65.0)).exp()
}

#[inline]
pub fn alpha_m(v: f64) -> f64 {
    exprel(0.1 * (v + 40.0))
}

#[inline]
pub fn beta_m(v: f64) -> f64 {
    4.0 * (-0.0556 * (v + 65.0)).exp()
}

#[inline]
pub fn alpha_h(v: f64) -> f64 {
    0.07 * (-0.05 * (v + 65.0)).exp()
}

#[inline]
pub fn beta_h(v: f64) -> f64 {
    1.0 / (1.0 + (-0.1 * (v + 35.0)).exp())
}

/// One of the three gating variables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Gate {
    /// Potassium activation
    N,
    /// Sodium activation
    M,
    /// Sodium inactivation
    H,
}

impl Gate {
    pub const ALL: [Gate; 3] = [Gate::N, Gate::M, Gate::H];

    #[inline]
    pub fn alpha(self, v: f64) -> f64 {
        match self {
            Gate::N => alpha_n(v),
            Gate::M => alpha_m(v),
            Gate::H => alpha_h(v),
        }
    }

    #[inline]
    pub fn beta(self, v: f64) -> f64 {
        match self {
            Gate::N => beta_n(v),
            Gate::M => beta_m(v),
            Gate::H => beta_h(v),
        }
    }

    /// `x_infty(V) = alpha / (alpha + beta)`
    #[inline]
    pub fn steady_state(self, v: f64) -> f64 {
        let a = self.alpha(v);
        a / (a + self.beta(v))
    }

    /// `tau_x(V) = 1 / (alpha + beta)` in ms.
    #[inline]
    pub fn time_constant(self, v: f64) -> f64 {
        1.0 / (self.alpha(v) + self.beta(v))
    }

    /// `dx/dt = alpha (1 - x) - beta x`
    #[inline]
    pub fn rate_of_change(self, x: f64, v: f64) -> f64 {
        self.alpha(v) * (1.0 - x) - self.beta(v) * x
    }
}

/// Steady states and time constants of all gates at one voltage.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KineticsRow {
    pub v: f64,
    pub n_inf: f64,
    pub m_inf: f64,
    pub h_inf: f64,
    pub tau_n: f64,
    pub tau_m: f64,
    pub tau_h: f64,
}

impl KineticsRow {
    pub fn at(v: f64) -> Self {
        Self {
            v,
            n_inf: Gate::N.steady_state(v),
            m_inf: Gate::M.steady_state(v),
            h_inf: Gate::H.steady_state(v),
            tau_n: Gate::N.time_constant(v),
            tau_m: Gate::M.time_constant(v),
            tau_h: Gate::H.time_constant(v),
        }
    }
}

/// Sample the gate kinetics on `from, from + step, ...` strictly below `to`.
/// An empty range (`to <= from`) yields no rows.
pub fn kinetics_table(from: f64, to: f64, step: f64) -> Result<Vec<KineticsRow>> {
    ensure_finite("from", from)?;
    ensure_finite("to", to)?;
    ensure_positive("step", step)?;
    if to <= from {
        return Ok(Vec::new());
    }
    let rows = sample_count((to - from) / step).ok_or(HhError::InvalidConfig {
        field: "step",
        value: step,
        reason: "yields more rows than MAX_SAMPLES",
    })?;
    Ok((0..rows)
        .map(|i| KineticsRow::at(from + i as f64 * step))
        .collect())
}
