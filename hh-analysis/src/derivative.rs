//! Forward-difference derivatives of the voltage trace.
//!
//! `dV_dt[i] = (V[i+1] - V[i]) / dt`, and `d2V_dt` applies the same operator to
//! `dV_dt`. The last sample has no forward neighbour and is padded with 0.

use hh_core::error::{ensure_positive, HhError};
use hh_core::Trace;

use crate::error::Result;

#[derive(Clone, Debug, PartialEq)]
pub struct Derivatives {
    dv_dt: Vec<f64>,
    d2v_dt: Vec<f64>,
}

impl Derivatives {
    pub fn from_trace(trace: &Trace) -> Self {
        Self::compute(trace.voltage(), trace.dt())
    }

    /// Differentiate a raw voltage series sampled every `dt` ms.
    pub fn from_samples(v: &[f64], dt: f64) -> Result<Self> {
        ensure_positive("dt", dt)?;
        Ok(Self::compute(v, dt))
    }

    fn compute(v: &[f64], dt: f64) -> Self {
        let dv_dt = forward_difference(v, dt);
        let d2v_dt = forward_difference(&dv_dt, dt);
        Self { dv_dt, d2v_dt }
    }

    /// mV/ms
    pub fn dv_dt(&self) -> &[f64] {
        &self.dv_dt
    }

    /// mV/ms^2
    pub fn d2v_dt(&self) -> &[f64] {
        &self.d2v_dt
    }

    pub fn len(&self) -> usize {
        self.dv_dt.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dv_dt.is_empty()
    }

    /// Derivatives index the trace sample for sample.
    pub fn ensure_matches(&self, trace: &Trace) -> Result<()> {
        if self.len() != trace.len() {
            return Err(HhError::LengthMismatch {
                expected: trace.len(),
                actual: self.len(),
            }
            .into());
        }
        Ok(())
    }
}

fn forward_difference(xs: &[f64], dt: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(xs.len());
    out.extend(xs.windows(2).map(|w| (w[1] - w[0]) / dt));
    if !xs.is_empty() {
        out.push(0.0);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn quadratic_has_constant_second_difference() {
        let dt = 0.5;
        let v: Vec<f64> = (0..6).map(|i| (i as f64 * dt).powi(2)).collect();
        let d = Derivatives::from_samples(&v, dt).unwrap();
        assert_eq!(d.len(), v.len());
        for i in 0..v.len() - 2 {
            assert_abs_diff_eq!(d.d2v_dt()[i], 2.0, epsilon = 1e-12);
        }
        // second-to-last second difference sees the zero padding
        assert_abs_diff_eq!(d.d2v_dt()[4], -d.dv_dt()[4] / dt, epsilon = 1e-12);
    }

    #[test]
    fn last_elements_are_exactly_zero() {
        let d = Derivatives::from_samples(&[1.0, 4.0, 2.0], 0.1).unwrap();
        assert_eq!(*d.dv_dt().last().unwrap(), 0.0);
        assert_eq!(*d.d2v_dt().last().unwrap(), 0.0);
    }

    #[test]
    fn first_difference_reconstructs_increments() {
        let v = [-65.0, -64.0, -60.5, -70.25];
        let dt = 0.01;
        let d = Derivatives::from_samples(&v, dt).unwrap();
        for i in 0..v.len() - 1 {
            assert_abs_diff_eq!(d.dv_dt()[i] * dt, v[i + 1] - v[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn degenerate_inputs() {
        assert!(Derivatives::from_samples(&[], 0.1).unwrap().is_empty());
        let single = Derivatives::from_samples(&[3.0], 0.1).unwrap();
        assert_eq!(single.dv_dt(), &[0.0]);
        assert_eq!(single.d2v_dt(), &[0.0]);
        assert!(Derivatives::from_samples(&[1.0, 2.0], 0.0).is_err());
    }
}
