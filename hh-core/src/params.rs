//! Membrane parameters and the ionic current projections built from them.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::state::MembraneState;

/// Capacitance (uF/cm^2), maximal conductances (mS/cm^2) and reversal potentials (mV).
///
/// Passed by value into every run so that concurrent simulations with different
/// parameter sets never share state.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HhParams {
    pub c_m: f64,
    pub g_leak: f64,
    pub e_leak: f64,
    pub g_k: f64,
    pub e_k: f64,
    pub g_na: f64,
    pub e_na: f64,
}

impl HhParams {
    /// Squid giant axon values with the leak reversal tuned for rest at -65 mV.
    pub const REFERENCE: Self = Self {
        c_m: 1.0,
        g_leak: 0.3,
        e_leak: -54.387,
        g_k: 36.0,
        e_k: -77.0,
        g_na: 120.0,
        e_na: 50.0,
    };

    /// `IL = -gL (V - EL)`
    #[inline]
    pub fn leak_current(&self, v: f64) -> f64 {
        -self.g_leak * (v - self.e_leak)
    }

    /// `IK = -gK n^4 (V - EK)`
    #[inline]
    pub fn potassium_current(&self, n: f64, v: f64) -> f64 {
        -self.g_k * n.powi(4) * (v - self.e_k)
    }

    /// `INa = -gNa m^3 h (V - ENa)`
    #[inline]
    pub fn sodium_current(&self, m: f64, h: f64, v: f64) -> f64 {
        -self.g_na * m.powi(3) * h * (v - self.e_na)
    }

    /// Net ionic current into the cell (sign convention: inward positive).
    #[inline]
    pub fn ionic_current(&self, s: &MembraneState) -> f64 {
        self.leak_current(s.v)
            + self.potassium_current(s.n, s.v)
            + self.sodium_current(s.m, s.h, s.v)
    }
}

impl Default for HhParams {
    fn default() -> Self {
        Self::REFERENCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn currents_vanish_at_reversal() {
        let p = HhParams::REFERENCE;
        assert_eq!(p.leak_current(p.e_leak), 0.0);
        assert_eq!(p.potassium_current(0.4, p.e_k), 0.0);
        assert_eq!(p.sodium_current(0.1, 0.6, p.e_na), 0.0);
    }

    #[test]
    fn potassium_is_outward_above_reversal() {
        let p = HhParams::REFERENCE;
        assert!(p.potassium_current(0.5, -60.0) < 0.0);
        assert!(p.sodium_current(0.5, 0.5, -60.0) > 0.0);
    }

    #[test]
    fn resting_net_current_is_small() {
        let p = HhParams::REFERENCE;
        let rest = MembraneState::resting(-65.0);
        assert_abs_diff_eq!(p.ionic_current(&rest), 0.0, epsilon = 0.05);
    }
}
