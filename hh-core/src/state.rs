//! Four-variable membrane state and its forward-Euler update.

use crate::kinetics::Gate;
use crate::params::HhParams;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MembraneState {
    /// Membrane potential (mV)
    pub v: f64,
    /// Potassium activation
    pub n: f64,
    /// Sodium activation
    pub m: f64,
    /// Sodium inactivation
    pub h: f64,
}

impl MembraneState {
    /// Voltage `v` with every gate at its steady state for `v`.
    pub fn resting(v: f64) -> Self {
        Self {
            v,
            n: Gate::N.steady_state(v),
            m: Gate::M.steady_state(v),
            h: Gate::H.steady_state(v),
        }
    }

    /// One explicit Euler step under injected current `i_x`.
    ///
    /// Every derivative is evaluated at the pre-step state. Gates are not clamped,
    /// so a step that is too large can leave them outside `[0, 1]`.
    #[inline]
    pub fn step(&self, params: &HhParams, i_x: f64, dt: f64) -> Self {
        let v = self.v;
        Self {
            v: v + dt * (params.ionic_current(self) + i_x) / params.c_m,
            n: self.n + dt * Gate::N.rate_of_change(self.n, v),
            m: self.m + dt * Gate::M.rate_of_change(self.m, v),
            h: self.h + dt * Gate::H.rate_of_change(self.h, v),
        }
    }

    pub fn gate(&self, gate: Gate) -> f64 {
        match gate {
            Gate::N => self.n,
            Gate::M => self.m,
            Gate::H => self.h,
        }
    }

    pub fn gates_in_unit_range(&self) -> bool {
        Gate::ALL
            .iter()
            .all(|&g| (0.0..=1.0).contains(&self.gate(g)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinetics::{alpha_m, beta_m};
    use approx::assert_abs_diff_eq;

    #[test]
    fn resting_state_is_near_fixed_point() {
        let p = HhParams::REFERENCE;
        let s0 = MembraneState::resting(-65.0);
        let s1 = s0.step(&p, 0.0, 0.01);
        assert_abs_diff_eq!(s1.n, s0.n, epsilon = 1e-9);
        assert_abs_diff_eq!(s1.m, s0.m, epsilon = 1e-9);
        assert_abs_diff_eq!(s1.h, s0.h, epsilon = 1e-9);
        assert_abs_diff_eq!(s1.v, s0.v, epsilon = 1e-3);
    }

    #[test]
    fn depolarising_current_raises_voltage() {
        let p = HhParams::REFERENCE;
        let s0 = MembraneState::resting(-65.0);
        let s1 = s0.step(&p, 10.0, 0.01);
        assert!(s1.v > s0.v);
    }

    #[test]
    fn gating_update_uses_pre_step_voltage() {
        let p = HhParams::REFERENCE;
        let s0 = MembraneState {
            v: -20.0,
            n: 0.3,
            m: 0.1,
            h: 0.6,
        };
        let dt = 0.001;
        let s1 = s0.step(&p, 50.0, dt);
        let (a, b) = (alpha_m(-20.0), beta_m(-20.0));
        let expected_m = 0.1 + dt * (a * (1.0 - 0.1) - b * 0.1);
        assert_abs_diff_eq!(s1.m, expected_m, epsilon = 1e-15);
    }

    #[test]
    fn large_steps_are_not_clamped() {
        let p = HhParams::REFERENCE;
        let s0 = MembraneState {
            v: 20.0,
            n: 0.9,
            m: 0.99,
            h: 0.01,
        };
        let s1 = s0.step(&p, 0.0, 5.0);
        assert!(!s1.gates_in_unit_range());
    }
}
