//! Integrated state arrays and read-only projections over them.

use crate::grid::TimeGrid;
use crate::params::HhParams;
use crate::state::MembraneState;

/// `V, n, m, h` at every grid sample, owned by a single run.
#[derive(Clone, Debug, PartialEq)]
pub struct Trace {
    grid: TimeGrid,
    params: HhParams,
    v: Vec<f64>,
    n: Vec<f64>,
    m: Vec<f64>,
    h: Vec<f64>,
}

/// Channel open probabilities at one sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OpenProbabilities {
    /// n^4
    pub potassium: f64,
    /// m^3
    pub sodium_activation: f64,
    /// h
    pub sodium_inactivation: f64,
    /// m^3 h
    pub sodium: f64,
}

impl Trace {
    /// Full-length buffers; index 0 holds the initial condition.
    pub(crate) fn allocate(grid: TimeGrid, params: HhParams, initial: MembraneState) -> Self {
        let len = grid.len();
        let mut trace = Self {
            grid,
            params,
            v: vec![0.0; len],
            n: vec![0.0; len],
            m: vec![0.0; len],
            h: vec![0.0; len],
        };
        trace.write(0, initial);
        trace
    }

    #[inline]
    pub(crate) fn write(&mut self, index: usize, s: MembraneState) {
        self.v[index] = s.v;
        self.n[index] = s.n;
        self.m[index] = s.m;
        self.h[index] = s.h;
    }

    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    pub fn params(&self) -> &HhParams {
        &self.params
    }

    #[inline]
    pub fn dt(&self) -> f64 {
        self.grid.dt()
    }

    #[inline]
    pub fn time(&self, index: usize) -> f64 {
        self.grid.time(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.v.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.v.is_empty()
    }

    pub fn voltage(&self) -> &[f64] {
        &self.v
    }

    pub fn n(&self) -> &[f64] {
        &self.n
    }

    pub fn m(&self) -> &[f64] {
        &self.m
    }

    pub fn h(&self) -> &[f64] {
        &self.h
    }

    pub fn state(&self, index: usize) -> Option<MembraneState> {
        Some(MembraneState {
            v: *self.v.get(index)?,
            n: self.n[index],
            m: self.m[index],
            h: self.h[index],
        })
    }

    pub fn states(&self) -> impl Iterator<Item = MembraneState> + '_ {
        (0..self.len()).map(move |i| MembraneState {
            v: self.v[i],
            n: self.n[i],
            m: self.m[i],
            h: self.h[i],
        })
    }

    pub fn potassium_current(&self) -> impl Iterator<Item = f64> + '_ {
        self.states()
            .map(move |s| self.params.potassium_current(s.n, s.v))
    }

    pub fn sodium_current(&self) -> impl Iterator<Item = f64> + '_ {
        self.states()
            .map(move |s| self.params.sodium_current(s.m, s.h, s.v))
    }

    pub fn leak_current(&self) -> impl Iterator<Item = f64> + '_ {
        self.v.iter().map(move |&v| self.params.leak_current(v))
    }

    pub fn open_probabilities(&self) -> impl Iterator<Item = OpenProbabilities> + '_ {
        self.states().map(|s| {
            let m3 = s.m.powi(3);
            OpenProbabilities {
                potassium: s.n.powi(4),
                sodium_activation: m3,
                sodium_inactivation: s.h,
                sodium: m3 * s.h,
            }
        })
    }

    /// `(min, max)` membrane potential.
    pub fn voltage_range(&self) -> (f64, f64) {
        self.v
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// False once any gate sample has left `[0, 1]` (a sign that `dt` is too large).
    pub fn gates_in_unit_range(&self) -> bool {
        self.states().all(|s| s.gates_in_unit_range())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn flat_trace() -> Trace {
        let grid = TimeGrid::new(1.0, 0.25).unwrap();
        Trace::allocate(grid, HhParams::REFERENCE, MembraneState::resting(-65.0))
    }

    #[test]
    fn allocation_is_full_length_with_initial_condition() {
        let t = flat_trace();
        assert_eq!(t.len(), 4);
        assert_eq!(t.voltage()[0], -65.0);
        assert_eq!(t.state(0), Some(MembraneState::resting(-65.0)));
        assert_eq!(t.state(4), None);
    }

    #[test]
    fn current_projections_follow_params() {
        let mut t = flat_trace();
        let s = MembraneState {
            v: -20.0,
            n: 0.5,
            m: 0.4,
            h: 0.3,
        };
        t.write(1, s);
        let p = HhParams::REFERENCE;
        let ik: Vec<f64> = t.potassium_current().collect();
        let ina: Vec<f64> = t.sodium_current().collect();
        let il: Vec<f64> = t.leak_current().collect();
        assert_abs_diff_eq!(ik[1], -36.0 * 0.0625 * (-20.0 + 77.0), epsilon = 1e-12);
        assert_abs_diff_eq!(ina[1], p.sodium_current(0.4, 0.3, -20.0), epsilon = 1e-12);
        assert_abs_diff_eq!(il[1], -0.3 * (-20.0 + 54.387), epsilon = 1e-12);
    }

    #[test]
    fn open_probabilities_combine_gates() {
        let mut t = flat_trace();
        t.write(
            2,
            MembraneState {
                v: 0.0,
                n: 0.5,
                m: 0.5,
                h: 0.5,
            },
        );
        let p = t.open_probabilities().nth(2).unwrap();
        assert_eq!(p.potassium, 0.0625);
        assert_eq!(p.sodium_activation, 0.125);
        assert_eq!(p.sodium, 0.0625);
    }

    #[test]
    fn voltage_range_and_gate_check() {
        let mut t = flat_trace();
        t.write(
            3,
            MembraneState {
                v: 30.0,
                n: 1.2,
                m: 0.5,
                h: 0.1,
            },
        );
        assert_eq!(t.voltage_range(), (-65.0, 30.0));
        assert!(!t.gates_in_unit_range());
    }
}
