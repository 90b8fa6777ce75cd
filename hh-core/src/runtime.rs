//! HH runtime: forward-Euler scan over the time grid, one sample per step.
//!
//! Semantics:
//! - sample 0 is the resting initial condition and is written at construction
//! - `step_once()` reads the state and stimulus at the cursor and writes the next
//!   sample, so every index is written exactly once, in increasing order
//! - `finish()` runs whatever is left and hands back the owned [`Trace`]

use tracing::{debug, warn};

use crate::error::{ensure_finite, HhError, Result};
use crate::grid::TimeGrid;
use crate::params::HhParams;
use crate::state::MembraneState;
use crate::stimulus::Stimulus;
use crate::trace::Trace;

pub struct HhRuntime<'a> {
    params: HhParams,
    grid: TimeGrid,
    stimulus: &'a [f64],
    trace: Trace,
    state: MembraneState,
    cursor: usize,
}

impl<'a> HhRuntime<'a> {
    /// Validate inputs, then allocate the trace with gates at steady state for `v_rest`.
    pub fn new(
        params: HhParams,
        grid: TimeGrid,
        stimulus: &'a Stimulus,
        v_rest: f64,
    ) -> Result<Self> {
        ensure_finite("v_rest", v_rest)?;
        if stimulus.len() != grid.len() {
            return Err(HhError::LengthMismatch {
                expected: grid.len(),
                actual: stimulus.len(),
            });
        }
        let state = MembraneState::resting(v_rest);
        Ok(Self {
            params,
            grid,
            stimulus: stimulus.samples(),
            trace: Trace::allocate(grid, params, state),
            state,
            cursor: 0,
        })
    }

    /// Index of the most recently written sample.
    #[inline]
    pub fn current_index(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn current_time(&self) -> f64 {
        self.grid.time(self.cursor)
    }

    #[inline]
    pub fn state(&self) -> MembraneState {
        self.state
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.cursor + 1 >= self.grid.len()
    }

    /// Advance by one sample and return the newly written state, or `None` at the end.
    pub fn step_once(&mut self) -> Option<MembraneState> {
        if self.is_finished() {
            return None;
        }
        let i_x = self.stimulus[self.cursor];
        let next = self.state.step(&self.params, i_x, self.grid.dt());
        self.cursor += 1;
        self.trace.write(self.cursor, next);
        self.state = next;
        Some(next)
    }

    /// Run until sample `until` (inclusive) has been written, or the grid ends.
    pub fn run_until(&mut self, until: usize) {
        while self.cursor < until && self.step_once().is_some() {}
    }

    /// Convenience: advance a fixed number of samples.
    pub fn run_steps(&mut self, steps: usize) {
        let until = self.cursor.saturating_add(steps);
        self.run_until(until);
    }

    /// Integrate to the end of the grid and release the trace.
    pub fn finish(mut self) -> Trace {
        self.run_until(usize::MAX);
        if !self.trace.gates_in_unit_range() {
            warn!(
                dt = self.grid.dt(),
                "gating variables left [0, 1]; explicit Euler step is too large"
            );
        }
        debug!(samples = self.trace.len(), "integration finished");
        self.trace
    }
}

/// Integrate the whole grid in one call.
pub fn integrate(
    params: HhParams,
    grid: TimeGrid,
    stimulus: &Stimulus,
    v_rest: f64,
) -> Result<Trace> {
    debug!(samples = grid.len(), dt = grid.dt(), v_rest, "starting integration");
    Ok(HhRuntime::new(params, grid, stimulus, v_rest)?.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinetics::Gate;
    use crate::stimulus::PulseShape;
    use approx::assert_abs_diff_eq;

    fn short_grid() -> TimeGrid {
        TimeGrid::new(50.0, 0.01).unwrap()
    }

    #[test]
    fn initial_gates_at_steady_state() {
        let grid = short_grid();
        let stim = Stimulus::zero(&grid);
        let trace = integrate(HhParams::REFERENCE, grid, &stim, -65.0).unwrap();
        assert_eq!(trace.voltage()[0], -65.0);
        assert_abs_diff_eq!(trace.n()[0], Gate::N.steady_state(-65.0), epsilon = 1e-15);
        assert_abs_diff_eq!(trace.m()[0], Gate::M.steady_state(-65.0), epsilon = 1e-15);
        assert_abs_diff_eq!(trace.h()[0], Gate::H.steady_state(-65.0), epsilon = 1e-15);
    }

    #[test]
    fn rest_without_stimulus_does_not_drift() {
        let grid = short_grid();
        let stim = Stimulus::zero(&grid);
        let trace = integrate(HhParams::REFERENCE, grid, &stim, -65.0).unwrap();
        assert!(trace.voltage().iter().all(|v| (v + 65.0).abs() < 0.5));
        assert!(trace.gates_in_unit_range());
    }

    #[test]
    fn stepping_matches_one_shot_integration() {
        let grid = short_grid();
        let shape = PulseShape {
            amplitude: 10.0,
            onset: 5.0,
            width: 1.0,
            duration: 20.0,
        };
        let stim = Stimulus::generate(&grid, &shape).unwrap();

        let mut rt = HhRuntime::new(HhParams::REFERENCE, grid, &stim, -65.0).unwrap();
        rt.run_steps(100);
        assert_eq!(rt.current_index(), 100);
        rt.run_until(2000);
        assert_eq!(rt.current_index(), 2000);
        let stepped = rt.finish();

        let direct = integrate(HhParams::REFERENCE, grid, &stim, -65.0).unwrap();
        assert_eq!(stepped, direct);
    }

    #[test]
    fn step_once_stops_at_grid_end() {
        let grid = TimeGrid::new(0.03, 0.01).unwrap();
        let stim = Stimulus::zero(&grid);
        let mut rt = HhRuntime::new(HhParams::REFERENCE, grid, &stim, -65.0).unwrap();
        assert!(rt.step_once().is_some());
        assert!(rt.step_once().is_some());
        assert!(rt.is_finished());
        assert!(rt.step_once().is_none());
        assert_eq!(rt.finish().len(), 3);
    }

    #[test]
    fn sample_uses_stimulus_at_previous_index() {
        let grid = TimeGrid::new(0.02, 0.01).unwrap();
        let stim = Stimulus::from_samples(&grid, vec![100.0, 0.0]).unwrap();
        let trace = integrate(HhParams::REFERENCE, grid, &stim, -65.0).unwrap();
        let rest = MembraneState::resting(-65.0);
        let expected = rest.step(&HhParams::REFERENCE, 100.0, 0.01);
        assert_eq!(trace.voltage()[1], expected.v);
    }

    #[test]
    fn mismatched_stimulus_is_rejected() {
        let grid = short_grid();
        let other = TimeGrid::new(10.0, 0.01).unwrap();
        let stim = Stimulus::zero(&other);
        let err = HhRuntime::new(HhParams::REFERENCE, grid, &stim, -65.0).err();
        assert!(matches!(err, Some(HhError::LengthMismatch { .. })));
    }
}
