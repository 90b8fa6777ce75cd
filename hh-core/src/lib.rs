//! hh-core: fixed-step Hodgkin-Huxley integrator for a single compartment
//!
//! Data flows one way: a [`Stimulus`] sampled on a [`TimeGrid`] drives the
//! forward-Euler [`HhRuntime`], which fills an owned [`Trace`].

pub mod error;
pub mod grid;
pub mod kinetics;
pub mod params;
pub mod runtime;
pub mod state;
pub mod stimulus;
pub mod trace;

// Re-exports
pub use error::{HhError, Result};
pub use grid::{TimeGrid, MAX_SAMPLES};
pub use kinetics::{kinetics_table, Gate, KineticsRow};
pub use params::HhParams;
pub use runtime::{integrate, HhRuntime};
pub use state::MembraneState;
pub use stimulus::{PulseShape, Stimulus};
pub use trace::{OpenProbabilities, Trace};
