//! Smooth rectangular current pulse built from two normal CDFs.
//!
//! ```text
//! Ix(t) = A * (Phi((t - t0) / w) - Phi((t - (t0 + D)) / w))
//! ```
//!
//! The sigmoid edges keep the forcing term continuous, which explicit Euler
//! needs at small `dt`.

use core::f64::consts::SQRT_2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, ensure_positive, HhError, Result};
use crate::grid::TimeGrid;

/// Standard normal cumulative distribution function.
#[inline]
pub fn standard_normal_cdf(z: f64) -> f64 {
    0.5 * libm::erfc(-z / SQRT_2)
}

/// Shape of the injected pulse. Times in ms, amplitude in uA/cm^2.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PulseShape {
    /// Plateau current; negative for a hyperpolarising pulse
    pub amplitude: f64,
    /// Midpoint of the rising edge
    pub onset: f64,
    /// Standard deviation of each edge
    pub width: f64,
    /// Distance between rising and falling edge midpoints
    pub duration: f64,
}

impl PulseShape {
    /// Edge widths past the falling midpoint after which the pulse counts as over.
    pub const END_MARGIN_WIDTHS: f64 = 3.0;

    /// 30 uA/cm^2 for 300 ms starting a third of the way into a 1 s run.
    pub const REFERENCE: Self = Self {
        amplitude: 30.0,
        onset: 1000.0 / 3.0,
        width: 1.0,
        duration: 300.0,
    };

    pub fn validate(&self) -> Result<()> {
        ensure_finite("stimulus.amplitude", self.amplitude)?;
        ensure_finite("stimulus.onset", self.onset)?;
        ensure_finite("stimulus.duration", self.duration)?;
        ensure_positive("stimulus.width", self.width)
    }

    #[inline]
    pub fn current_at(&self, t: f64) -> f64 {
        let rise = standard_normal_cdf((t - self.onset) / self.width);
        let fall = standard_normal_cdf((t - (self.onset + self.duration)) / self.width);
        self.amplitude * (rise - fall)
    }

    /// Time by which the falling edge has fully decayed: `t0 + D + 3w`.
    pub fn end_time(&self) -> f64 {
        self.onset + self.duration + Self::END_MARGIN_WIDTHS * self.width
    }

    /// Hyperpolarising pulses have a negative amplitude.
    pub fn is_inhibitory(&self) -> bool {
        self.amplitude < 0.0
    }
}

impl Default for PulseShape {
    fn default() -> Self {
        Self::REFERENCE
    }
}

/// Injected current sampled on a time grid; read-only once built.
#[derive(Clone, Debug, PartialEq)]
pub struct Stimulus {
    samples: Vec<f64>,
}

impl Stimulus {
    /// Sample `shape` at every grid time.
    pub fn generate(grid: &TimeGrid, shape: &PulseShape) -> Result<Self> {
        shape.validate()?;
        let samples = grid.times().map(|t| shape.current_at(t)).collect();
        Ok(Self { samples })
    }

    /// No injected current.
    pub fn zero(grid: &TimeGrid) -> Self {
        Self {
            samples: vec![0.0; grid.len()],
        }
    }

    /// Arbitrary waveform; must match the grid it will be integrated on.
    pub fn from_samples(grid: &TimeGrid, samples: Vec<f64>) -> Result<Self> {
        if samples.len() != grid.len() {
            return Err(HhError::LengthMismatch {
                expected: grid.len(),
                actual: samples.len(),
            });
        }
        if let Some(&bad) = samples.iter().find(|x| !x.is_finite()) {
            ensure_finite("stimulus sample", bad)?;
        }
        Ok(Self { samples })
    }

    #[inline]
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl AsRef<[f64]> for Stimulus {
    fn as_ref(&self) -> &[f64] {
        &self.samples
    }
}
