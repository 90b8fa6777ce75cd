//! Uniform time grid: `t[i] = i * dt` for `i` in `0..N`, `N = ceil(T / dt)`.

use crate::error::{ensure_positive, HhError, Result};

/// Rounding slack, in units of `f64::EPSILON` relative to the ratio, within which
/// `T / dt` counts as an exact integer.
const RATIO_SNAP_ULPS: f64 = 4.0;

/// Largest grid accepted; every per-sample buffer is allocated up front.
pub const MAX_SAMPLES: usize = 100_000_000;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeGrid {
    duration: f64,
    dt: f64,
    len: usize,
}

impl TimeGrid {
    /// Validate `duration` and `dt` and size the grid. Nothing is allocated.
    pub fn new(duration: f64, dt: f64) -> Result<Self> {
        ensure_positive("duration", duration)?;
        ensure_positive("dt", dt)?;
        let len = sample_count(duration / dt).ok_or(HhError::InvalidConfig {
            field: "dt",
            value: dt,
            reason: "yields more samples than MAX_SAMPLES",
        })?;
        Ok(Self { duration, dt, len })
    }

    #[inline]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    #[inline]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Number of samples. Always at least one.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Time of sample `index` (ms).
    #[inline]
    pub fn time(&self, index: usize) -> f64 {
        index as f64 * self.dt
    }

    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len).map(move |i| self.time(i))
    }
}

/// `ceil(ratio)`, snapping ratios within a few ulps of an integer (`0.3 / 0.1`)
/// onto that integer. `None` above [`MAX_SAMPLES`].
pub(crate) fn sample_count(ratio: f64) -> Option<usize> {
    if !ratio.is_finite() || ratio <= 0.0 {
        return None;
    }
    let nearest = ratio.round();
    let slack = RATIO_SNAP_ULPS * f64::EPSILON * nearest.max(1.0);
    let count = if (ratio - nearest).abs() <= slack {
        nearest
    } else {
        ratio.ceil()
    };
    if count > MAX_SAMPLES as f64 {
        return None;
    }
    Some((count as usize).max(1))
}
