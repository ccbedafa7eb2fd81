//! Livetime accumulation over a time grid.
//!
//! Each level-1 trigger carries the livetime accumulated since the
//! previous trigger, in raw detector ticks. Binning those increments over
//! the split grid, restricted to good time, gives the livetime to stamp
//! on each output file.

use polarpix_core::{Error, Result, TimeGrid};

/// A one-dimensional weighted histogram over a uniform time grid.
///
/// Bins follow the grid convention: half-open, last bin closed on the
/// right. Samples outside the grid are dropped silently.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeHistogram {
    grid: TimeGrid,
    content: Vec<f64>,
}

impl TimeHistogram {
    /// Creates an empty histogram over the grid.
    #[must_use]
    pub fn new(grid: TimeGrid) -> Self {
        let content = vec![0.0; grid.n_bins()];
        Self { grid, content }
    }

    /// Returns the underlying grid.
    #[must_use]
    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    /// Returns the per-bin content.
    #[must_use]
    pub fn content(&self) -> &[f64] {
        &self.content
    }

    /// Returns the content of bin `i`.
    ///
    /// # Panics
    /// Panics if `i >= n_bins()`.
    #[inline]
    #[must_use]
    pub fn bin_content(&self, i: usize) -> f64 {
        self.content[i]
    }

    /// Returns the sum over all bins.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.content.iter().sum()
    }

    /// Adds `weight` at time `t`; out-of-range samples are dropped.
    pub fn fill(&mut self, t: f64, weight: f64) {
        if let Some(i) = self.grid.bin_index(t) {
            self.content[i] += weight;
        }
    }

    /// Fills from parallel sample/weight arrays.
    ///
    /// # Errors
    /// Returns [`Error::LengthMismatch`] if the arrays disagree.
    pub fn fill_all(&mut self, times: &[f64], weights: &[f64]) -> Result<()> {
        if times.len() != weights.len() {
            return Err(Error::LengthMismatch {
                context: "histogram times vs weights",
                left: times.len(),
                right: weights.len(),
            });
        }
        for (&t, &w) in times.iter().zip(weights) {
            self.fill(t, w);
        }
        Ok(())
    }
}

/// Accumulates per-bin livetime in seconds.
///
/// Samples failing `mask` contribute nothing; the tick-to-second
/// conversion happens at the fill site so bin contents come out in
/// seconds.
///
/// # Errors
/// Returns [`Error::LengthMismatch`] if `times`, `ticks` and `mask`
/// disagree in length.
pub fn accumulate_livetime(
    grid: &TimeGrid,
    times: &[f64],
    ticks: &[i32],
    mask: &[bool],
    ticks_per_second: f64,
) -> Result<TimeHistogram> {
    if ticks.len() != times.len() {
        return Err(Error::LengthMismatch {
            context: "livetime times vs ticks",
            left: times.len(),
            right: ticks.len(),
        });
    }
    if mask.len() != times.len() {
        return Err(Error::LengthMismatch {
            context: "livetime times vs mask",
            left: times.len(),
            right: mask.len(),
        });
    }
    let mut histogram = TimeHistogram::new(grid.clone());
    for ((&t, &dt), &keep) in times.iter().zip(ticks).zip(mask) {
        if keep {
            histogram.fill(t, f64::from(dt) / ticks_per_second);
        }
    }
    Ok(histogram)
}
