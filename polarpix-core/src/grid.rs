//! Uniform time grids for observation splitting.
//!
//! A grid derives from the observation bounds and a target bin duration:
//! the bin count is the largest integer number of target-duration bins that
//! fit in the span, and the edges are then re-spaced so the bins exactly
//! tile `[t0, t1]`. The actual bin width may therefore exceed the request
//! by up to one part in the bin count.
//!
//! Bins are half-open `[edge[i], edge[i+1])`; the final bin is closed on
//! the right so a sample at exactly `t1` still lands in the grid.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A uniform time grid of `n + 1` edges spanning an observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeGrid {
    edges: Vec<f64>,
}

impl TimeGrid {
    /// Builds a grid over `[t0, t1]` from a target bin duration.
    ///
    /// The bin count is `floor((t1 - t0) / duration)`; edges are linearly
    /// spaced with the first edge exactly `t0` and the last exactly `t1`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidGrid`] when no whole bin fits: inverted or
    /// degenerate bounds, a non-positive duration, or a duration longer
    /// than the observation span.
    pub fn with_bin_size(t0: f64, t1: f64, duration: f64) -> Result<Self> {
        let invalid = Error::InvalidGrid { t0, t1, duration };
        if !(t1 > t0) || !(duration > 0.0) {
            return Err(invalid);
        }
        let span = t1 - t0;
        let n = (span / duration).floor();
        if n < 1.0 || !n.is_finite() {
            return Err(invalid);
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let n = n as usize;
        let mut edges: Vec<f64> = (0..n)
            .map(|i| t0 + span * (i as f64) / (n as f64))
            .collect();
        edges.push(t1);
        Ok(Self { edges })
    }

    /// Returns the bin edges, first exactly `t0`, last exactly `t1`.
    #[must_use]
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Returns the number of bins.
    #[must_use]
    pub fn n_bins(&self) -> usize {
        self.edges.len() - 1
    }

    /// Returns the first edge.
    #[inline]
    #[must_use]
    pub fn start(&self) -> f64 {
        self.edges[0]
    }

    /// Returns the last edge.
    #[inline]
    #[must_use]
    pub fn stop(&self) -> f64 {
        self.edges[self.edges.len() - 1]
    }

    /// Returns the uniform bin width in seconds.
    #[must_use]
    pub fn bin_width(&self) -> f64 {
        (self.stop() - self.start()) / self.n_bins() as f64
    }

    /// Returns the `[low, high]` bounds of bin `i`.
    ///
    /// # Panics
    /// Panics if `i >= n_bins()`.
    #[must_use]
    pub fn bin_bounds(&self, i: usize) -> (f64, f64) {
        (self.edges[i], self.edges[i + 1])
    }

    /// Maps a timestamp to its bin index.
    ///
    /// Bins are half-open except the last, which is closed on the right.
    /// Timestamps outside `[t0, t1]` map to `None`.
    #[must_use]
    pub fn bin_index(&self, t: f64) -> Option<usize> {
        if t < self.start() || t > self.stop() || t.is_nan() {
            return None;
        }
        let n = self.n_bins();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let mut i = (((t - self.start()) / self.bin_width()) as usize).min(n - 1);
        // Division can land one bin off at edges; fix against the stored edges.
        while i > 0 && t < self.edges[i] {
            i -= 1;
        }
        while i + 1 < n && t >= self.edges[i + 1] {
            i += 1;
        }
        Some(i)
    }

    /// Partitions timestamps into per-bin index lists.
    ///
    /// Timestamps outside the grid are dropped silently, matching the
    /// accumulation rule used for livetime.
    #[must_use]
    pub fn partition(&self, times: &[f64]) -> Vec<Vec<usize>> {
        let mut bins = vec![Vec::new(); self.n_bins()];
        for (row, &t) in times.iter().enumerate() {
            if let Some(i) = self.bin_index(t) {
                bins[i].push(row);
            }
        }
        bins
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_with_bin_size_respaces_edges() {
        // 100 s span / 30 s target -> 3 bins of 33.33 s
        let grid = TimeGrid::with_bin_size(0.0, 100.0, 30.0).unwrap();
        assert_eq!(grid.n_bins(), 3);
        let edges = grid.edges();
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[0], 0.0);
        assert_relative_eq!(edges[1], 100.0 / 3.0, max_relative = 1e-12);
        assert_relative_eq!(edges[2], 200.0 / 3.0, max_relative = 1e-12);
        assert_eq!(edges[3], 100.0);
    }

    #[test]
    fn test_with_bin_size_exact_fit() {
        let grid = TimeGrid::with_bin_size(10.0, 40.0, 10.0).unwrap();
        assert_eq!(grid.n_bins(), 3);
        assert_eq!(grid.start(), 10.0);
        assert_eq!(grid.stop(), 40.0);
        assert_relative_eq!(grid.bin_width(), 10.0);
    }

    #[test]
    fn test_with_bin_size_rejects_oversized_bin() {
        // 10 s span cannot hold a 20 s bin
        let err = TimeGrid::with_bin_size(0.0, 10.0, 20.0).unwrap_err();
        assert!(matches!(err, Error::InvalidGrid { .. }));
    }

    #[test]
    fn test_with_bin_size_rejects_bad_bounds() {
        assert!(TimeGrid::with_bin_size(10.0, 0.0, 1.0).is_err());
        assert!(TimeGrid::with_bin_size(0.0, 10.0, 0.0).is_err());
        assert!(TimeGrid::with_bin_size(0.0, 10.0, -1.0).is_err());
        assert!(TimeGrid::with_bin_size(5.0, 5.0, 1.0).is_err());
    }

    #[test]
    fn test_bin_index_half_open() {
        let grid = TimeGrid::with_bin_size(0.0, 30.0, 10.0).unwrap();
        assert_eq!(grid.bin_index(0.0), Some(0));
        assert_eq!(grid.bin_index(9.999), Some(0));
        assert_eq!(grid.bin_index(10.0), Some(1));
        assert_eq!(grid.bin_index(29.999), Some(2));
        // Last bin is closed on the right
        assert_eq!(grid.bin_index(30.0), Some(2));
        assert_eq!(grid.bin_index(-0.001), None);
        assert_eq!(grid.bin_index(30.001), None);
    }

    #[test]
    fn test_partition_drops_out_of_range() {
        let grid = TimeGrid::with_bin_size(0.0, 20.0, 10.0).unwrap();
        let bins = grid.partition(&[-1.0, 0.0, 5.0, 10.0, 20.0, 25.0]);
        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0], vec![1, 2]);
        assert_eq!(bins[1], vec![3, 4]);
    }
}
