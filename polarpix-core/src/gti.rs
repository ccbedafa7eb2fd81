//! Good-time intervals.
//!
//! A good-time interval (GTI) is a half-open window `[start, stop)` during
//! which the detector data are scientifically valid. Observations carry a
//! sorted sequence of them; everything outside contributes no livetime.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A single half-open validity window `[start, stop)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gti {
    /// Window start (seconds, inclusive).
    pub start: f64,
    /// Window stop (seconds, exclusive).
    pub stop: f64,
}

impl Gti {
    /// Creates a new interval.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInterval`] unless `stop > start`.
    pub fn new(start: f64, stop: f64) -> Result<Self> {
        if stop > start {
            Ok(Self { start, stop })
        } else {
            Err(Error::InvalidInterval { start, stop })
        }
    }

    /// Returns true if `t` lies in `[start, stop)`.
    #[inline]
    #[must_use]
    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t < self.stop
    }

    /// Returns the window span in seconds.
    #[inline]
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.stop - self.start
    }
}

/// An ordered sequence of good-time intervals.
///
/// Construction sorts the intervals by start time. Overlaps are tolerated;
/// membership is the union of the individual windows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GtiList {
    intervals: Vec<Gti>,
}

impl GtiList {
    /// Creates a list from already-built intervals, sorting by start time.
    #[must_use]
    pub fn new(mut intervals: Vec<Gti>) -> Self {
        intervals.sort_by(|a, b| a.start.total_cmp(&b.start));
        Self { intervals }
    }

    /// Creates a list from parallel start/stop arrays.
    ///
    /// # Errors
    /// Returns [`Error::LengthMismatch`] if the arrays disagree in length,
    /// or [`Error::InvalidInterval`] for any pair with `stop <= start`.
    pub fn from_bounds(starts: &[f64], stops: &[f64]) -> Result<Self> {
        if starts.len() != stops.len() {
            return Err(Error::LengthMismatch {
                context: "GTI start/stop arrays",
                left: starts.len(),
                right: stops.len(),
            });
        }
        let mut intervals = Vec::with_capacity(starts.len());
        for (&start, &stop) in starts.iter().zip(stops) {
            intervals.push(Gti::new(start, stop)?);
        }
        Ok(Self::new(intervals))
    }

    /// Returns the intervals, sorted by start time.
    #[must_use]
    pub fn intervals(&self) -> &[Gti] {
        &self.intervals
    }

    /// Returns the number of intervals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Returns true if the list holds no intervals.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Returns true if `t` lies inside any interval.
    #[must_use]
    pub fn contains(&self, t: f64) -> bool {
        self.intervals.iter().any(|gti| gti.contains(t))
    }

    /// Total exposure in seconds (sum of window spans, overlaps counted twice).
    #[must_use]
    pub fn exposure(&self) -> f64 {
        self.intervals.iter().map(Gti::duration).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gti_half_open() {
        let gti = Gti::new(10.0, 20.0).unwrap();
        assert!(gti.contains(10.0));
        assert!(gti.contains(19.999));
        assert!(!gti.contains(20.0));
        assert!(!gti.contains(9.999));
    }

    #[test]
    fn test_gti_rejects_inverted() {
        assert!(Gti::new(20.0, 10.0).is_err());
        assert!(Gti::new(10.0, 10.0).is_err());
    }

    #[test]
    fn test_gti_list_sorted_on_construction() {
        let list = GtiList::from_bounds(&[30.0, 0.0], &[40.0, 10.0]).unwrap();
        assert_eq!(list.intervals()[0].start, 0.0);
        assert_eq!(list.intervals()[1].start, 30.0);
    }

    #[test]
    fn test_gti_list_membership_and_exposure() {
        let list = GtiList::from_bounds(&[0.0, 30.0], &[10.0, 40.0]).unwrap();
        assert!(list.contains(5.0));
        assert!(!list.contains(10.0));
        assert!(!list.contains(20.0));
        assert!(list.contains(30.0));
        // 10 + 10 seconds of exposure
        assert_eq!(list.exposure(), 20.0);
    }

    #[test]
    fn test_gti_list_length_mismatch() {
        let result = GtiList::from_bounds(&[0.0, 1.0], &[2.0]);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_gti_list() {
        let list = GtiList::default();
        assert!(list.is_empty());
        assert!(!list.contains(0.0));
        assert_eq!(list.exposure(), 0.0);
    }
}
