//! Exact-timestamp stream alignment.
//!
//! Level-1 and level-2 streams sample the same clock but drop different
//! events, so rows are matched by timestamp value, not by position. The
//! join key is exact bit-level `f64` equality; there is no tolerance.
//!
//! A timestamp occurring more than once within one stream makes the
//! correspondence ambiguous. The first occurrence wins and the ambiguity
//! is logged, never silently discarded.

use log::warn;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

/// Index correspondences between two streams sharing a clock.
///
/// The three vectors run in parallel: `times[k]` occurs at `left[k]` in
/// the left stream and `right[k]` in the right stream. Timestamps are
/// sorted ascending and unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeMatch {
    /// Matched timestamps, sorted ascending.
    pub times: Vec<f64>,
    /// First-occurrence index of each timestamp in the left stream.
    pub left: Vec<usize>,
    /// First-occurrence index of each timestamp in the right stream.
    pub right: Vec<usize>,
}

impl TimeMatch {
    /// Returns the number of matched timestamps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Returns true if the streams share no timestamp.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// Intersects two timestamp arrays.
///
/// Returns the sorted set of values present in both arrays with the
/// first-occurrence index on each side. Neither input needs to be sorted.
/// An empty intersection is a valid result, not an error.
#[must_use]
pub fn match_times(left: &[f64], right: &[f64]) -> TimeMatch {
    let mut first_left: HashMap<u64, usize> = HashMap::with_capacity(left.len());
    let mut dup_left: HashSet<u64> = HashSet::new();
    for (i, &t) in left.iter().enumerate() {
        match first_left.entry(t.to_bits()) {
            Entry::Vacant(slot) => {
                slot.insert(i);
            }
            Entry::Occupied(_) => {
                dup_left.insert(t.to_bits());
            }
        }
    }

    let mut matched: HashSet<u64> = HashSet::new();
    let mut ambiguous: HashSet<u64> = HashSet::new();
    let mut rows: Vec<(f64, usize, usize)> = Vec::new();
    for (j, &t) in right.iter().enumerate() {
        let bits = t.to_bits();
        let Some(&i) = first_left.get(&bits) else {
            continue;
        };
        if matched.insert(bits) {
            if dup_left.contains(&bits) {
                ambiguous.insert(bits);
            }
            rows.push((t, i, j));
        } else {
            ambiguous.insert(bits);
        }
    }
    if !ambiguous.is_empty() {
        warn!(
            "{} matched timestamps occur more than once in a stream; keeping first occurrences",
            ambiguous.len()
        );
    }

    rows.sort_by(|a, b| a.0.total_cmp(&b.0));
    let mut result = TimeMatch {
        times: Vec::with_capacity(rows.len()),
        left: Vec::with_capacity(rows.len()),
        right: Vec::with_capacity(rows.len()),
    };
    for (t, i, j) in rows {
        result.times.push(t);
        result.left.push(i);
        result.right.push(j);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_join_is_identity() {
        let times = [4.0, 1.0, 3.0, 2.0];
        let matched = match_times(&times, &times);
        assert_eq!(matched.times, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(matched.left, vec![1, 3, 2, 0]);
        assert_eq!(matched.right, vec![1, 3, 2, 0]);
    }

    #[test]
    fn test_partial_overlap() {
        let left = [10.0, 20.0, 30.0, 40.0];
        let right = [40.0, 15.0, 20.0];
        let matched = match_times(&left, &right);
        assert_eq!(matched.times, vec![20.0, 40.0]);
        assert_eq!(matched.left, vec![1, 3]);
        assert_eq!(matched.right, vec![2, 0]);
    }

    #[test]
    fn test_empty_intersection_is_valid() {
        let matched = match_times(&[1.0, 2.0], &[3.0, 4.0]);
        assert!(matched.is_empty());
        assert_eq!(matched.len(), 0);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(match_times(&[], &[1.0]).is_empty());
        assert!(match_times(&[1.0], &[]).is_empty());
    }

    #[test]
    fn test_duplicates_keep_first_occurrence() {
        let left = [5.0, 7.0, 5.0];
        let right = [9.0, 5.0, 5.0, 7.0];
        let matched = match_times(&left, &right);
        assert_eq!(matched.times, vec![5.0, 7.0]);
        // Index 0 on the left, index 1 on the right: first occurrences
        assert_eq!(matched.left, vec![0, 1]);
        assert_eq!(matched.right, vec![1, 3]);
    }

    #[test]
    fn test_exact_equality_no_tolerance() {
        let base = 1000.0_f64;
        let nudged = f64::from_bits(base.to_bits() + 1);
        let matched = match_times(&[base], &[nudged]);
        assert!(matched.is_empty());
    }
}
