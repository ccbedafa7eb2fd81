//! Structure of Arrays (`SoA`) batches for event stream samples.
//!
//! This module defines the per-level sample batches in parallel vectors
//! (`SoA` layout) rather than arrays of structs (`AoS`). Cut evaluation and
//! histogram filling sweep one column at a time, so this layout keeps the
//! hot loops cache-friendly.

use serde::{Deserialize, Serialize};

/// A batch of level-1 trigger samples in `SoA` format.
///
/// Level-1 data carries the track-shape descriptors and the per-trigger
/// livetime increment (raw detector ticks). One detector unit's level-1
/// stream may span several files; batches from consecutive files are
/// concatenated with [`Level1Batch::append`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Level1Batch {
    /// Columnar storage for event timestamps (seconds).
    pub time: Vec<f64>,
    /// Columnar storage for track pixel counts.
    pub num_pix: Vec<i32>,
    /// Columnar storage for the event fraction metric.
    pub evt_fra: Vec<f32>,
    /// Columnar storage for the track border flag.
    pub trk_bord: Vec<i32>,
    /// Columnar storage for livetime increments (raw ticks).
    pub livetime: Vec<i32>,
}

impl Level1Batch {
    /// Creates a new empty batch with specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            time: Vec::with_capacity(capacity),
            num_pix: Vec::with_capacity(capacity),
            evt_fra: Vec::with_capacity(capacity),
            trk_bord: Vec::with_capacity(capacity),
            livetime: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of samples in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Returns true if the batch is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Clears all vectors in the batch.
    pub fn clear(&mut self) {
        self.time.clear();
        self.num_pix.clear();
        self.evt_fra.clear();
        self.trk_bord.clear();
        self.livetime.clear();
    }

    /// Appends all samples from another batch to this one.
    pub fn append(&mut self, other: &Level1Batch) {
        self.time.extend_from_slice(&other.time);
        self.num_pix.extend_from_slice(&other.num_pix);
        self.evt_fra.extend_from_slice(&other.evt_fra);
        self.trk_bord.extend_from_slice(&other.trk_bord);
        self.livetime.extend_from_slice(&other.livetime);
    }

    /// Pushes a single sample into the batch.
    pub fn push(&mut self, time: f64, num_pix: i32, evt_fra: f32, trk_bord: i32, livetime: i32) {
        self.time.push(time);
        self.num_pix.push(num_pix);
        self.evt_fra.push(evt_fra);
        self.trk_bord.push(trk_bord);
        self.livetime.push(livetime);
    }
}

/// The classification-relevant columns of a level-2 event batch.
///
/// Level-2 files carry more columns (spatial coordinates, charge channels);
/// those travel through the table layer untouched so subsetting preserves
/// them bit-for-bit. Only the timestamp and the energy channel participate
/// in classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Level2Batch {
    /// Columnar storage for event timestamps (seconds).
    pub time: Vec<f64>,
    /// Columnar storage for the pulse-invariant energy channel.
    pub pi: Vec<f32>,
}

impl Level2Batch {
    /// Creates a new empty batch with specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            time: Vec::with_capacity(capacity),
            pi: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of events in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Returns true if the batch is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Clears all vectors in the batch.
    pub fn clear(&mut self) {
        self.time.clear();
        self.pi.clear();
    }

    /// Appends all events from another batch to this one.
    pub fn append(&mut self, other: &Level2Batch) {
        self.time.extend_from_slice(&other.time);
        self.pi.extend_from_slice(&other.pi);
    }

    /// Pushes a single event into the batch.
    pub fn push(&mut self, time: f64, pi: f32) {
        self.time.push(time);
        self.pi.push(pi);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level1_batch_operations() {
        let mut batch = Level1Batch::with_capacity(10);
        assert!(batch.is_empty());

        batch.push(100.5, 42, 0.73, 0, 1_050);
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.num_pix[0], 42);
        assert_eq!(batch.livetime[0], 1_050);

        batch.push(100.7, 55, 0.81, 1, 990);
        assert_eq!(batch.len(), 2);

        batch.clear();
        assert!(batch.is_empty());
        assert_eq!(batch.len(), 0);
    }

    #[test]
    fn test_level1_batch_append() {
        let mut first = Level1Batch::default();
        first.push(1.0, 10, 0.5, 0, 100);

        let mut second = Level1Batch::default();
        second.push(2.0, 20, 0.6, 1, 200);
        second.push(3.0, 30, 0.7, 0, 300);

        first.append(&second);
        assert_eq!(first.len(), 3);
        assert_eq!(first.time, vec![1.0, 2.0, 3.0]);
        assert_eq!(first.livetime, vec![100, 200, 300]);
    }

    #[test]
    fn test_level2_batch_operations() {
        let mut batch = Level2Batch::with_capacity(4);
        batch.push(10.0, 120.0);
        batch.push(11.0, 95.5);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.pi[1], 95.5);

        batch.clear();
        assert!(batch.is_empty());
    }
}
