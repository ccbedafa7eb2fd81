//! Good-time-interval masking.

use log::warn;
use polarpix_core::GtiList;

/// Masks timestamps to the union of the good-time intervals.
///
/// The result is the logical OR of each interval's half-open range mask,
/// so overlapping intervals are tolerated. An empty list yields an
/// all-false mask, meaning zero livetime; that is logged as a warning but
/// is not an error.
#[must_use]
pub fn gti_mask(times: &[f64], gti: &GtiList) -> Vec<bool> {
    if gti.is_empty() {
        warn!("empty GTI list: masking out all {} samples", times.len());
        return vec![false; times.len()];
    }
    let mut mask = vec![false; times.len()];
    for interval in gti.intervals() {
        for (flag, &t) in mask.iter_mut().zip(times) {
            *flag = *flag || interval.contains(t);
        }
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_is_union_of_intervals() {
        let gti = GtiList::from_bounds(&[0.0, 20.0], &[10.0, 30.0]).unwrap();
        let times = [5.0, 10.0, 15.0, 20.0, 29.999, 30.0];
        let mask = gti_mask(&times, &gti);
        assert_eq!(mask, vec![true, false, false, true, true, false]);
    }

    #[test]
    fn test_overlapping_intervals_tolerated() {
        let gti = GtiList::from_bounds(&[0.0, 5.0], &[10.0, 15.0]).unwrap();
        let mask = gti_mask(&[7.0, 12.0, 20.0], &gti);
        assert_eq!(mask, vec![true, true, false]);
    }

    #[test]
    fn test_empty_gti_masks_everything() {
        let mask = gti_mask(&[1.0, 2.0, 3.0], &GtiList::default());
        assert_eq!(mask, vec![false, false, false]);
    }
}
