//! Energy-dependent track-quality cuts.
//!
//! Source photons produce compact, fully-contained charge tracks;
//! background triggers tend to be larger, more fragmented, or clipped at
//! the detector edge. Both thresholds grow with event energy, so each is
//! evaluated per event against the pulse-invariant channel.

use polarpix_core::{CalibrationConfig, Error, Result, TrackCuts};

/// Classifies events as source-like or background-like.
///
/// Holds the energy scale and cut-curve coefficients from a
/// [`CalibrationConfig`]; construction is cheap and the classifier is
/// immutable, so one instance serves a whole observation.
#[derive(Debug, Clone)]
pub struct TrackClassifier {
    kev_per_channel: f64,
    cuts: TrackCuts,
}

impl TrackClassifier {
    /// Builds a classifier from calibration.
    #[must_use]
    pub fn new(config: &CalibrationConfig) -> Self {
        Self {
            kev_per_channel: config.kev_per_channel,
            cuts: config.track_cuts.clone(),
        }
    }

    /// Pixel-count threshold at channel `pi` (exclusive upper bound).
    #[must_use]
    pub fn pixel_cut(&self, pi: f64) -> f64 {
        let energy = self.kev_per_channel * pi;
        self.cuts.size_base + (energy - self.cuts.size_pivot_kev) * self.cuts.size_slope_per_kev
    }

    /// Event-fraction threshold at channel `pi` (exclusive lower bound).
    #[must_use]
    pub fn fraction_cut(&self, pi: f64) -> f64 {
        let energy = self.kev_per_channel * pi;
        let rise = 1.0
            - (-(energy + self.cuts.frac_rise_offset_kev) / self.cuts.frac_rise_scale_kev).exp();
        self.cuts.frac_plateau * rise + energy * self.cuts.frac_slope_per_kev
    }

    /// Evaluates the full cut for one event.
    ///
    /// Source-like means: fraction above its threshold but below one,
    /// pixel count below its threshold, and border flag below the limit.
    #[must_use]
    pub fn is_source(&self, pi: f32, num_pix: i32, evt_fra: f32, trk_bord: i32) -> bool {
        let pi = f64::from(pi);
        let evt_fra = f64::from(evt_fra);
        evt_fra > self.fraction_cut(pi)
            && evt_fra < 1.0
            && f64::from(num_pix) < self.pixel_cut(pi)
            && trk_bord < self.cuts.max_border
    }

    /// Classifies a batch of joined events; `true` means source-like.
    ///
    /// # Errors
    /// Returns [`Error::LengthMismatch`] if the arrays disagree in length.
    pub fn classify(
        &self,
        pi: &[f32],
        num_pix: &[i32],
        evt_fra: &[f32],
        trk_bord: &[i32],
    ) -> Result<Vec<bool>> {
        if num_pix.len() != pi.len() {
            return Err(Error::LengthMismatch {
                context: "PI vs NUM_PIX",
                left: pi.len(),
                right: num_pix.len(),
            });
        }
        if evt_fra.len() != pi.len() {
            return Err(Error::LengthMismatch {
                context: "PI vs EVT_FRA",
                left: pi.len(),
                right: evt_fra.len(),
            });
        }
        if trk_bord.len() != pi.len() {
            return Err(Error::LengthMismatch {
                context: "PI vs TRK_BORD",
                left: pi.len(),
                right: trk_bord.len(),
            });
        }
        Ok((0..pi.len())
            .map(|i| self.is_source(pi[i], num_pix[i], evt_fra[i], trk_bord[i]))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn classifier() -> TrackClassifier {
        TrackClassifier::new(&CalibrationConfig::gpd_defaults())
    }

    #[test]
    fn test_pixel_cut_curve() {
        let c = classifier();
        // Channel 50 = 2 keV, the pivot: threshold equals the base
        assert_relative_eq!(c.pixel_cut(50.0), 130.0);
        // Channel 100 = 4 keV: 130 + 2 * 30 = 190
        assert_relative_eq!(c.pixel_cut(100.0), 190.0);
    }

    #[test]
    fn test_fraction_cut_curve() {
        let c = classifier();
        // Channel 50 = 2 keV:
        // 0.8 * (1 - exp(-2.25 / 1.1)) + 2 * 0.004
        let expected = 2.25_f64 / 1.1;
        let expected = 0.8 * (1.0 - (-expected).exp()) + 0.008;
        assert_relative_eq!(c.fraction_cut(50.0), expected, max_relative = 1e-12);
    }

    #[test]
    fn test_is_source_requires_all_cuts() {
        let c = classifier();
        // Channel 50: fraction_cut ~0.704, pixel_cut 130
        assert!(c.is_source(50.0, 100, 0.75, 0));
        // Fraction at or below its threshold
        assert!(!c.is_source(50.0, 100, 0.60, 0));
        // Fraction not below one
        assert!(!c.is_source(50.0, 100, 1.0, 0));
        // Too many pixels
        assert!(!c.is_source(50.0, 130, 0.75, 0));
        // Border-clipped track
        assert!(!c.is_source(50.0, 100, 0.75, 2));
    }

    #[test]
    fn test_fraction_plateau_excludes_everything() {
        let c = classifier();
        // Channel 1300 = 52 keV: 0.8 + 52 * 0.004 > 1, so no fraction
        // can sit above the threshold and below one at the same time
        assert!(c.fraction_cut(1300.0) >= 1.0);
        for evt_fra in [0.5, 0.9, 0.999, 1.0, 1.5] {
            assert!(!c.is_source(1300.0, 1, evt_fra, 0));
        }
    }

    #[test]
    fn test_classify_batch() {
        let c = classifier();
        let mask = c
            .classify(
                &[50.0, 50.0, 50.0],
                &[100, 500, 100],
                &[0.75, 0.75, 0.10],
                &[0, 0, 0],
            )
            .unwrap();
        assert_eq!(mask, vec![true, false, false]);
    }

    #[test]
    fn test_classify_length_mismatch() {
        let c = classifier();
        let err = c
            .classify(&[50.0, 60.0], &[100], &[0.7, 0.7], &[0, 0])
            .unwrap_err();
        assert!(matches!(err, Error::LengthMismatch { .. }));
    }
}
