//! Calibration configuration.
//!
//! Track-cut curve coefficients, the energy scale, the livetime tick rate
//! and the detector unit roster are instrument calibration, not code. The
//! built-in defaults describe the flight gas pixel detectors; any subset
//! can be overridden from a JSON file.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{Error, Result};

/// Coefficients of the energy-dependent track-quality cut curves.
///
/// With `e` the event energy in keV, the thresholds are:
///
/// ```text
/// pixel_cut(e)    = size_base + (e - size_pivot_kev) * size_slope_per_kev
/// fraction_cut(e) = frac_plateau * (1 - exp(-(e + frac_rise_offset_kev) / frac_rise_scale_kev))
///                   + e * frac_slope_per_kev
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackCuts {
    /// Pixel-count threshold at the pivot energy.
    pub size_base: f64,
    /// Pixel-count threshold growth per keV.
    pub size_slope_per_kev: f64,
    /// Energy at which the pixel-count threshold equals `size_base`.
    pub size_pivot_kev: f64,
    /// Asymptotic value of the fraction threshold.
    pub frac_plateau: f64,
    /// Energy offset of the fraction-threshold rise (keV).
    pub frac_rise_offset_kev: f64,
    /// Energy scale of the fraction-threshold rise (keV).
    pub frac_rise_scale_kev: f64,
    /// Linear fraction-threshold growth per keV.
    pub frac_slope_per_kev: f64,
    /// Maximum accepted track border flag (exclusive).
    pub max_border: i32,
}

impl Default for TrackCuts {
    fn default() -> Self {
        Self {
            size_base: 130.0,
            size_slope_per_kev: 30.0,
            size_pivot_kev: 2.0,
            frac_plateau: 0.8,
            frac_rise_offset_kev: 0.25,
            frac_rise_scale_kev: 1.1,
            frac_slope_per_kev: 0.004,
            max_border: 2,
        }
    }
}

/// Calibration for one observation campaign.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Energy per pulse-invariant channel (keV, default: 0.04).
    pub kev_per_channel: f64,
    /// Livetime tick rate (ticks per second, default: 1e6).
    pub livetime_ticks_per_second: f64,
    /// Detector unit identifiers making up the instrument.
    pub detector_units: Vec<u8>,
    /// Track-quality cut curve coefficients.
    pub track_cuts: TrackCuts,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self::gpd_defaults()
    }
}

// Intermediate structs for the partial-override JSON schema
#[derive(Deserialize)]
struct JsonConfig {
    calibration: JsonCalibration,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct JsonCalibration {
    energy: JsonEnergy,
    livetime: JsonLivetime,
    detector_units: Option<Vec<u8>>,
    track_cuts: JsonTrackCuts,
}

#[derive(Deserialize)]
#[serde(default)]
struct JsonEnergy {
    kev_per_channel: f64,
}

impl Default for JsonEnergy {
    fn default() -> Self {
        Self {
            kev_per_channel: 0.04,
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct JsonLivetime {
    ticks_per_second: f64,
}

impl Default for JsonLivetime {
    fn default() -> Self {
        Self {
            ticks_per_second: 1e6,
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct JsonTrackCuts {
    size_base: f64,
    size_slope_per_kev: f64,
    size_pivot_kev: f64,
    frac_plateau: f64,
    frac_rise_offset_kev: f64,
    frac_rise_scale_kev: f64,
    frac_slope_per_kev: f64,
    max_border: i32,
}

impl Default for JsonTrackCuts {
    fn default() -> Self {
        let cuts = TrackCuts::default();
        Self {
            size_base: cuts.size_base,
            size_slope_per_kev: cuts.size_slope_per_kev,
            size_pivot_kev: cuts.size_pivot_kev,
            frac_plateau: cuts.frac_plateau,
            frac_rise_offset_kev: cuts.frac_rise_offset_kev,
            frac_rise_scale_kev: cuts.frac_rise_scale_kev,
            frac_slope_per_kev: cuts.frac_slope_per_kev,
            max_border: cuts.max_border,
        }
    }
}

impl CalibrationConfig {
    /// Flight gas-pixel-detector defaults: 0.04 keV per channel, microsecond
    /// livetime ticks, detector units 1 to 3, and the standard cut curves.
    #[must_use]
    pub fn gpd_defaults() -> Self {
        Self {
            kev_per_channel: 0.04,
            livetime_ticks_per_second: 1e6,
            detector_units: vec![1, 2, 3],
            track_cuts: TrackCuts::default(),
        }
    }

    /// Loads configuration from a JSON file.
    ///
    /// Any field left out of the file keeps its default, so a file may
    /// override a single coefficient.
    ///
    /// # Errors
    /// Fails on unreadable files, malformed JSON, or values rejected by
    /// [`CalibrationConfig::validate`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let json_config: JsonConfig = serde_json::from_reader(reader)?;
        Self::from_json_config(json_config)
    }

    /// Loads configuration from a JSON string.
    ///
    /// # Errors
    /// Fails on malformed JSON or values rejected by
    /// [`CalibrationConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self> {
        let json_config: JsonConfig = serde_json::from_str(json)?;
        Self::from_json_config(json_config)
    }

    fn from_json_config(config: JsonConfig) -> Result<Self> {
        let calibration = config.calibration;

        let detector_units = match calibration.detector_units {
            Some(units) if !units.is_empty() => units,
            _ => Self::gpd_defaults().detector_units,
        };

        let cuts = calibration.track_cuts;
        let config = Self {
            kev_per_channel: calibration.energy.kev_per_channel,
            livetime_ticks_per_second: calibration.livetime.ticks_per_second,
            detector_units,
            track_cuts: TrackCuts {
                size_base: cuts.size_base,
                size_slope_per_kev: cuts.size_slope_per_kev,
                size_pivot_kev: cuts.size_pivot_kev,
                frac_plateau: cuts.frac_plateau,
                frac_rise_offset_kev: cuts.frac_rise_offset_kev,
                frac_rise_scale_kev: cuts.frac_rise_scale_kev,
                frac_slope_per_kev: cuts.frac_slope_per_kev,
                max_border: cuts.max_border,
            },
        };

        // Validate once at load time (not per-event)
        config.validate()?;
        Ok(config)
    }

    /// Checks the scales that per-event arithmetic divides by.
    ///
    /// # Errors
    /// Returns [`Error::ConfigError`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if !(self.kev_per_channel > 0.0) {
            return Err(Error::ConfigError(format!(
                "kev_per_channel must be positive, got {}",
                self.kev_per_channel
            )));
        }
        if !(self.livetime_ticks_per_second > 0.0) {
            return Err(Error::ConfigError(format!(
                "livetime ticks_per_second must be positive, got {}",
                self.livetime_ticks_per_second
            )));
        }
        if !(self.track_cuts.frac_rise_scale_kev > 0.0) {
            return Err(Error::ConfigError(format!(
                "frac_rise_scale_kev must be positive, got {}",
                self.track_cuts.frac_rise_scale_kev
            )));
        }
        if self.detector_units.is_empty() {
            return Err(Error::ConfigError(
                "detector_units must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Converts a pulse-invariant channel value to keV.
    #[inline]
    #[must_use]
    pub fn channel_to_kev(&self, pi: f64) -> f64 {
        self.kev_per_channel * pi
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gpd_defaults() {
        let config = CalibrationConfig::gpd_defaults();
        assert_eq!(config.kev_per_channel, 0.04);
        assert_eq!(config.livetime_ticks_per_second, 1e6);
        assert_eq!(config.detector_units, vec![1, 2, 3]);
        assert_eq!(config.track_cuts.size_base, 130.0);
        assert_eq!(config.track_cuts.max_border, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_channel_to_kev() {
        let config = CalibrationConfig::gpd_defaults();
        // Channel 50 at 0.04 keV/channel = 2 keV
        assert_eq!(config.channel_to_kev(50.0), 2.0);
    }

    #[test]
    fn test_json_loading() {
        let json = r#"{
            "calibration": {
                "energy": { "kev_per_channel": 0.05 },
                "livetime": { "ticks_per_second": 2.0e6 },
                "detector_units": [1, 2],
                "track_cuts": {
                    "size_base": 120.0,
                    "max_border": 1
                }
            }
        }"#;

        let config = CalibrationConfig::from_json(json).expect("Failed to parse JSON");

        assert_eq!(config.kev_per_channel, 0.05);
        assert_eq!(config.livetime_ticks_per_second, 2.0e6);
        assert_eq!(config.detector_units, vec![1, 2]);
        assert_eq!(config.track_cuts.size_base, 120.0);
        assert_eq!(config.track_cuts.max_border, 1);
        // Untouched coefficients keep their defaults
        assert_eq!(config.track_cuts.frac_plateau, 0.8);
    }

    #[test]
    fn test_json_partial_config_energy_only() {
        let json = r#"{
            "calibration": {
                "energy": { "kev_per_channel": 0.02 }
            }
        }"#;

        let config = CalibrationConfig::from_json(json).expect("Should parse partial config");

        assert_eq!(config.kev_per_channel, 0.02); // Changed
        assert_eq!(config.livetime_ticks_per_second, 1e6); // Default
        assert_eq!(config.detector_units, vec![1, 2, 3]); // Default
        assert_eq!(config.track_cuts, TrackCuts::default()); // Default
    }

    #[test]
    fn test_json_empty_calibration() {
        let json = r#"{ "calibration": {} }"#;

        let config = CalibrationConfig::from_json(json).expect("Should parse minimal config");
        assert_eq!(config, CalibrationConfig::gpd_defaults());
    }

    #[test]
    fn test_json_empty_detector_units_falls_back() {
        let json = r#"{
            "calibration": { "detector_units": [] }
        }"#;

        let config = CalibrationConfig::from_json(json).expect("Should parse");
        assert_eq!(config.detector_units, vec![1, 2, 3]);
    }

    #[test]
    fn test_json_rejects_bad_scale() {
        let json = r#"{
            "calibration": {
                "livetime": { "ticks_per_second": 0.0 }
            }
        }"#;

        let result = CalibrationConfig::from_json(json);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(
            err.contains("ticks_per_second"),
            "Error should name the field: {err}"
        );
    }
}
