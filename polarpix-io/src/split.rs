//! Time-resolved splitting of an observation.
//!
//! A common grid spans the observation; each detector unit's level-2
//! events are partitioned into per-bin files, and every output is stamped
//! with the live seconds its bin actually accumulated, counted from the
//! level-1 stream through the good-time intervals.

use log::{info, warn};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

use polarpix_algorithms::{accumulate_livetime, gti_mask};
use polarpix_core::{CalibrationConfig, TimeGrid};
use polarpix_evt::{read_file, write_file};

use crate::discovery::{ObservationTree, UnitFiles};
use crate::error::Result;
use crate::filter::suffixed_path;
use crate::friend::UnitData;
use crate::update::update_livetime;

/// Outcome of splitting one detector unit.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitReport {
    /// Detector unit number.
    pub du: u8,
    /// Files written, one per grid bin.
    pub paths: Vec<PathBuf>,
    /// Live seconds accumulated over the whole grid.
    pub livetime: f64,
}

/// Outcome of splitting a whole observation.
#[derive(Debug)]
pub struct SplitReport {
    /// The grid every unit was split on.
    pub grid: TimeGrid,
    /// Per-unit outcome, in detector-unit order.
    pub units: Vec<(u8, Result<UnitReport>)>,
}

impl SplitReport {
    /// Returns true if any unit failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.units.iter().any(|(_, outcome)| outcome.is_err())
    }
}

/// Splits every detector unit of an observation on a common time grid.
///
/// The grid spans `TSTART`..`TSTOP` of the first discovered unit with bins
/// of `duration` seconds. Units are processed in parallel; a failing unit
/// is reported in the result and does not stop the others.
///
/// # Errors
/// Fails when no unit can be discovered, the reference level-2 file cannot
/// be read, or the grid is invalid.
pub fn split_observation(
    root: &Path,
    duration: f64,
    config: &CalibrationConfig,
) -> Result<SplitReport> {
    let tree = ObservationTree::discover(root, &config.detector_units)?;
    let reference = read_file(&tree.units()[0].level2)?;
    let grid = TimeGrid::with_bin_size(reference.tstart()?, reference.tstop()?, duration)?;
    info!(
        "splitting {} detector units into {} bins of {:.3} s",
        tree.units().len(),
        grid.n_bins(),
        grid.bin_width()
    );

    let units = tree
        .units()
        .par_iter()
        .map(|files| (files.du, split_unit(files, &grid, config)))
        .collect();
    Ok(SplitReport { grid, units })
}

/// Splits one unit's level-2 file into per-bin files with fresh livetimes.
fn split_unit(
    files: &UnitFiles,
    grid: &TimeGrid,
    config: &CalibrationConfig,
) -> Result<UnitReport> {
    let unit = UnitData::load(files)?;
    let mask = gti_mask(&unit.level1.time, &unit.gti);
    let histogram = accumulate_livetime(
        grid,
        &unit.level1.time,
        &unit.level1.livetime,
        &mask,
        config.livetime_ticks_per_second,
    )?;

    let times = unit.level2.level2_batch()?.time;
    let bins = grid.partition(&times);
    let mut paths = Vec::with_capacity(bins.len());
    for (i, rows) in bins.iter().enumerate() {
        if rows.is_empty() {
            let (start, stop) = grid.bin_bounds(i);
            warn!("DU {}: no events in bin {i} [{start}, {stop})", files.du);
        }
        let subset = unit.level2.select_events(rows)?;
        let path = bin_output_path(&unit.path, i)?;
        write_file(&subset, &path)?;
        update_livetime(&path, histogram.bin_content(i))?;
        paths.push(path);
    }
    info!(
        "DU {}: {} bins, {:.3} live seconds",
        files.du,
        paths.len(),
        histogram.total()
    );
    Ok(UnitReport {
        du: files.du,
        paths,
        livetime: histogram.total(),
    })
}

/// Derives the output path for bin `i`: `stem_tbin_NNNNN.<ext>`.
///
/// # Errors
/// Returns [`crate::Error::BadOutputPath`] for paths without a decodable
/// stem.
pub fn bin_output_path(input: &Path, i: usize) -> Result<PathBuf> {
    suffixed_path(input, &format!("tbin_{i:05}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_output_path() {
        let path = bin_output_path(Path::new("/data/obs_det2_evt2.pxf"), 3).unwrap();
        assert_eq!(path, Path::new("/data/obs_det2_evt2_tbin_00003.pxf"));
    }
}
