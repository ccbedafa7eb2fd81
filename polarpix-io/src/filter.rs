//! Background filtering of level-2 event files.
//!
//! The level-1 stream knows the track shapes, the level-2 stream knows
//! the calibrated energies; the two are aligned by exact timestamp, the
//! quality cuts run on the joined rows, and the verdict flows back into
//! level-2 row space as a subset or a tag column.

use log::{info, warn};
use std::path::{Path, PathBuf};

use polarpix_algorithms::{match_times, TrackClassifier};
use polarpix_core::CalibrationConfig;
use polarpix_evt::{write_file, EventFile};

use crate::error::{Error, Result};
use crate::friend::UnitData;

/// Name of the classification column appended in tag mode (1 = source-like).
pub const TAG_COLUMN: &str = "SRC_TAG";

/// What the filter emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Keep only source-like events.
    Rej,
    /// Keep only background-like events.
    Bkg,
    /// Keep every event and append a 0/1 source tag column.
    Tag,
}

impl FilterMode {
    /// Suffix appended to the output file stem.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            FilterMode::Rej => "rej",
            FilterMode::Bkg => "bkg",
            FilterMode::Tag => "tag",
        }
    }
}

/// Row counts from one filter run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterStats {
    /// Rows in the input level-2 event table.
    pub n_input: usize,
    /// Rows matched across the two streams.
    pub n_joined: usize,
    /// Joined rows classified source-like.
    pub n_source: usize,
    /// Rows in the output event table.
    pub n_output: usize,
}

/// Classifies one unit's events and builds the output file in memory.
///
/// The streams are joined on exact timestamps, the track cuts run on the
/// joined rows, and the mode decides what survives. In tag mode the tag
/// array is zero-initialized before the overlay, so level-2 events absent
/// from the intersection default to background.
///
/// # Errors
/// Fails on missing columns or mismatched array lengths.
pub fn filter_events(
    unit: &UnitData,
    config: &CalibrationConfig,
    mode: FilterMode,
) -> Result<(EventFile, FilterStats)> {
    let lv1 = &unit.level1;
    let lv2 = unit.level2.level2_batch()?;

    let matched = match_times(&lv1.time, &lv2.time);
    if matched.is_empty() {
        warn!(
            "no timestamps shared between the level-1 and level-2 streams of {}",
            unit.path.display()
        );
    }
    let pi: Vec<f32> = matched.right.iter().map(|&j| lv2.pi[j]).collect();
    let num_pix: Vec<i32> = matched.left.iter().map(|&i| lv1.num_pix[i]).collect();
    let evt_fra: Vec<f32> = matched.left.iter().map(|&i| lv1.evt_fra[i]).collect();
    let trk_bord: Vec<i32> = matched.left.iter().map(|&i| lv1.trk_bord[i]).collect();

    let classifier = TrackClassifier::new(config);
    let source = classifier.classify(&pi, &num_pix, &evt_fra, &trk_bord)?;
    let n_source = source.iter().filter(|&&s| s).count();

    let file = match mode {
        FilterMode::Rej => select_by_times(unit, &matched.times, &source, true)?,
        FilterMode::Bkg => select_by_times(unit, &matched.times, &source, false)?,
        FilterMode::Tag => {
            let mut tags = vec![0_u8; unit.level2.n_events()?];
            for (&j, &is_source) in matched.right.iter().zip(&source) {
                if is_source {
                    tags[j] = 1;
                }
            }
            unit.level2.tag_events(TAG_COLUMN, &tags)?
        }
    };

    let stats = FilterStats {
        n_input: unit.level2.n_events()?,
        n_joined: matched.len(),
        n_source,
        n_output: file.n_events()?,
    };
    Ok((file, stats))
}

/// Maps surviving timestamps back into level-2 rows with a second join.
fn select_by_times(
    unit: &UnitData,
    times: &[f64],
    source: &[bool],
    keep_source: bool,
) -> Result<EventFile> {
    let survivors: Vec<f64> = times
        .iter()
        .zip(source)
        .filter_map(|(&t, &is_source)| (is_source == keep_source).then_some(t))
        .collect();
    let lv2_times = unit.level2.level2_batch()?.time;
    let back = match_times(&survivors, &lv2_times);
    Ok(unit.level2.select_events(&back.right)?)
}

/// Runs the filter and writes the result next to the input.
///
/// The output keeps the input name with `_rej`, `_bkg` or `_tag` appended
/// to the stem.
///
/// # Errors
/// Same conditions as [`filter_events`], plus write failures.
pub fn filter_to_file(
    unit: &UnitData,
    config: &CalibrationConfig,
    mode: FilterMode,
) -> Result<(PathBuf, FilterStats)> {
    let (file, stats) = filter_events(unit, config, mode)?;
    let path = mode_output_path(&unit.path, mode)?;
    write_file(&file, &path)?;
    info!(
        "wrote {} ({} of {} events, {} joined, {} source-like)",
        path.display(),
        stats.n_output,
        stats.n_input,
        stats.n_joined,
        stats.n_source
    );
    Ok((path, stats))
}

/// Derives the output path for a mode: `stem_<mode>.<ext>` next to the input.
///
/// # Errors
/// Returns [`Error::BadOutputPath`] for paths without a decodable stem.
pub fn mode_output_path(input: &Path, mode: FilterMode) -> Result<PathBuf> {
    suffixed_path(input, mode.suffix())
}

pub(crate) fn suffixed_path(input: &Path, suffix: &str) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::BadOutputPath {
            path: input.to_path_buf(),
        })?;
    let name = match input.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}_{suffix}.{ext}"),
        None => format!("{stem}_{suffix}"),
    };
    Ok(input.with_file_name(name))
}
