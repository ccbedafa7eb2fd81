//! Paired level-1/level-2 loading.
//!
//! The two processing levels of one detector unit are friends: the
//! level-2 file carries the science events and the GTI table, the
//! level-1 files carry the track descriptors and livetime increments for
//! the same observation. Everything a pipeline needs for one unit loads
//! here.

use std::path::{Path, PathBuf};

use polarpix_core::{GtiList, Level1Batch};
use polarpix_evt::{read_file, EventFile};

use crate::discovery::UnitFiles;
use crate::error::Result;

/// One detector unit's inputs, fully loaded.
#[derive(Debug, Clone)]
pub struct UnitData {
    /// Path of the level-2 file (output names derive from it).
    pub path: PathBuf,
    /// The level-2 event file.
    pub level2: EventFile,
    /// Concatenated level-1 samples, in file name order.
    pub level1: Level1Batch,
    /// Good-time intervals from the level-2 file.
    pub gti: GtiList,
}

impl UnitData {
    /// Loads a level-2 file and its level-1 friends.
    ///
    /// # Errors
    /// Fails if any file cannot be read, the level-2 file lacks a GTI
    /// extension, or a required column is absent.
    pub fn load_pair(level2_path: &Path, level1_paths: &[PathBuf]) -> Result<Self> {
        let level2 = read_file(level2_path)?;
        let gti = level2.gti_list()?;
        let mut level1 = Level1Batch::default();
        for path in level1_paths {
            let file = read_file(path)?;
            level1.append(&file.level1_batch()?);
        }
        Ok(Self {
            path: level2_path.to_path_buf(),
            level2,
            level1,
            gti,
        })
    }

    /// Loads the files discovery resolved for one unit.
    ///
    /// # Errors
    /// Same conditions as [`UnitData::load_pair`].
    pub fn load(files: &UnitFiles) -> Result<Self> {
        Self::load_pair(&files.level2, &files.level1)
    }
}
