//! Observation tree discovery.
//!
//! An observation root holds two folders, `event_l1/` and `event_l2/`,
//! with per-unit files named `*det<N>*evt1*` and `*det<N>*evt2*`. A unit
//! has exactly one level-2 file; its level-1 stream may span several
//! files, processed in name order.

use glob::glob;
use log::warn;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Event files resolved for one detector unit.
#[derive(Debug, Clone)]
pub struct UnitFiles {
    /// Detector unit identifier.
    pub du: u8,
    /// The level-2 event file.
    pub level2: PathBuf,
    /// Level-1 files, sorted by name.
    pub level1: Vec<PathBuf>,
}

/// Per-unit event files under an observation root.
#[derive(Debug, Clone)]
pub struct ObservationTree {
    root: PathBuf,
    units: Vec<UnitFiles>,
}

impl ObservationTree {
    /// Resolves event files for the given detector units.
    ///
    /// A unit with no event files at all is skipped with a warning; one
    /// with files on only one level is malformed and fails discovery.
    ///
    /// # Errors
    /// Returns [`Error::MissingFile`] for a half-present unit and
    /// [`Error::NoDetectorUnits`] if nothing resolves for any unit.
    pub fn discover(root: &Path, detector_units: &[u8]) -> Result<Self> {
        let mut units = Vec::new();
        for &du in detector_units {
            let lv1_pattern = unit_pattern(root, "event_l1", du, "evt1");
            let lv2_pattern = unit_pattern(root, "event_l2", du, "evt2");
            let lv1 = sorted_matches(&lv1_pattern)?;
            let lv2 = sorted_matches(&lv2_pattern)?;

            if lv1.is_empty() && lv2.is_empty() {
                warn!("no event files for detector unit {du}, skipping");
                continue;
            }
            if lv1.is_empty() {
                return Err(Error::MissingFile {
                    pattern: lv1_pattern,
                });
            }
            let Some(level2) = lv2.into_iter().next() else {
                return Err(Error::MissingFile {
                    pattern: lv2_pattern,
                });
            };
            units.push(UnitFiles {
                du,
                level2,
                level1: lv1,
            });
        }
        if units.is_empty() {
            return Err(Error::NoDetectorUnits {
                root: root.to_path_buf(),
            });
        }
        Ok(Self {
            root: root.to_path_buf(),
            units,
        })
    }

    /// Returns the observation root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the resolved units, in configuration order.
    #[must_use]
    pub fn units(&self) -> &[UnitFiles] {
        &self.units
    }
}

fn unit_pattern(root: &Path, folder: &str, du: u8, tag: &str) -> String {
    format!("{}/*det{du}*{tag}*", root.join(folder).display())
}

fn sorted_matches(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in glob(pattern)? {
        paths.push(entry.map_err(std::io::Error::from)?);
    }
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::write(path, b"").unwrap();
    }

    fn observation_with_units(units: &[u8]) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("event_l1")).unwrap();
        fs::create_dir(dir.path().join("event_l2")).unwrap();
        for &du in units {
            touch(&dir.path().join(format!("event_l1/obs_det{du}_evt1_b.pxf")));
            touch(&dir.path().join(format!("event_l1/obs_det{du}_evt1_a.pxf")));
            touch(&dir.path().join(format!("event_l2/obs_det{du}_evt2.pxf")));
        }
        dir
    }

    #[test]
    fn test_discover_resolves_and_sorts() {
        let dir = observation_with_units(&[1, 2]);
        let tree = ObservationTree::discover(dir.path(), &[1, 2]).unwrap();
        assert_eq!(tree.units().len(), 2);

        let unit = &tree.units()[0];
        assert_eq!(unit.du, 1);
        assert!(unit.level2.ends_with("obs_det1_evt2.pxf"));
        // Level-1 files come back in name order
        assert_eq!(unit.level1.len(), 2);
        assert!(unit.level1[0].ends_with("obs_det1_evt1_a.pxf"));
        assert!(unit.level1[1].ends_with("obs_det1_evt1_b.pxf"));
    }

    #[test]
    fn test_discover_skips_absent_unit() {
        let dir = observation_with_units(&[1, 3]);
        let tree = ObservationTree::discover(dir.path(), &[1, 2, 3]).unwrap();
        let dus: Vec<u8> = tree.units().iter().map(|u| u.du).collect();
        assert_eq!(dus, vec![1, 3]);
    }

    #[test]
    fn test_discover_rejects_half_present_unit() {
        let dir = observation_with_units(&[1]);
        fs::remove_file(dir.path().join("event_l2/obs_det1_evt2.pxf")).unwrap();
        let err = ObservationTree::discover(dir.path(), &[1]).unwrap_err();
        assert!(matches!(err, Error::MissingFile { .. }));
    }

    #[test]
    fn test_discover_empty_tree() {
        let dir = TempDir::new().unwrap();
        let err = ObservationTree::discover(dir.path(), &[1, 2, 3]).unwrap_err();
        assert!(matches!(err, Error::NoDetectorUnits { .. }));
    }
}
