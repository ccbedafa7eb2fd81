//! Post-processing of already-written event files.

use std::path::Path;

use log::debug;
use polarpix_evt::{read_file, write_file};

use crate::error::Result;

/// Rewrites the `LIVETIME` keyword of an event file in place.
///
/// The keyword lands in the primary header and in every extension, so the
/// file stays self-describing after extensions are read in isolation.
///
/// # Errors
/// Fails when the file cannot be read, decoded or rewritten.
pub fn update_livetime(path: &Path, seconds: f64) -> Result<()> {
    let mut file = read_file(path)?;
    file.set_livetime(seconds);
    write_file(&file, path)?;
    debug!("set LIVETIME={seconds} on {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polarpix_evt::{ColumnData, EventFile, MetaMap, Table, EVENTS_EXTENSION};

    fn sample_file() -> EventFile {
        let mut table = Table::new();
        table
            .push_column("TIME", ColumnData::F64(vec![1.0, 2.0]))
            .unwrap();
        let mut file = EventFile::new(MetaMap::new());
        file.push_extension(EVENTS_EXTENSION, MetaMap::new(), table)
            .unwrap();
        file
    }

    #[test]
    fn test_update_livetime_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.pxf");
        write_file(&sample_file(), &path).unwrap();

        update_livetime(&path, 12.5).unwrap();

        let reread = read_file(&path).unwrap();
        assert_eq!(reread.livetime(), Some(12.5));
        let events = reread.extension(EVENTS_EXTENSION).unwrap();
        assert_eq!(events.meta.get_f64("LIVETIME"), Some(12.5));
    }
}
