//! In-memory event-file model.
//!
//! An event file is a primary header plus a list of named extensions, each
//! carrying its own header and a columnar table. Level-2 files hold an
//! `EVENTS` extension and a `GTI` extension; level-1 files hold `EVENTS`
//! only. Extensions this crate does not recognize ride along untouched
//! through every subset and tag operation.

use polarpix_core::{GtiList, Level1Batch, Level2Batch};

use crate::error::{Error, Result};
use crate::meta::MetaMap;
use crate::table::{ColumnData, Table};

/// Name of the extension holding the event table.
pub const EVENTS_EXTENSION: &str = "EVENTS";

/// Name of the extension holding the good-time intervals.
pub const GTI_EXTENSION: &str = "GTI";

/// One named extension: header metadata plus a columnar table.
#[derive(Debug, Clone, PartialEq)]
pub struct Extension {
    /// Extension name, unique within the file.
    pub name: String,
    /// Extension header keywords.
    pub meta: MetaMap,
    /// Extension table.
    pub table: Table,
}

/// A primary header and its extensions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFile {
    /// Primary header keywords.
    pub primary: MetaMap,
    /// Extensions in file order.
    pub extensions: Vec<Extension>,
}

impl EventFile {
    /// Creates a file with the given primary header and no extensions.
    #[must_use]
    pub fn new(primary: MetaMap) -> Self {
        Self {
            primary,
            extensions: Vec::new(),
        }
    }

    /// Appends an extension.
    ///
    /// # Errors
    /// Returns [`Error::InvalidFormat`] if the name is already taken.
    pub fn push_extension(&mut self, name: &str, meta: MetaMap, table: Table) -> Result<()> {
        if self.has_extension(name) {
            return Err(Error::InvalidFormat(format!(
                "duplicate extension: {name}"
            )));
        }
        self.extensions.push(Extension {
            name: name.to_string(),
            meta,
            table,
        });
        Ok(())
    }

    /// Returns true if an extension with this name exists.
    #[must_use]
    pub fn has_extension(&self, name: &str) -> bool {
        self.extensions.iter().any(|e| e.name == name)
    }

    /// Returns the extension with this name.
    ///
    /// # Errors
    /// Returns [`Error::MissingExtension`].
    pub fn extension(&self, name: &str) -> Result<&Extension> {
        self.extensions
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| Error::MissingExtension {
                name: name.to_string(),
            })
    }

    /// Returns the `EVENTS` extension.
    ///
    /// # Errors
    /// Returns [`Error::MissingExtension`].
    pub fn events(&self) -> Result<&Extension> {
        self.extension(EVENTS_EXTENSION)
    }

    /// Returns the number of rows in the event table.
    ///
    /// # Errors
    /// Fails if the `EVENTS` extension is absent.
    pub fn n_events(&self) -> Result<usize> {
        Ok(self.events()?.table.n_rows())
    }

    /// Builds the good-time-interval list from the `GTI` extension.
    ///
    /// # Errors
    /// Fails if the extension or its `START`/`STOP` columns are absent, or
    /// if any interval is invalid.
    pub fn gti_list(&self) -> Result<GtiList> {
        let gti = self.extension(GTI_EXTENSION)?;
        let starts = gti.table.f64s("START")?;
        let stops = gti.table.f64s("STOP")?;
        Ok(GtiList::from_bounds(starts, stops)?)
    }

    /// Observation start from the primary header (`TSTART`, seconds).
    ///
    /// # Errors
    /// Returns [`Error::MissingKeyword`].
    pub fn tstart(&self) -> Result<f64> {
        self.primary.require_f64("TSTART")
    }

    /// Observation stop from the primary header (`TSTOP`, seconds).
    ///
    /// # Errors
    /// Returns [`Error::MissingKeyword`].
    pub fn tstop(&self) -> Result<f64> {
        self.primary.require_f64("TSTOP")
    }

    /// Detector unit identifier from the primary header, if present.
    #[must_use]
    pub fn det_id(&self) -> Option<i64> {
        self.primary.get_i64("DET_ID")
    }

    /// Accumulated livetime from the primary header (seconds), if present.
    #[must_use]
    pub fn livetime(&self) -> Option<f64> {
        self.primary.get_f64("LIVETIME")
    }

    /// Sets the `LIVETIME` keyword (seconds) on the primary header and on
    /// every extension header.
    pub fn set_livetime(&mut self, seconds: f64) {
        self.primary.set("LIVETIME", seconds);
        for extension in &mut self.extensions {
            extension.meta.set("LIVETIME", seconds);
        }
    }

    /// Builds a new file keeping only the given event rows.
    ///
    /// The event table keeps its full column set (an empty selection
    /// yields a zero-row table); every other extension and all headers are
    /// preserved unchanged.
    ///
    /// # Errors
    /// Fails if the `EVENTS` extension is absent or a row index is out of
    /// range.
    pub fn select_events(&self, rows: &[usize]) -> Result<EventFile> {
        self.events()?;
        let mut extensions = Vec::with_capacity(self.extensions.len());
        for extension in &self.extensions {
            let table = if extension.name == EVENTS_EXTENSION {
                extension.table.select_rows(rows)?
            } else {
                extension.table.clone()
            };
            extensions.push(Extension {
                name: extension.name.clone(),
                meta: extension.meta.clone(),
                table,
            });
        }
        Ok(EventFile {
            primary: self.primary.clone(),
            extensions,
        })
    }

    /// Builds a new file with a `u8` column appended to the event table.
    ///
    /// All rows and every other extension are preserved.
    ///
    /// # Errors
    /// Fails if the `EVENTS` extension is absent, the column name is
    /// taken, or `tags` disagrees with the row count.
    pub fn tag_events(&self, column: &str, tags: &[u8]) -> Result<EventFile> {
        self.events()?;
        let mut file = self.clone();
        for extension in &mut file.extensions {
            if extension.name == EVENTS_EXTENSION {
                extension
                    .table
                    .push_column(column, ColumnData::U8(tags.to_vec()))?;
            }
        }
        Ok(file)
    }

    /// Extracts the level-1 sample columns from the event table.
    ///
    /// # Errors
    /// Fails if any of the five level-1 columns is absent or mistyped.
    pub fn level1_batch(&self) -> Result<Level1Batch> {
        let table = &self.events()?.table;
        Ok(Level1Batch {
            time: table.f64s("TIME")?.to_vec(),
            num_pix: table.i32s("NUM_PIX")?.to_vec(),
            evt_fra: table.f32s("EVT_FRA")?.to_vec(),
            trk_bord: table.i32s("TRK_BORD")?.to_vec(),
            livetime: table.i32s("LIVETIME")?.to_vec(),
        })
    }

    /// Extracts the level-2 classification columns from the event table.
    ///
    /// # Errors
    /// Fails if the `TIME` or `PI` column is absent or mistyped.
    pub fn level2_batch(&self) -> Result<Level2Batch> {
        let table = &self.events()?.table;
        Ok(Level2Batch {
            time: table.f64s("TIME")?.to_vec(),
            pi: table.f32s("PI")?.to_vec(),
        })
    }
}
