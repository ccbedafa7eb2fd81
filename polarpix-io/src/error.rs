//! I/O and pipeline error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for I/O operations.
pub type Result<T> = std::result::Result<T, Error>;

/// I/O and pipeline error types.
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Event-file error.
    #[error("event file error: {0}")]
    Evt(#[from] polarpix_evt::Error),

    /// Core library error.
    #[error("core error: {0}")]
    Core(#[from] polarpix_core::Error),

    /// A required file pattern resolved to nothing.
    #[error("no file matching {pattern}")]
    MissingFile { pattern: String },

    /// The observation tree yields no detector unit at all.
    #[error("no detector unit with event files under {root}")]
    NoDetectorUnits { root: PathBuf },

    /// Malformed glob pattern.
    #[error("invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// An output name cannot be derived from the input path.
    #[error("cannot derive output name from {path}")]
    BadOutputPath { path: PathBuf },
}
