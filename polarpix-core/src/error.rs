//! Error types for polarpix-core.

use thiserror::Error;

/// Result type alias for polarpix operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for polarpix operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Time grid cannot hold a single bin of the requested duration.
    #[error("invalid time grid: cannot fit a {duration} s bin into [{t0}, {t1}]")]
    InvalidGrid { t0: f64, t1: f64, duration: f64 },

    /// Good-time interval with a non-positive span.
    #[error("invalid good-time interval: [{start}, {stop})")]
    InvalidInterval { start: f64, stop: f64 },

    /// Parallel arrays disagree in length.
    #[error("length mismatch for {context}: {left} vs {right}")]
    LengthMismatch {
        context: &'static str,
        left: usize,
        right: usize,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Configuration JSON could not be parsed.
    #[error("configuration parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Configuration file could not be read.
    #[error("configuration I/O error: {0}")]
    ConfigIo(#[from] std::io::Error),
}
