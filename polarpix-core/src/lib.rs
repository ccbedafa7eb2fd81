//! polarpix-core: Core types for X-ray polarimetry event processing.
//!
//! This crate provides the foundational types shared by the polarpix
//! workspace: structure-of-arrays sample batches for the two processing
//! levels, good-time intervals, uniform time grids, and the calibration
//! configuration with its JSON loader.

pub mod batch;
pub mod config;
pub mod error;
pub mod grid;
pub mod gti;

pub use batch::{Level1Batch, Level2Batch};
pub use config::{CalibrationConfig, TrackCuts};
pub use error::{Error, Result};
pub use grid::TimeGrid;
pub use gti::{Gti, GtiList};
