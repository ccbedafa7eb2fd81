//! polarpix-io: Observation-level file handling for polarpix.
//!
//! This crate walks observation directory trees, pairs the level-1 and
//! level-2 event files of each detector unit, and runs the two pipelines
//! built on top of that pairing: background filtering and time-resolved
//! splitting with livetime bookkeeping.

mod discovery;
mod error;
mod filter;
mod friend;
mod split;
mod update;

pub use discovery::{ObservationTree, UnitFiles};
pub use error::{Error, Result};
pub use filter::{
    filter_events, filter_to_file, mode_output_path, FilterMode, FilterStats, TAG_COLUMN,
};
pub use friend::UnitData;
pub use split::{bin_output_path, split_observation, SplitReport, UnitReport};
pub use update::update_livetime;
