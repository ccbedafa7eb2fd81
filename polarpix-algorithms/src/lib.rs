//! polarpix-algorithms: Stream alignment and event classification.
//!
//! This crate provides the per-observation computations:
//! - **Time-key joining** - exact-timestamp intersection of level-1 and
//!   level-2 streams with first-occurrence index maps
//! - **Track-quality cuts** - energy-dependent source/background
//!   classification
//! - **GTI masking** - restriction to good-time-interval unions
//! - **Livetime accumulation** - weighted time histograms over a split
//!   grid
//!
#![warn(missing_docs)]

mod cuts;
mod gtimask;
mod livetime;
mod timejoin;

pub use cuts::TrackClassifier;
pub use gtimask::gti_mask;
pub use livetime::{accumulate_livetime, TimeHistogram};
pub use timejoin::{match_times, TimeMatch};
