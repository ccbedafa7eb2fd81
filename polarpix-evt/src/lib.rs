//! polarpix-evt: Columnar event-file model and binary codec.
//!
//! Event lists travel as self-describing columnar files: a JSON header
//! (primary keywords plus per-extension schemas) followed by one
//! little-endian blob per column. This crate provides the in-memory model
//! ([`EventFile`], [`Table`], [`MetaMap`]), the subset/tag/livetime
//! operations the pipelines are built from, and the codec itself.

pub mod codec;
pub mod error;
pub mod file;
pub mod meta;
pub mod table;

pub use codec::{decode, encode, read_file, write_file, MAGIC};
pub use error::{Error, Result};
pub use file::{EventFile, Extension, EVENTS_EXTENSION, GTI_EXTENSION};
pub use meta::{MetaMap, MetaValue};
pub use table::{Column, ColumnData, Dtype, Table};
