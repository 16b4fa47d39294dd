//! Document I/O for lead deduplication.
//!
//! The deduplication engine works on in-memory records. This crate moves
//! them in and out of the JSON documents the tool exchanges:
//!
//! - input: `{"leads": [ ... ]}`
//! - deduplicated output: `{"leads": [ ... ]}`
//! - change log: `{"log": [ ... ]}`
//!
//! Output is pretty-printed with two-space indentation and written through a
//! temporary file in the destination directory, so a failed write never
//! leaves a truncated document behind.

pub mod document;
pub mod error;

pub use document::{read_leads, write_leads, write_log, LeadsDocument, LogDocument};
pub use error::{IoError, IoResult};
