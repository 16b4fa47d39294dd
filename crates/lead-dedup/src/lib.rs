//! Deduplication engine for lead records.
//!
//! Scans a list of leads once, matching records by id and by email, keeping
//! the most recently dated version of each lead and recording every merge in
//! a change log. The engine performs no I/O; reading and writing documents
//! is the job of `lead-io` and the CLI.
//!
//! # Key Types
//!
//! - [`Deduplicator`] -- Runs a deduplication pass under a [`DedupConfig`]
//! - [`DedupOutcome`] -- Deduplicated leads, change log, and [`DedupStats`]
//! - [`ChangeLogEntry`] / [`MatchReason`] -- One merge event
//! - [`LeadArena`] / [`SlotId`] -- Output storage with stable handles
//! - [`KeyIndex`] -- Key to slot mapping used for the id and email indexes

pub mod arena;
pub mod config;
pub mod dedup;
pub mod error;
pub mod index;
pub mod log;
pub mod verify;

pub use arena::{CanonicalLead, LeadArena, SlotId};
pub use config::DedupConfig;
pub use dedup::{deduplicate, DedupOutcome, DedupStats, Deduplicator};
pub use error::{DedupError, DedupResult};
pub use index::KeyIndex;
pub use log::{ChangeLogEntry, MatchReason};
pub use verify::{find_duplicates, DuplicateKey, KeyKind};
