//! Foundation types for lead deduplication.
//!
//! This crate provides the record, key, and timestamp types shared by the
//! rest of the workspace. Every other `lead-*` crate depends on `lead-types`.
//!
//! # Key Types
//!
//! - [`Lead`] -- A contact record: an ordered map of field name to JSON value
//! - [`LeadKey`] -- Hashable identity of an `id` or `email` value
//! - [`EntryDate`] -- Parsed recency timestamp of a record
//! - [`UndatedPolicy`] -- How missing or unparsable dates compare
//! - [`FieldNames`] -- Which record fields carry the id, email, and date

pub mod date;
pub mod error;
pub mod fields;
pub mod key;
pub mod lead;

pub use date::{EntryDate, UndatedPolicy};
pub use error::{TypeError, TypeResult};
pub use fields::FieldNames;
pub use key::LeadKey;
pub use lead::Lead;
