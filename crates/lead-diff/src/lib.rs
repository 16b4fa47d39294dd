//! Diff engine for lead records.
//!
//! Compares a superseded record with the incoming record that replaces it,
//! producing the per-field `{from, to}` changes recorded in a change log.
//!
//! # Key Types
//!
//! - [`FieldChanges`] / [`FieldChange`] -- Ordered set of changed fields

pub mod field_diff;

pub use field_diff::{diff_fields, FieldChange, FieldChanges};
