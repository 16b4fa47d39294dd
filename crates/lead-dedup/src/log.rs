//! Change log entries produced by merges.

use std::fmt;

use lead_diff::FieldChanges;
use lead_types::Lead;
use serde::Serialize;

/// What caused a merge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchReason {
    /// A newer record shared the canonical record's id.
    Id,
    /// A newer record shared the canonical record's email.
    Email,
    /// An update made two canonical records share a key and they were
    /// combined into one.
    Fusion,
}

impl fmt::Display for MatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id => f.write_str("id"),
            Self::Email => f.write_str("email"),
            Self::Fusion => f.write_str("fusion"),
        }
    }
}

/// One merge event.
///
/// `changes` lists every field of the winning record whose value differs
/// from `source_lead`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeLogEntry {
    /// The record that was superseded.
    pub source_lead: Lead,
    /// The record that resulted from the merge.
    pub updated_lead: Lead,
    /// Field-level `{from, to}` changes.
    pub changes: FieldChanges,
    pub matched_by: MatchReason,
}
