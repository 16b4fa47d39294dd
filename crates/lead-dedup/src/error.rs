//! Error types for the dedup crate.

/// Errors that can occur while setting up a deduplication pass.
///
/// The pass itself never fails: malformed records are processed best-effort.
#[derive(Debug, thiserror::Error)]
pub enum DedupError {
    /// The configuration names unusable key fields.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] lead_types::TypeError),
}

/// Convenience alias for dedup results.
pub type DedupResult<T> = Result<T, DedupError>;
