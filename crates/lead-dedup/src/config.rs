use lead_types::{FieldNames, UndatedPolicy};
use serde::{Deserialize, Serialize};

use crate::error::DedupResult;

/// Configuration for a deduplication pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DedupConfig {
    /// Trim and lowercase string emails before matching. Stored records
    /// keep their original spelling.
    pub normalize_email: bool,
    /// How records with a missing or unparsable entry date compare.
    pub undated: UndatedPolicy,
    /// Which record fields hold the id, email, and entry date.
    pub fields: FieldNames,
}

impl DedupConfig {
    /// Check the configuration before a pass.
    pub fn validate(&self) -> DedupResult<()> {
        self.fields.validate()?;
        Ok(())
    }
}
