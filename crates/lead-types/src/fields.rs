use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};

/// Names of the record fields the deduplicator inspects.
///
/// Every other field is opaque payload. Defaults are `id`, `email`, and
/// `entryDate`; exports that store the identifier under `_id` can rename it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FieldNames {
    /// Field holding the primary dedup key.
    pub id: String,
    /// Field holding the secondary dedup key.
    pub email: String,
    /// Field holding the recency timestamp.
    pub entry_date: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            id: "id".into(),
            email: "email".into(),
            entry_date: "entryDate".into(),
        }
    }
}

impl FieldNames {
    /// Check that every role has a non-empty, distinct field name.
    pub fn validate(&self) -> TypeResult<()> {
        let roles = [
            ("id", &self.id),
            ("email", &self.email),
            ("entry date", &self.entry_date),
        ];
        for (role, name) in roles {
            if name.is_empty() {
                return Err(TypeError::EmptyFieldName { role });
            }
        }
        if self.id == self.email || self.id == self.entry_date {
            return Err(TypeError::DuplicateFieldName(self.id.clone()));
        }
        if self.email == self.entry_date {
            return Err(TypeError::DuplicateFieldName(self.email.clone()));
        }
        Ok(())
    }
}
