//! Uniqueness check for a lead collection.
//!
//! Used to audit a deduplicated document: every id and every email should
//! belong to exactly one record.

use std::collections::BTreeMap;
use std::fmt;

use lead_types::{Lead, LeadKey};
use serde::Serialize;

use crate::config::DedupConfig;

/// Which key a duplicate was found on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyKind {
    Id,
    Email,
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id => f.write_str("id"),
            Self::Email => f.write_str("email"),
        }
    }
}

/// A key shared by more than one record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DuplicateKey {
    pub kind: KeyKind,
    /// The key as JSON text.
    pub key: String,
    /// Zero-based positions of the records sharing the key.
    pub positions: Vec<usize>,
}

/// Find every id and email that appears in more than one record.
///
/// Keys are extracted with the same field names and email normalization a
/// pass would use. Results are sorted by kind, then key.
pub fn find_duplicates(leads: &[Lead], config: &DedupConfig) -> Vec<DuplicateKey> {
    let mut seen: BTreeMap<(KeyKind, LeadKey), Vec<usize>> = BTreeMap::new();
    for (position, lead) in leads.iter().enumerate() {
        let keys = [
            (KeyKind::Id, lead.id_key(&config.fields)),
            (KeyKind::Email, lead.email_key(&config.fields, config.normalize_email)),
        ];
        for (kind, key) in keys {
            if let Some(key) = key {
                seen.entry((kind, key)).or_default().push(position);
            }
        }
    }

    seen.into_iter()
        .filter(|(_, positions)| positions.len() > 1)
        .map(|((kind, key), positions)| DuplicateKey {
            kind,
            key: key.to_string(),
            positions,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::deduplicate;
    use serde_json::{json, Value};

    fn leads(values: Vec<Value>) -> Vec<Lead> {
        values.into_iter().map(|v| Lead::try_from(v).unwrap()).collect()
    }

    #[test]
    fn unique_collection_is_clean() {
        let input = leads(vec![
            json!({"id": 1, "email": "a@x.com"}),
            json!({"id": 2, "email": "b@x.com"}),
            json!({"name": "no keys"}),
            json!({"name": "no keys"}),
        ]);
        assert!(find_duplicates(&input, &DedupConfig::default()).is_empty());
    }

    #[test]
    fn reports_ids_and_emails() {
        let input = leads(vec![
            json!({"id": 1, "email": "a@x.com"}),
            json!({"id": 1, "email": "b@x.com"}),
            json!({"id": 2, "email": "b@x.com"}),
        ]);
        let dups = find_duplicates(&input, &DedupConfig::default());
        assert_eq!(
            dups,
            vec![
                DuplicateKey {
                    kind: KeyKind::Id,
                    key: "1".into(),
                    positions: vec![0, 1],
                },
                DuplicateKey {
                    kind: KeyKind::Email,
                    key: "\"b@x.com\"".into(),
                    positions: vec![1, 2],
                },
            ]
        );
    }

    #[test]
    fn honors_email_normalization() {
        let input = leads(vec![
            json!({"id": 1, "email": "A@x.com"}),
            json!({"id": 2, "email": "a@x.com"}),
        ]);
        assert!(find_duplicates(&input, &DedupConfig::default()).is_empty());

        let config = DedupConfig {
            normalize_email: true,
            ..Default::default()
        };
        assert_eq!(find_duplicates(&input, &config).len(), 1);
    }

    #[test]
    fn dedup_output_passes() {
        let input = leads(vec![
            json!({"id": 1, "email": "a@x.com", "entryDate": "2024-01-01"}),
            json!({"id": 1, "email": "b@x.com", "entryDate": "2024-02-01"}),
            json!({"id": 2, "email": "b@x.com", "entryDate": "2024-03-01"}),
        ]);
        assert!(!find_duplicates(&input, &DedupConfig::default()).is_empty());
        let out = deduplicate(input);
        assert!(find_duplicates(&out.leads, &DedupConfig::default()).is_empty());
    }
}
