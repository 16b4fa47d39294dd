//! Field-level diff: compare the incoming record against its source.
//!
//! Only fields carried by the incoming record are inspected; fields that
//! exist only on the source survive a merge unchanged and are not reported.

use lead_types::Lead;
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};
use serde_json::Value;

/// A single changed field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldChange {
    /// The field name.
    pub field: String,
    /// The source's value, or `None` when the source lacked the field.
    pub from: Option<Value>,
    /// The incoming value.
    pub to: Value,
}

impl FieldChange {
    /// Returns `true` if the field did not exist on the source.
    pub fn is_addition(&self) -> bool {
        self.from.is_none()
    }
}

/// Serializes as `{"from": .., "to": ..}`; `from` is omitted for additions.
impl Serialize for FieldChange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.from.is_some() { 2 } else { 1 };
        let mut state = serializer.serialize_struct("FieldChange", len)?;
        if let Some(from) = &self.from {
            state.serialize_field("from", from)?;
        } else {
            state.skip_field("from")?;
        }
        state.serialize_field("to", &self.to)?;
        state.end()
    }
}

/// The changed fields of one merge, in the incoming record's field order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldChanges {
    /// The list of field changes.
    pub changes: Vec<FieldChange>,
}

impl FieldChanges {
    /// Create an empty change set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if there are no changes.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of changed fields.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Look up the change for a field.
    pub fn get(&self, field: &str) -> Option<&FieldChange> {
        self.changes.iter().find(|c| c.field == field)
    }

    /// Number of fields the source did not have.
    pub fn additions(&self) -> usize {
        self.changes.iter().filter(|c| c.is_addition()).count()
    }

    /// Number of fields whose existing value changed.
    pub fn modifications(&self) -> usize {
        self.changes.iter().filter(|c| !c.is_addition()).count()
    }

    /// Changed field names, in order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.changes.iter().map(|c| c.field.as_str())
    }
}

/// Serializes as a JSON object keyed by field name.
impl Serialize for FieldChanges {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.changes.len()))?;
        for change in &self.changes {
            map.serialize_entry(&change.field, change)?;
        }
        map.end()
    }
}

/// Compute the changes `incoming` makes when laid over `source`.
///
/// A field of `incoming` is reported when `source` lacks it or holds a
/// different value. Nested values compare structurally.
pub fn diff_fields(source: &Lead, incoming: &Lead) -> FieldChanges {
    let changes = incoming
        .fields()
        .filter_map(|(field, to)| match source.get(field) {
            Some(from) if from == to => None,
            from => Some(FieldChange {
                field: field.clone(),
                from: from.cloned(),
                to: to.clone(),
            }),
        })
        .collect();

    FieldChanges { changes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lead(v: Value) -> Lead {
        Lead::try_from(v).unwrap()
    }

    #[test]
    fn identical_records_no_diff() {
        let a = lead(json!({"id": 1, "name": "A"}));
        let diff = diff_fields(&a, &a);
        assert!(diff.is_empty());
    }

    #[test]
    fn modified_fields_reported() {
        let source = lead(json!({"id": 1, "entryDate": "2024-01-01", "name": "A"}));
        let incoming = lead(json!({"id": 1, "entryDate": "2024-02-01", "name": "B"}));

        let diff = diff_fields(&source, &incoming);
        assert_eq!(diff.len(), 2);
        assert_eq!(diff.modifications(), 2);

        let date = diff.get("entryDate").unwrap();
        assert_eq!(date.from, Some(json!("2024-01-01")));
        assert_eq!(date.to, json!("2024-02-01"));
        assert!(diff.get("id").is_none());
    }

    #[test]
    fn added_field_has_no_from() {
        let source = lead(json!({"id": 1}));
        let incoming = lead(json!({"id": 1, "phone": "555"}));

        let diff = diff_fields(&source, &incoming);
        assert_eq!(diff.additions(), 1);
        assert!(diff.get("phone").unwrap().is_addition());
    }

    #[test]
    fn source_only_fields_ignored() {
        let source = lead(json!({"id": 1, "phone": "555"}));
        let incoming = lead(json!({"id": 1}));
        assert!(diff_fields(&source, &incoming).is_empty());
    }

    #[test]
    fn nested_values_compare_structurally() {
        let source = lead(json!({"tags": ["a", "b"], "meta": {"x": 1}}));
        let same = lead(json!({"tags": ["a", "b"], "meta": {"x": 1}}));
        let other = lead(json!({"tags": ["a"], "meta": {"x": 1}}));
        assert!(diff_fields(&source, &same).is_empty());
        let diff = diff_fields(&source, &other);
        assert_eq!(diff.fields().collect::<Vec<_>>(), vec!["tags"]);
    }

    #[test]
    fn type_change_detected() {
        let source = lead(json!({"id": 1}));
        let incoming = lead(json!({"id": "1"}));
        assert_eq!(diff_fields(&source, &incoming).modifications(), 1);
    }

    #[test]
    fn follows_incoming_field_order() {
        let source = lead(json!({"a": 1, "b": 1, "c": 1}));
        let incoming = lead(json!({"c": 2, "a": 2, "b": 2}));
        let diff = diff_fields(&source, &incoming);
        let order: Vec<&str> = diff.fields().collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn serializes_as_from_to_map() {
        let source = lead(json!({"name": "A"}));
        let incoming = lead(json!({"name": "B", "city": "Oslo"}));
        let value = serde_json::to_value(diff_fields(&source, &incoming)).unwrap();
        assert_eq!(
            value,
            json!({
                "name": {"from": "A", "to": "B"},
                "city": {"to": "Oslo"}
            })
        );
    }
}
