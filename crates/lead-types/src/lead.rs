use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::date::EntryDate;
use crate::error::TypeError;
use crate::fields::FieldNames;
use crate::key::LeadKey;

/// A lead record: an ordered map of field name to JSON value.
///
/// Field order is preserved as read and through merges. Serializes as a
/// plain JSON object.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lead(Map<String, Value>);

impl Lead {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get a field value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Set a field, returning the previous value.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(field.into(), value)
    }

    /// Iterate over fields in record order.
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume the record, returning the underlying map.
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// The primary dedup key, if the record has one.
    pub fn id_key(&self, names: &FieldNames) -> Option<LeadKey> {
        LeadKey::from_value(self.get(&names.id))
    }

    /// The secondary dedup key, if the record has one.
    pub fn email_key(&self, names: &FieldNames, normalize: bool) -> Option<LeadKey> {
        LeadKey::email(self.get(&names.email), normalize)
    }

    /// The parsed recency timestamp.
    pub fn entry_date(&self, names: &FieldNames) -> EntryDate {
        EntryDate::from_value(self.get(&names.entry_date))
    }

    /// Lay `incoming` over this record.
    ///
    /// Every field of `incoming` overwrites the same field here; fields only
    /// present here are kept in place, and fields new to this record are
    /// appended in `incoming`'s order.
    pub fn overlay(&self, incoming: &Lead) -> Lead {
        let mut merged = self.0.clone();
        for (field, value) in &incoming.0 {
            merged.insert(field.clone(), value.clone());
        }
        Lead(merged)
    }
}

impl From<Map<String, Value>> for Lead {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Lead> for Value {
    fn from(lead: Lead) -> Self {
        Value::Object(lead.0)
    }
}

impl TryFrom<Value> for Lead {
    type Error = TypeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Err(TypeError::NotAnObject("null")),
            Value::Bool(_) => Err(TypeError::NotAnObject("boolean")),
            Value::Number(_) => Err(TypeError::NotAnObject("number")),
            Value::String(_) => Err(TypeError::NotAnObject("string")),
            Value::Array(_) => Err(TypeError::NotAnObject("array")),
        }
    }
}
