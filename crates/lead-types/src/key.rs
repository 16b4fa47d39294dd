use std::fmt;

use serde_json::{Number, Value};

/// Largest magnitude at which every integer is exactly representable as `f64`.
const MAX_EXACT_FLOAT_INT: f64 = 9_007_199_254_740_992.0;

/// Hashable identity of an `id` or `email` value.
///
/// Keys compare by their exact JSON value, so the number `1` and the string
/// `"1"` are different keys. Numbers compare by value, so `1`, `1.0` and
/// `1e0` are the same key. Absent and `null` values produce no key.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LeadKey(String);

impl LeadKey {
    /// Build a key from a field value.
    pub fn from_value(value: Option<&Value>) -> Option<Self> {
        match value? {
            Value::Null => None,
            Value::Number(n) => Some(Self(canonical_number(n))),
            other => Some(Self(other.to_string())),
        }
    }

    /// Build an email key, optionally trimming and lowercasing string values.
    pub fn email(value: Option<&Value>, normalize: bool) -> Option<Self> {
        match value? {
            Value::String(s) if normalize => {
                Self::from_value(Some(&Value::String(s.trim().to_lowercase())))
            }
            other => Self::from_value(Some(other)),
        }
    }

    /// The canonical JSON text of the key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Integral floats render as integers; `-0.0` renders as `0`.
fn canonical_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() <= MAX_EXACT_FLOAT_INT => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}

impl fmt::Debug for LeadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LeadKey({})", self.0)
    }
}

impl fmt::Display for LeadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
