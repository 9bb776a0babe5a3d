use std::fmt;
use std::hash::{Hash, Hasher};

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single row: field name to value, in source column order.
pub type Record = IndexMap<String, Value>;

/// An ordered sequence of records.
pub type Batch = Vec<Record>;

// -2^63 and 2^63 are exact in f64; i64::MAX is not.
const I64_MIN_F: f64 = i64::MIN as f64;
const I64_MAX_F: f64 = 9_223_372_036_854_775_808.0;

/// Dynamically typed scalar carried by a [`Record`].
///
/// Codecs convert between this union and each format's native representation
/// explicitly; nested JSON (arrays, objects) is carried as its JSON text.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Best-effort integer view. Strings are parsed, integral floats within
    /// the i64 range are accepted.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Float(v) if v.fract() == 0.0 && *v >= I64_MIN_F && *v < I64_MAX_F => {
                Some(*v as i64)
            }
            Value::Bool(b) => Some(i64::from(*b)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Best-effort float view. Strings are parsed.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Best-effort boolean view. Accepts `true`/`false`/`1`/`0` text.
    pub fn to_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Int(0) => Some(false),
            Value::Int(1) => Some(true),
            Value::String(s) => match s.trim().to_lowercase().as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            // Bitwise so that Eq and Hash agree (NaN == NaN, 0.0 != -0.0).
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(v) => v.hash(state),
            Value::Float(v) => v.to_bits().hash(state),
            Value::String(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::String(s),
            nested => Value::String(nested.to_string()),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(v) => serde_json::Value::from(*v),
            // Non-finite floats have no JSON form.
            Value::Float(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(v) => serializer.serialize_i64(*v),
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::String(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

/// Build a [`Record`] from `(field, value)` pairs, keeping their order.
pub fn record_of<K, V, I>(pairs: I) -> Record
where
    K: Into<String>,
    V: Into<Value>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn json_numbers_keep_their_kind() {
        assert_eq!(Value::from(serde_json::json!(30)), Value::Int(30));
        assert_eq!(Value::from(serde_json::json!(9.5)), Value::Float(9.5));
        assert_eq!(Value::from(serde_json::json!("1")), Value::String("1".into()));
        assert_eq!(Value::from(serde_json::json!(null)), Value::Null);
    }

    #[test]
    fn nested_json_is_carried_as_text() {
        let v = Value::from(serde_json::json!({"a": [1, 2]}));
        assert_eq!(v, Value::String(r#"{"a":[1,2]}"#.into()));
    }

    #[test]
    fn string_and_int_are_distinct_set_keys() {
        let mut seen = HashSet::new();
        assert!(seen.insert(Value::Int(1)));
        assert!(seen.insert(Value::String("1".into())));
        assert!(!seen.insert(Value::Int(1)));
    }

    #[test]
    fn float_hash_matches_eq() {
        let mut seen = HashSet::new();
        assert!(seen.insert(Value::Float(f64::NAN)));
        assert!(!seen.insert(Value::Float(f64::NAN)));
        assert!(seen.insert(Value::Float(1.5)));
    }

    #[test]
    fn coercions() {
        assert_eq!(Value::from("42").to_i64(), Some(42));
        assert_eq!(Value::Float(3.0).to_i64(), Some(3));
        assert_eq!(Value::Float(3.5).to_i64(), None);
        assert_eq!(Value::Float(1e20).to_i64(), None);
        assert_eq!(Value::Float(-1e20).to_i64(), None);
        assert_eq!(Value::Float(9_223_372_036_854_775_808.0).to_i64(), None);
        assert_eq!(Value::Float(-9_223_372_036_854_775_808.0).to_i64(), Some(i64::MIN));
        assert_eq!(Value::Float(f64::NAN).to_i64(), None);
        assert_eq!(Value::from("2.5").to_f64(), Some(2.5));
        assert_eq!(Value::from("TRUE").to_bool(), Some(true));
        assert_eq!(Value::from("maybe").to_bool(), None);
    }

    #[test]
    fn record_builder_keeps_order() {
        let r = record_of([("b", Value::Int(1)), ("a", Value::Null)]);
        let keys: Vec<&str> = r.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }
}
