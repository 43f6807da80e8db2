//! Scalar values and ordered field maps.
//!
//! [`Value`] is the tagged union of everything the layer will bind into a
//! statement. Anything outside it is rejected at the boundary by the type
//! system rather than silently stringified.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::MySql;
use sqlx::mysql::MySqlArguments;

/// A scalar parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// NULL value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value (stored as i64 for maximum range)
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value
    Text(String),
    /// Date/time value (no timezone; MySQL DATETIME semantics)
    DateTime(NaiveDateTime),
}

impl Value {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Get the type name of this value for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::DateTime(_) => "datetime",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Self::DateTime(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Self::DateTime(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Self::Null)
    }
}

/// Bind a value to a MySQL query as a driver-level parameter.
pub(crate) fn bind_value<'q>(
    query: sqlx::query::Query<'q, MySql, MySqlArguments>,
    value: &'q Value,
) -> sqlx::query::Query<'q, MySql, MySqlArguments> {
    match value {
        Value::Null => query.bind(None::<String>),
        Value::Bool(v) => query.bind(*v),
        Value::Int(v) => query.bind(*v),
        Value::Float(v) => query.bind(*v),
        Value::Text(v) => query.bind(v.as_str()),
        Value::DateTime(v) => query.bind(*v),
    }
}

/// An ordered column-name to value mapping.
///
/// Insertion order is significant: column lists and placeholders are rendered
/// in exactly this order. Re-inserting an existing key replaces its value in
/// place, so a key never renders twice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    entries: Vec<(String, Value)>,
}

impl FieldMap {
    /// Create an empty field map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a column value, replacing any existing entry for the same key.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == column) {
            Some((_, v)) => *v = value,
            None => self.entries.push((column, value)),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    /// Get the value for a column, if present.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == column)
            .map(|(_, v)| v)
    }

    /// Column names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_conversions() {
        assert_eq!(Value::from(42), Value::Int(42));
        assert_eq!(Value::from("a"), Value::Text("a".to_string()));
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some(true)), Value::Bool(true));
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Int(7).as_int(), Some(7));
        assert_eq!(Value::Text("x".into()).as_text(), Some("x"));
        assert!(Value::Null.is_null());
        assert_eq!(Value::Float(1.5).type_name(), "float");
    }

    #[test]
    fn test_field_map_preserves_insertion_order() {
        let map = FieldMap::new()
            .with("zeta", 1)
            .with("alpha", 2)
            .with("mid", 3);
        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_field_map_replace_keeps_position() {
        let map = FieldMap::new().with("a", 1).with("b", 2).with("a", 9);
        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(map.get("a"), Some(&Value::Int(9)));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_field_map_from_iterator() {
        let map: FieldMap = [("name", "A"), ("city", "B")].into_iter().collect();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("city"), Some(&Value::Text("B".to_string())));
    }
}
