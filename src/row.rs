//! Result-row decoding.
//!
//! Decoding is two-phase: the MySQL column type name is classified into a
//! [`TypeCategory`], then a category-specific decoder extracts the value.
//! NULL is checked before any typed decode.

use crate::value::Value;
use sqlx::mysql::MySqlRow;
use sqlx::{Column, Row as _, TypeInfo};

/// Logical category for MySQL column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TypeCategory {
    Integer,
    Float,
    Decimal,
    Boolean,
    DateTime,
    Json,
    Text,
}

/// Classify a MySQL type name into a logical category.
pub(crate) fn categorize_type(type_name: &str) -> TypeCategory {
    let lower = type_name.to_lowercase();

    // Decimal first: "decimal" would otherwise hit the integer check via "int"
    // in some aliases.
    if lower.contains("decimal") || lower.contains("numeric") {
        return TypeCategory::Decimal;
    }

    if lower == "boolean" || lower == "bool" {
        return TypeCategory::Boolean;
    }

    if lower.contains("int") || lower == "year" {
        return TypeCategory::Integer;
    }

    if lower.contains("float") || lower.contains("double") {
        return TypeCategory::Float;
    }

    if lower == "datetime" || lower == "timestamp" {
        return TypeCategory::DateTime;
    }

    if lower == "json" {
        return TypeCategory::Json;
    }

    // varchar, char, text, enum, date, time, blob and everything else
    TypeCategory::Text
}

/// A decoded result row: column names and values in select order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    /// Get the value for a column by name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i))
    }

    /// Column names in select order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Values in select order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate (column, value) pairs in select order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    #[cfg(test)]
    pub(crate) fn from_pairs(pairs: Vec<(&str, Value)>) -> Self {
        let (columns, values): (Vec<String>, Vec<Value>) = pairs
            .into_iter()
            .map(|(c, v)| (c.to_string(), v))
            .unzip();
        Self { columns, values }
    }
}

impl From<&MySqlRow> for Row {
    fn from(row: &MySqlRow) -> Self {
        let mut columns = Vec::with_capacity(row.columns().len());
        let mut values = Vec::with_capacity(row.columns().len());
        for (idx, col) in row.columns().iter().enumerate() {
            let category = categorize_type(col.type_info().name());
            columns.push(col.name().to_string());
            values.push(decode_column(row, idx, category));
        }
        Self { columns, values }
    }
}

fn decode_column(row: &MySqlRow, idx: usize, category: TypeCategory) -> Value {
    match category {
        TypeCategory::Integer => decode_integer(row, idx),
        TypeCategory::Float => decode_float(row, idx),
        TypeCategory::Decimal => decode_decimal(row, idx),
        TypeCategory::Boolean => decode_boolean(row, idx),
        TypeCategory::DateTime => decode_datetime(row, idx),
        TypeCategory::Json => decode_json(row, idx),
        TypeCategory::Text => decode_text(row, idx),
    }
}

fn decode_integer(row: &MySqlRow, idx: usize) -> Value {
    if let Ok(Some(v)) = row.try_get::<Option<i64>, _>(idx) {
        return Value::Int(v);
    }
    // BIGINT UNSIGNED above i64::MAX; render as text rather than wrap
    if let Ok(Some(v)) = row.try_get::<Option<u64>, _>(idx) {
        return match i64::try_from(v) {
            Ok(v) => Value::Int(v),
            Err(_) => Value::Text(v.to_string()),
        };
    }
    Value::Null
}

fn decode_float(row: &MySqlRow, idx: usize) -> Value {
    if let Ok(Some(v)) = row.try_get::<Option<f64>, _>(idx) {
        return Value::Float(v);
    }
    if let Ok(Some(v)) = row.try_get::<Option<f32>, _>(idx) {
        return Value::Float(v as f64);
    }
    Value::Null
}

fn decode_decimal(row: &MySqlRow, idx: usize) -> Value {
    // Preserve the exact database representation instead of losing precision
    // through f64.
    match row.try_get::<Option<String>, _>(idx) {
        Ok(Some(v)) => Value::Text(v),
        Ok(None) => Value::Null,
        Err(e) => {
            tracing::error!(column = idx, error = %e, "Failed to decode DECIMAL");
            Value::Null
        }
    }
}

fn decode_boolean(row: &MySqlRow, idx: usize) -> Value {
    row.try_get::<Option<bool>, _>(idx)
        .ok()
        .flatten()
        .map(Value::Bool)
        .unwrap_or(Value::Null)
}

fn decode_datetime(row: &MySqlRow, idx: usize) -> Value {
    row.try_get::<Option<chrono::NaiveDateTime>, _>(idx)
        .ok()
        .flatten()
        .map(Value::DateTime)
        .unwrap_or(Value::Null)
}

fn decode_json(row: &MySqlRow, idx: usize) -> Value {
    // The value union has no structured variant; JSON comes back as its
    // serialized text.
    row.try_get::<Option<serde_json::Value>, _>(idx)
        .ok()
        .flatten()
        .map(|v| Value::Text(v.to_string()))
        .unwrap_or(Value::Null)
}

fn decode_text(row: &MySqlRow, idx: usize) -> Value {
    if let Ok(Some(v)) = row.try_get::<Option<String>, _>(idx) {
        return Value::Text(v);
    }
    // BLOB columns: lossy UTF-8 rather than an opaque failure
    if let Ok(Some(v)) = row.try_get::<Option<Vec<u8>>, _>(idx) {
        return Value::Text(String::from_utf8_lossy(&v).into_owned());
    }
    Value::Null
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_integer_types() {
        assert_eq!(categorize_type("TINYINT"), TypeCategory::Integer);
        assert_eq!(categorize_type("BIGINT UNSIGNED"), TypeCategory::Integer);
        assert_eq!(categorize_type("YEAR"), TypeCategory::Integer);
    }

    #[test]
    fn test_categorize_decimal_before_integer() {
        assert_eq!(categorize_type("DECIMAL"), TypeCategory::Decimal);
        assert_eq!(categorize_type("NUMERIC"), TypeCategory::Decimal);
    }

    #[test]
    fn test_categorize_float_types() {
        assert_eq!(categorize_type("FLOAT"), TypeCategory::Float);
        assert_eq!(categorize_type("DOUBLE"), TypeCategory::Float);
    }

    #[test]
    fn test_categorize_temporal_types() {
        assert_eq!(categorize_type("DATETIME"), TypeCategory::DateTime);
        assert_eq!(categorize_type("TIMESTAMP"), TypeCategory::DateTime);
        // DATE and TIME come back as text, matching date-strings behavior
        assert_eq!(categorize_type("DATE"), TypeCategory::Text);
        assert_eq!(categorize_type("TIME"), TypeCategory::Text);
    }

    #[test]
    fn test_categorize_boolean_json_and_text() {
        assert_eq!(categorize_type("BOOLEAN"), TypeCategory::Boolean);
        assert_eq!(categorize_type("JSON"), TypeCategory::Json);
        assert_eq!(categorize_type("VARCHAR"), TypeCategory::Text);
        assert_eq!(categorize_type("BLOB"), TypeCategory::Text);
    }

    #[test]
    fn test_row_get_by_name() {
        let row = Row::from_pairs(vec![
            ("id", Value::Int(1)),
            ("name", Value::Text("A".into())),
        ]);
        assert_eq!(row.get("id"), Some(&Value::Int(1)));
        assert_eq!(row.get("name"), Some(&Value::Text("A".into())));
        assert!(row.get("missing").is_none());
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn test_row_iter_preserves_select_order() {
        let row = Row::from_pairs(vec![
            ("b", Value::Int(2)),
            ("a", Value::Int(1)),
        ]);
        let cols: Vec<&str> = row.iter().map(|(c, _)| c).collect();
        assert_eq!(cols, vec!["b", "a"]);
    }
}
