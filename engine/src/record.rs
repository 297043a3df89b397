//! Record types for listed data.
//!
//! A [`Record`] is a read-only snapshot of one row returned by the school
//! API. Field access is null-safe: anything missing reads as empty.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single record as received from the data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Value);

impl Record {
    /// Wrap a JSON value.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Look up a nested value by path segments.
    pub fn get(&self, path: &[&str]) -> Option<&Value> {
        path.iter()
            .try_fold(&self.0, |value, segment| value.as_object()?.get(*segment))
    }

    /// Text of a nested field, or `""` when missing or not scalar.
    pub fn text(&self, path: &[&str]) -> String {
        match self.get(path) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }

    /// Numeric value of a nested field.
    ///
    /// Numeric strings (`"00123"`, `" 42 "`) are accepted since the API
    /// serializes some identifiers as text. `"NaN"` and `"inf"` are not numbers.
    pub fn number(&self, path: &[&str]) -> Option<f64> {
        let n = match self.get(path)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }?;
        n.is_finite().then_some(n)
    }

    /// The record's `id` as text.
    pub fn id(&self) -> String {
        self.text(&["id"])
    }

    /// `"first last"` built from the nested `user` mapping.
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.text(&["user", "first_name"]),
            self.text(&["user", "last_name"])
        )
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
