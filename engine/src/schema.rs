//! Field descriptor tables.
//!
//! Each entity type describes which fields are searchable, which are
//! sortable (and how), and which fields a payload must carry. The listing
//! pipeline is driven entirely by these tables.

use crate::{error::Result, EntityKind, Error, Record};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Pulls a comparable string out of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extractor {
    /// A (possibly nested) field path.
    Field(&'static [&'static str]),
    /// `user.first_name` + `" "` + `user.last_name`.
    FullName,
}

impl Extractor {
    /// Raw (not normalized) text of the field.
    pub fn raw(&self, record: &Record) -> String {
        match self {
            Extractor::Field(path) => record.text(path),
            Extractor::FullName => record.full_name(),
        }
    }

    /// Lower-cased text of the field; missing values yield `""`.
    pub fn extract(&self, record: &Record) -> String {
        self.raw(record).to_lowercase()
    }

    /// Numeric value of the field. Full names are never numeric.
    pub fn number(&self, record: &Record) -> Option<f64> {
        match self {
            Extractor::Field(path) => record.number(path),
            Extractor::FullName => None,
        }
    }
}

/// A field the search box matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchField {
    pub name: &'static str,
    pub extractor: Extractor,
}

impl SearchField {
    pub const fn new(name: &'static str, extractor: Extractor) -> Self {
        Self { name, extractor }
    }
}

/// How a sortable column compares its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKind {
    /// Lower-cased string comparison.
    Text,
    /// Numeric comparison; records without a number sort first.
    Numeric,
}

/// A column the listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortField {
    pub name: &'static str,
    pub kind: SortKind,
    pub extractor: Extractor,
}

impl SortField {
    pub const fn text(name: &'static str, extractor: Extractor) -> Self {
        Self {
            name,
            kind: SortKind::Text,
            extractor,
        }
    }

    pub const fn numeric(name: &'static str, extractor: Extractor) -> Self {
        Self {
            name,
            kind: SortKind::Numeric,
            extractor,
        }
    }

    /// Ascending comparison of two records on this field.
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        match self.kind {
            SortKind::Text => self.extractor.extract(a).cmp(&self.extractor.extract(b)),
            SortKind::Numeric => {
                match (self.extractor.number(a), self.extractor.number(b)) {
                    (Some(x), Some(y)) => x.total_cmp(&y),
                    (None, Some(_)) => Ordering::Less,
                    (Some(_), None) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                }
            }
        }
    }
}

/// Field types accepted in create/update payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Int,
    /// A list of strings (e.g. the days a subject meets).
    StringList,
    /// Arbitrary nested JSON
    Json,
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::String => write!(f, "String"),
            FieldType::Int => write!(f, "Int"),
            FieldType::StringList => write!(f, "StringList"),
            FieldType::Json => write!(f, "Json"),
        }
    }
}

/// Definition of a payload field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDef {
    /// Field name
    pub name: String,
    /// Field type
    pub field_type: FieldType,
    /// Whether this field is required
    pub required: bool,
}

impl FieldDef {
    /// Create a new required field definition.
    pub fn required(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: true,
        }
    }

    /// Create a new optional field definition.
    pub fn optional(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
        }
    }

    /// Validate a JSON value against this field definition.
    ///
    /// Empty strings count as missing for required fields, matching how the
    /// forms treat blank inputs.
    pub fn validate(&self, value: Option<&serde_json::Value>) -> Result<()> {
        match value {
            None | Some(serde_json::Value::Null) if self.required => {
                Err(Error::MissingRequiredField(self.name.clone()))
            }
            None | Some(serde_json::Value::Null) => Ok(()),
            Some(serde_json::Value::String(s)) if self.required && s.trim().is_empty() => {
                Err(Error::MissingRequiredField(self.name.clone()))
            }
            Some(v) => self.validate_type(v),
        }
    }

    fn validate_type(&self, value: &serde_json::Value) -> Result<()> {
        let valid = match self.field_type {
            FieldType::String => value.is_string() || value.is_number(),
            // Form inputs arrive as text, so numeric strings are accepted.
            FieldType::Int => {
                value.is_i64()
                    || value.is_u64()
                    || value
                        .as_str()
                        .is_some_and(|s| s.trim().parse::<i64>().is_ok())
            }
            FieldType::StringList => value
                .as_array()
                .is_some_and(|items| items.iter().all(|item| item.is_string())),
            FieldType::Json => true,
        };

        if valid {
            Ok(())
        } else {
            Err(Error::TypeMismatch {
                field: self.name.clone(),
                expected: self.field_type.to_string(),
                got: json_type_name(value).to_string(),
            })
        }
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "Null",
        serde_json::Value::Bool(_) => "Bool",
        serde_json::Value::Number(n) if n.is_i64() || n.is_u64() => "Int",
        serde_json::Value::Number(_) => "Float",
        serde_json::Value::String(_) => "String",
        serde_json::Value::Array(_) => "Array",
        serde_json::Value::Object(_) => "Object",
    }
}

/// The descriptor table for one entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySchema {
    pub entity: EntityKind,
    pub searchable: Vec<SearchField>,
    pub sortable: Vec<SortField>,
    pub fields: Vec<FieldDef>,
}

impl EntitySchema {
    /// Look up a sortable column by name.
    pub fn sort_field(&self, name: &str) -> Option<&SortField> {
        self.sortable.iter().find(|field| field.name == name)
    }

    /// Names of all sortable columns, in display order.
    pub fn sortable_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.sortable.iter().map(|field| field.name)
    }
}
