//! Data sources for entity collections.
//!
//! The school REST API is the system of record. The service only ever asks
//! it for whole collections and forwards single-record writes.

mod http;
mod memory;

pub use http::HttpSource;
pub use memory::MemorySource;

use async_trait::async_trait;
use campus_engine::{EntityKind, Record};
use serde_json::Value;

/// Errors raised while talking to a data source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("upstream returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("source unavailable: {0}")]
    Unavailable(String),
}

/// Something that can produce and modify entity collections.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// The full, unfiltered, unsorted collection for `entity`.
    async fn fetch_all(
        &self,
        entity: EntityKind,
        token: Option<&str>,
    ) -> Result<Vec<Record>, SourceError>;

    /// Create a record and return what the source stored.
    async fn create(
        &self,
        entity: EntityKind,
        payload: Value,
        token: Option<&str>,
    ) -> Result<Value, SourceError>;

    /// Replace a record. `payload` carries the record's `id`.
    async fn update(
        &self,
        entity: EntityKind,
        payload: Value,
        token: Option<&str>,
    ) -> Result<Value, SourceError>;

    /// Delete a record by id.
    async fn delete(
        &self,
        entity: EntityKind,
        id: &str,
        token: Option<&str>,
    ) -> Result<(), SourceError>;
}

/// Accept either a bare array or a paginated `{"results": [...]}` body.
pub(crate) fn collection_from_body(body: Value) -> Result<Vec<Record>, SourceError> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("results") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(SourceError::Decode(
                    "expected an array or an object with `results`".into(),
                ))
            }
        },
        other => {
            return Err(SourceError::Decode(format!(
                "expected an array, got {}",
                match other {
                    Value::Null => "null",
                    Value::Bool(_) => "a boolean",
                    Value::Number(_) => "a number",
                    _ => "a string",
                }
            )))
        }
    };

    Ok(items.into_iter().map(Record::new).collect())
}
