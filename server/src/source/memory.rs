//! In-memory data source, for tests and local demos.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use campus_engine::{EntityKind, Record};
use serde_json::Value;

use super::{DataSource, SourceError};

/// Holds collections in memory. Can be switched into a failing state to
/// simulate an unreachable API.
#[derive(Debug, Default)]
pub struct MemorySource {
    collections: RwLock<HashMap<EntityKind, Vec<Value>>>,
    offline: AtomicBool,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style seeding of one collection.
    pub fn with_collection(self, entity: EntityKind, records: Vec<Value>) -> Self {
        self.write().insert(entity, records);
        self
    }

    /// Make every call fail (or succeed again).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> Result<(), SourceError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(SourceError::Unavailable("memory source is offline".into()))
        } else {
            Ok(())
        }
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<EntityKind, Vec<Value>>> {
        self.collections
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<EntityKind, Vec<Value>>> {
        self.collections
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn id_of(value: &Value) -> String {
    Record::new(value.clone()).id()
}

fn not_found(entity: EntityKind, id: &str) -> SourceError {
    SourceError::Status {
        status: 404,
        message: format!("{entity} {id} not found"),
    }
}

#[async_trait]
impl DataSource for MemorySource {
    async fn fetch_all(
        &self,
        entity: EntityKind,
        _token: Option<&str>,
    ) -> Result<Vec<Record>, SourceError> {
        self.ensure_online()?;
        let records = self
            .read()
            .get(&entity)
            .map(|items| items.iter().cloned().map(Record::new).collect())
            .unwrap_or_default();
        Ok(records)
    }

    async fn create(
        &self,
        entity: EntityKind,
        mut payload: Value,
        _token: Option<&str>,
    ) -> Result<Value, SourceError> {
        self.ensure_online()?;
        let mut collections = self.write();
        let items = collections.entry(entity).or_default();

        let next_id = items
            .iter()
            .filter_map(|item| item.get("id").and_then(Value::as_u64))
            .max()
            .unwrap_or(0)
            + 1;
        if let Some(obj) = payload.as_object_mut() {
            obj.insert("id".into(), Value::from(next_id));
        }

        items.push(payload.clone());
        Ok(payload)
    }

    async fn update(
        &self,
        entity: EntityKind,
        payload: Value,
        _token: Option<&str>,
    ) -> Result<Value, SourceError> {
        self.ensure_online()?;
        let id = id_of(&payload);
        let mut collections = self.write();
        let slot = collections
            .get_mut(&entity)
            .and_then(|items| items.iter_mut().find(|item| id_of(item) == id))
            .ok_or_else(|| not_found(entity, &id))?;

        *slot = payload.clone();
        Ok(payload)
    }

    async fn delete(
        &self,
        entity: EntityKind,
        id: &str,
        _token: Option<&str>,
    ) -> Result<(), SourceError> {
        self.ensure_online()?;
        let mut collections = self.write();
        let items = collections
            .get_mut(&entity)
            .ok_or_else(|| not_found(entity, id))?;

        let before = items.len();
        items.retain(|item| id_of(item) != id);
        if items.len() == before {
            return Err(not_found(entity, id));
        }
        Ok(())
    }
}
