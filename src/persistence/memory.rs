//! In-memory document store.
//!
//! Collections live in a `DashMap`; each collection is an ordered map from id
//! to record so listings are stable.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

use crate::config::{PersistenceConfig, PersistenceDriver};
use crate::persistence::{Connection, Persistence, PersistenceError, Store, StoreError, ID_FIELD};

#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: DashMap<String, BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn ensure_collection(&self, collection: &str) {
        self.collections.entry(collection.to_string()).or_default();
    }

    fn collections(&self) -> Vec<String> {
        let mut names: Vec<String> = self.collections.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    fn insert(&self, collection: &str, mut record: Value) -> Result<Value, StoreError> {
        let object = record.as_object_mut().ok_or(StoreError::NotAnObject)?;
        let id = match object.get(ID_FIELD) {
            Some(Value::String(id)) => id.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(_) => return Err(StoreError::InvalidId),
            None => uuid::Uuid::new_v4().to_string(),
        };
        object.insert(ID_FIELD.to_string(), Value::String(id.clone()));

        let mut records = self.collections.entry(collection.to_string()).or_default();
        if records.contains_key(&id) {
            return Err(StoreError::DuplicateId(id));
        }
        records.insert(id, record.clone());
        Ok(record)
    }

    fn list(&self, collection: &str) -> Vec<Value> {
        self.collections
            .get(collection)
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default()
    }

    fn get(&self, collection: &str, id: &str) -> Option<Value> {
        self.collections.get(collection)?.get(id).cloned()
    }

    fn replace(&self, collection: &str, id: &str, mut record: Value) -> Result<Option<Value>, StoreError> {
        let object = record.as_object_mut().ok_or(StoreError::NotAnObject)?;
        object.insert(ID_FIELD.to_string(), Value::String(id.to_string()));

        let Some(mut records) = self.collections.get_mut(collection) else {
            return Ok(None);
        };
        match records.get_mut(id) {
            Some(existing) => {
                *existing = record.clone();
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    fn remove(&self, collection: &str, id: &str) -> Option<Value> {
        self.collections.get_mut(collection)?.remove(id)
    }
}

/// Initializer for the `memory` driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryPersistence;

#[async_trait]
impl Persistence for MemoryPersistence {
    async fn init(&self, config: &PersistenceConfig) -> Result<Connection, PersistenceError> {
        match config.driver {
            PersistenceDriver::Memory => {
                tracing::debug!("Using in-memory persistence");
                Ok(Arc::new(MemoryStore::new()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_assigns_id() {
        let store = MemoryStore::new();
        let record = store.insert("posts", json!({ "title": "hi" })).unwrap();
        let id = record["id"].as_str().unwrap();
        assert_eq!(store.get("posts", id), Some(record.clone()));
        assert_eq!(store.list("posts"), vec![record]);
    }

    #[test]
    fn test_insert_rejects_duplicates_and_non_objects() {
        let store = MemoryStore::new();
        store.insert("posts", json!({ "id": "1" })).unwrap();
        assert_eq!(
            store.insert("posts", json!({ "id": "1" })),
            Err(StoreError::DuplicateId("1".into()))
        );
        assert_eq!(store.insert("posts", json!([1, 2])), Err(StoreError::NotAnObject));
        assert_eq!(store.insert("posts", json!({ "id": true })), Err(StoreError::InvalidId));
    }

    #[test]
    fn test_replace_and_remove() {
        let store = MemoryStore::new();
        store.insert("posts", json!({ "id": "1", "title": "a" })).unwrap();

        let replaced = store.replace("posts", "1", json!({ "title": "b" })).unwrap();
        assert_eq!(replaced, Some(json!({ "id": "1", "title": "b" })));
        assert_eq!(store.replace("posts", "2", json!({})).unwrap(), None);

        assert!(store.remove("posts", "1").is_some());
        assert!(store.get("posts", "1").is_none());
        assert!(store.remove("missing", "1").is_none());
    }

    #[test]
    fn test_ensure_collection() {
        let store = MemoryStore::new();
        store.ensure_collection("users");
        store.ensure_collection("users");
        assert_eq!(store.collections(), vec!["users".to_string()]);
        assert!(store.list("users").is_empty());
    }

    #[tokio::test]
    async fn test_memory_persistence_init() {
        let connection = MemoryPersistence.init(&PersistenceConfig::default()).await.unwrap();
        assert!(connection.collections().is_empty());
    }
}
