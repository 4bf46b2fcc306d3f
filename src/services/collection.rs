//! Collection-backed CRUD service.
//!
//! Maps a definition's model onto a store collection.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::persistence::{Connection, ID_FIELD};
use crate::services::error::ServiceError;
use crate::services::service::{Params, Service};

pub struct CollectionService {
    model: String,
    store: Connection,
}

impl CollectionService {
    pub fn new(model: impl Into<String>, store: Connection) -> Self {
        Self {
            model: model.into(),
            store,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn not_found(&self, id: &str) -> ServiceError {
        ServiceError::NotFound(format!("No record found in `{}` for id `{}`", self.model, id))
    }

    fn insert(&self, record: Value) -> Result<Value, ServiceError> {
        Ok(self.store.insert(&self.model, record)?)
    }
}

/// Equality filter. Query keys starting with `$` are reserved and ignored;
/// string query values also match numbers and booleans by their text form.
fn matches_query(record: &Value, query: &Map<String, Value>) -> bool {
    query
        .iter()
        .filter(|(key, _)| !key.starts_with('$'))
        .all(|(key, expected)| match (record.get(key), expected) {
            (Some(actual), expected) if actual == expected => true,
            (Some(actual @ (Value::Number(_) | Value::Bool(_))), Value::String(text)) => {
                actual.to_string() == *text
            }
            _ => false,
        })
}

#[async_trait]
impl Service for CollectionService {
    fn kind(&self) -> &str {
        &self.model
    }

    async fn find(&self, params: &Params) -> Result<Value, ServiceError> {
        let records = self
            .store
            .list(&self.model)
            .into_iter()
            .filter(|record| matches_query(record, &params.query))
            .collect();
        Ok(Value::Array(records))
    }

    async fn get(&self, id: &str, _params: &Params) -> Result<Value, ServiceError> {
        self.store
            .get(&self.model, id)
            .ok_or_else(|| self.not_found(id))
    }

    async fn create(&self, data: Value, _params: &Params) -> Result<Value, ServiceError> {
        match data {
            Value::Array(items) => items
                .into_iter()
                .map(|item| self.insert(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            record => self.insert(record),
        }
    }

    async fn update(&self, id: &str, data: Value, _params: &Params) -> Result<Value, ServiceError> {
        self.store
            .replace(&self.model, id, data)?
            .ok_or_else(|| self.not_found(id))
    }

    async fn patch(&self, id: &str, data: Value, _params: &Params) -> Result<Value, ServiceError> {
        let Value::Object(changes) = data else {
            return Err(ServiceError::BadRequest("patch data must be a JSON object".into()));
        };
        let mut record = self
            .store
            .get(&self.model, id)
            .ok_or_else(|| self.not_found(id))?;

        if let Some(fields) = record.as_object_mut() {
            for (key, value) in changes {
                if key != ID_FIELD {
                    fields.insert(key, value);
                }
            }
        }

        self.store
            .replace(&self.model, id, record)?
            .ok_or_else(|| self.not_found(id))
    }

    async fn remove(&self, id: Option<&str>, _params: &Params) -> Result<Value, ServiceError> {
        let id = id.ok_or_else(|| {
            ServiceError::BadRequest(format!("Removing all records of `{}` is not allowed", self.model))
        })?;
        self.store
            .remove(&self.model, id)
            .ok_or_else(|| self.not_found(id))
    }
}
