//! Persistence subsystem.
//!
//! # Data Flow
//! ```text
//! PersistenceConfig
//!     → Persistence::init (awaited by the boot sequence)
//!     → Connection (Arc<dyn Store>)
//!     → handed to the service loader
//! ```
//!
//! # Design Decisions
//! - Store operations are synchronous; init is the only suspension point
//! - Records are JSON objects identified by a string `id`
//! - Drivers are selected by `server.persistence.driver`

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::PersistenceConfig;

pub use memory::{MemoryPersistence, MemoryStore};

/// Field holding a record's identifier.
pub const ID_FIELD: &str = "id";

/// Shared handle to an initialized store.
pub type Connection = Arc<dyn Store>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("records must be JSON objects")]
    NotAnObject,
    #[error("record ids must be strings")]
    InvalidId,
    #[error("a record with id `{0}` already exists")]
    DuplicateId(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("persistence initialization failed: {0}")]
    Init(String),
}

/// Document store of named collections.
pub trait Store: Send + Sync {
    /// Create `collection` if it does not exist yet.
    fn ensure_collection(&self, collection: &str);

    fn collections(&self) -> Vec<String>;

    /// Insert a record, assigning an id when it has none. Returns the stored record.
    fn insert(&self, collection: &str, record: Value) -> Result<Value, StoreError>;

    fn list(&self, collection: &str) -> Vec<Value>;

    fn get(&self, collection: &str, id: &str) -> Option<Value>;

    /// Replace an existing record. Returns `None` when the id is unknown.
    fn replace(&self, collection: &str, id: &str, record: Value) -> Result<Option<Value>, StoreError>;

    fn remove(&self, collection: &str, id: &str) -> Option<Value>;
}

/// Persistence initializer consumed by the boot sequence.
#[async_trait]
pub trait Persistence: Send + Sync {
    async fn init(&self, config: &PersistenceConfig) -> Result<Connection, PersistenceError>;
}
