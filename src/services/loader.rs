//! Service loaders.
//!
//! A loader turns one `(name, definition)` pair into a registered service.
//! Loaders are built per boot from the config, the app and the persistence
//! connection through a [`LoaderFactory`].

use std::sync::Arc;

use crate::app::App;
use crate::config::{ActerConfig, ServiceDefinition};
use crate::persistence::Connection;
use crate::services::collection::CollectionService;
use crate::services::error::ServiceError;
use crate::services::hooked::ServiceHandle;

pub trait ServiceLoader: Send + Sync {
    fn load(&self, name: &str, definition: &ServiceDefinition) -> Result<ServiceHandle, ServiceError>;
}

/// Builds the loader once persistence is available.
pub type LoaderFactory =
    Arc<dyn Fn(Arc<ActerConfig>, App, Connection) -> Arc<dyn ServiceLoader> + Send + Sync>;

/// Default loader: one [`CollectionService`] per definition, keyed by `model`.
pub struct CollectionLoader {
    app: App,
    connection: Connection,
}

impl CollectionLoader {
    pub fn new(app: App, connection: Connection) -> Self {
        Self { app, connection }
    }

    pub fn factory() -> LoaderFactory {
        Arc::new(|_config, app, connection| Arc::new(CollectionLoader::new(app, connection)))
    }
}

impl ServiceLoader for CollectionLoader {
    fn load(&self, name: &str, definition: &ServiceDefinition) -> Result<ServiceHandle, ServiceError> {
        if definition.model.is_empty() {
            return Err(ServiceError::BadRequest(format!("service `{}` has no model", name)));
        }
        if definition.auto {
            self.connection.ensure_collection(&definition.model);
        }

        let service = CollectionService::new(&definition.model, self.connection.clone());
        Ok(self.app.use_service(name, service))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, Store};

    #[test]
    fn test_auto_creates_collection_eagerly() {
        let app = App::new();
        let store = Arc::new(MemoryStore::new());
        let loader = CollectionLoader::new(app.clone(), store.clone());

        loader.load("posts", &ServiceDefinition::new("posts")).unwrap();
        assert!(store.collections().is_empty());

        loader.load("users", &ServiceDefinition::new("people").auto(true)).unwrap();
        assert_eq!(store.collections(), vec!["people".to_string()]);

        assert!(app.service("posts").is_some());
        assert!(app.service("users").is_some());
    }
}
