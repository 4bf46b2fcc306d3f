//! Service registration.
//!
//! # Responsibilities
//! - Load every configured definition, in key order
//! - Guarantee a `users` service exists, on the registry and on the app
//! - Hand back an immutable registry

use std::collections::BTreeMap;

use crate::app::App;
use crate::config::ServiceDefinition;
use crate::services::error::ServiceError;
use crate::services::hooked::ServiceHandle;
use crate::services::loader::ServiceLoader;

/// Name of the service authentication relies on.
pub const USERS_SERVICE: &str = "users";

/// Definition used when the configuration does not define `users`.
pub fn default_users_definition() -> ServiceDefinition {
    ServiceDefinition::new(USERS_SERVICE).auto(true)
}

/// Services created during boot, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct ServiceRegistry {
    services: BTreeMap<String, ServiceHandle>,
}

impl ServiceRegistry {
    pub fn get(&self, name: &str) -> Option<&ServiceHandle> {
        self.services.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.services.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.services.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ServiceHandle)> {
        self.services.iter().map(|(name, handle)| (name.as_str(), handle))
    }
}

/// Load `definitions` through `loader`, adding `users` when missing.
///
/// Every loaded handle is also registered on `app`, whether or not the
/// loader did so itself.
pub fn register_services(
    app: &App,
    definitions: &BTreeMap<String, ServiceDefinition>,
    loader: &dyn ServiceLoader,
) -> Result<ServiceRegistry, ServiceError> {
    let mut services = BTreeMap::new();

    tracing::debug!("Loading services");
    for (name, definition) in definitions {
        tracing::debug!(service = %name, model = %definition.model, "Loading service");
        services.insert(name.clone(), loader.load(name, definition)?);
    }

    if !services.contains_key(USERS_SERVICE) {
        tracing::info!("Users must be defined. Creating them.");
        let handle = loader.load(USERS_SERVICE, &default_users_definition())?;
        services.insert(USERS_SERVICE.to_string(), handle);
    }

    for (name, handle) in &services {
        app.register_handle(name, handle.clone());
    }
    tracing::debug!(count = services.len(), "Services loaded.");

    Ok(ServiceRegistry { services })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::services::{CollectionService, HookedService};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingLoader {
        calls: Mutex<Vec<(String, ServiceDefinition)>>,
    }

    impl RecordingLoader {
        fn calls(&self) -> Vec<(String, ServiceDefinition)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ServiceLoader for RecordingLoader {
        fn load(&self, name: &str, definition: &ServiceDefinition) -> Result<ServiceHandle, ServiceError> {
            self.calls
                .lock()
                .unwrap()
                .push((name.to_string(), definition.clone()));
            let service = CollectionService::new(&definition.model, Arc::new(MemoryStore::new()));
            Ok(Arc::new(HookedService::new(name, Arc::new(service))))
        }
    }

    struct FailingLoader;

    impl ServiceLoader for FailingLoader {
        fn load(&self, name: &str, _definition: &ServiceDefinition) -> Result<ServiceHandle, ServiceError> {
            Err(ServiceError::General(format!("cannot load {name}")))
        }
    }

    #[test]
    fn test_synthesizes_users() {
        let loader = RecordingLoader::default();
        let mut definitions = BTreeMap::new();
        definitions.insert("posts".to_string(), ServiceDefinition::new("posts"));

        let registry = register_services(&App::new(), &definitions, &loader).unwrap();
        assert_eq!(registry.names(), vec!["posts", "users"]);

        let calls = loader.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].0, "users");
        assert_eq!(calls[1].1, ServiceDefinition::new("users").auto(true));
    }

    #[test]
    fn test_defined_users_is_not_duplicated() {
        let loader = RecordingLoader::default();
        let mut definitions = BTreeMap::new();
        definitions.insert("users".to_string(), ServiceDefinition::new("accounts"));
        definitions.insert("comments".to_string(), ServiceDefinition::new("comments"));

        let registry = register_services(&App::new(), &definitions, &loader).unwrap();
        assert_eq!(registry.len(), 2);

        let names: Vec<String> = loader.calls().into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["comments", "users"]);
        assert_eq!(loader.calls()[1].1.model, "accounts");
    }

    #[test]
    fn test_empty_definitions_still_yield_users() {
        let registry = register_services(&App::new(), &BTreeMap::new(), &RecordingLoader::default()).unwrap();
        assert_eq!(registry.names(), vec!["users"]);
    }

    #[test]
    fn test_unregistered_handles_reach_the_app() {
        let app = App::new();
        let mut definitions = BTreeMap::new();
        definitions.insert("posts".to_string(), ServiceDefinition::new("posts"));

        let registry = register_services(&app, &definitions, &RecordingLoader::default()).unwrap();
        assert_eq!(app.service_names(), vec!["posts", "users"]);
        assert!(Arc::ptr_eq(
            &app.service(USERS_SERVICE).unwrap(),
            registry.get(USERS_SERVICE).unwrap()
        ));
    }

    #[test]
    fn test_loader_failure_propagates() {
        let mut definitions = BTreeMap::new();
        definitions.insert("posts".to_string(), ServiceDefinition::new("posts"));
        let err = register_services(&App::new(), &definitions, &FailingLoader).unwrap_err();
        assert_eq!(err, ServiceError::General("cannot load posts".into()));
    }
}
