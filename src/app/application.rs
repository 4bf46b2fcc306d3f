//! The application: services, shared context, static mounts and plugins.

use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use axum::http::Extensions;
use dashmap::DashMap;

use crate::config::ActerConfig;
use crate::services::{HookedService, Service, ServiceError, ServiceHandle};

/// A folder served under an HTTP path prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticRoute {
    pub endpoint: String,
    pub folder: PathBuf,
}

/// Error raised while configuring a plugin or attaching hooks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigureError {
    #[error("plugin `{plugin}` requires `{requires}` to be configured first")]
    MissingDependency {
        plugin: &'static str,
        requires: &'static str,
    },
    #[error("authentication strategy `{0}` is not configured")]
    UnknownStrategy(String),
    #[error("service `{0}` is not registered")]
    MissingService(String),
}

/// Something that can be configured onto an [`App`].
pub trait Plugin {
    fn name(&self) -> &'static str;

    fn configure(self, app: &App) -> Result<(), ConfigureError>;
}

#[derive(Default)]
struct AppInner {
    services: DashMap<String, ServiceHandle>,
    context: RwLock<Extensions>,
    statics: RwLock<Vec<StaticRoute>>,
    is_setup: AtomicBool,
}

#[derive(Clone, Default)]
pub struct App {
    inner: Arc<AppInner>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value in the shared context, replacing any value of the same type.
    pub fn set<T: Clone + Send + Sync + 'static>(&self, value: T) {
        self.inner
            .context
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(value);
    }

    pub fn get<T: Clone + Send + Sync + 'static>(&self) -> Option<T> {
        self.inner
            .context
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get::<T>()
            .cloned()
    }

    /// Configuration attached during boot.
    pub fn config(&self) -> Option<Arc<ActerConfig>> {
        self.get::<Arc<ActerConfig>>()
    }

    /// Register `service` under `name`, wrapped in an empty hook pipeline.
    pub fn use_service(&self, name: &str, service: impl Service + 'static) -> ServiceHandle {
        let handle = Arc::new(HookedService::new(name, Arc::new(service)));
        if self.inner.services.insert(name.to_string(), handle.clone()).is_some() {
            tracing::warn!(service = %name, "Service replaced");
        }
        handle
    }

    /// Register an already-built handle under `name`. No-op when it is already there.
    pub fn register_handle(&self, name: &str, handle: ServiceHandle) {
        if let Some(existing) = self.service(name) {
            if Arc::ptr_eq(&existing, &handle) {
                return;
            }
            tracing::warn!(service = %name, "Service replaced");
        }
        self.inner.services.insert(name.to_string(), handle);
    }

    pub fn service(&self, name: &str) -> Option<ServiceHandle> {
        self.inner.services.get(name).map(|entry| entry.value().clone())
    }

    pub fn service_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.services.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn mount_static(&self, endpoint: impl Into<String>, folder: impl Into<PathBuf>) {
        self.inner
            .statics
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(StaticRoute {
                endpoint: endpoint.into(),
                folder: folder.into(),
            });
    }

    pub fn statics(&self) -> Vec<StaticRoute> {
        self.inner
            .statics
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Configure a plugin. Chainable: `app.configure(a)?.configure(b)?`.
    pub fn configure<P: Plugin>(&self, plugin: P) -> Result<&Self, ConfigureError> {
        let name = plugin.name();
        plugin.configure(self)?;
        tracing::debug!(plugin = name, "Plugin configured");
        Ok(self)
    }

    /// Finalize after binding: run every service's `setup` once.
    pub async fn setup(&self) -> Result<(), ServiceError> {
        if self.inner.is_setup.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let services: Vec<(String, ServiceHandle)> = self
            .inner
            .services
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();

        for (name, handle) in services {
            handle.raw().setup(self, &name).await?;
        }
        Ok(())
    }

    pub fn is_setup(&self) -> bool {
        self.inner.is_setup.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("services", &self.service_names())
            .field("statics", &self.statics())
            .field("is_setup", &self.is_setup())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::services::CollectionService;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    struct Counting(Arc<AtomicUsize>);

    #[async_trait]
    impl Service for Counting {
        fn kind(&self) -> &str {
            "counting"
        }

        async fn setup(&self, _app: &App, _path: &str) -> Result<(), ServiceError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Marker(&'static str);

    impl Plugin for Marker {
        fn name(&self) -> &'static str {
            self.0
        }

        fn configure(self, app: &App) -> Result<(), ConfigureError> {
            let mut seen: Vec<&'static str> = app.get().unwrap_or_default();
            seen.push(self.0);
            app.set(seen);
            Ok(())
        }
    }

    #[test]
    fn test_context_roundtrip() {
        let app = App::new();
        assert!(app.config().is_none());
        app.set(Arc::new(ActerConfig::default()));
        assert_eq!(app.config().unwrap().app.name, "app");
    }

    #[test]
    fn test_configure_in_order() {
        let app = App::new();
        app.configure(Marker("a")).unwrap().configure(Marker("b")).unwrap();
        assert_eq!(app.get::<Vec<&'static str>>(), Some(vec!["a", "b"]));
    }

    #[test]
    fn test_services_by_name() {
        let app = App::new();
        let store = Arc::new(MemoryStore::new());
        app.use_service("posts", CollectionService::new("posts", store.clone()));
        app.use_service("users", CollectionService::new("users", store));
        assert_eq!(app.service_names(), vec!["posts", "users"]);
        assert_eq!(app.service("posts").unwrap().name(), "posts");
        assert!(app.service("nope").is_none());
    }

    #[test]
    fn test_register_handle_is_idempotent() {
        let app = App::new();
        let handle = app.use_service("posts", CollectionService::new("posts", Arc::new(MemoryStore::new())));
        app.register_handle("posts", handle.clone());
        assert!(Arc::ptr_eq(&app.service("posts").unwrap(), &handle));

        let bare = Arc::new(HookedService::new(
            "users",
            Arc::new(CollectionService::new("users", Arc::new(MemoryStore::new()))),
        ));
        app.register_handle("users", bare.clone());
        assert!(Arc::ptr_eq(&app.service("users").unwrap(), &bare));
    }

    #[tokio::test]
    async fn test_setup_runs_once() {
        let app = App::new();
        let count = Arc::new(AtomicUsize::new(0));
        app.use_service("a", Counting(count.clone()));
        app.use_service("b", Counting(count.clone()));

        app.setup().await.unwrap();
        app.setup().await.unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert!(app.is_setup());
    }
}
