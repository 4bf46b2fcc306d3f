//! Services subsystem.
//!
//! # Data Flow
//! ```text
//! services.definitions (config)
//!     → registrar.rs (key order, synthesize `users` if absent)
//!     → loader.rs (definition → CollectionService over the connection)
//!     → app.use_service (wrap in HookedService, register by name)
//!     → ServiceRegistry (immutable, returned from boot)
//! ```
//!
//! # Design Decisions
//! - Definitions are opaque to the registrar; only the name `users` is special
//! - Every registered service is reached through its hook pipeline
//! - Loader failures are fatal to boot; there is no retry

pub mod collection;
pub mod error;
pub mod hooked;
pub mod loader;
pub mod registrar;
pub mod service;

pub use crate::config::ServiceDefinition;
pub use collection::CollectionService;
pub use error::ServiceError;
pub use hooked::{HookedService, ServiceHandle};
pub use loader::{CollectionLoader, LoaderFactory, ServiceLoader};
pub use registrar::{default_users_definition, register_services, ServiceRegistry, USERS_SERVICE};
pub use service::{Method, Params, Service};
