//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ActerConfig (validated, immutable)
//!     → shared via Arc with the app and every boot step
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - The boot sequence never re-validates; it trusts what the loader accepted

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    ActerConfig, AppInfo, AuthConfig, LogFormat, LoggingConfig, PersistenceConfig,
    PersistenceDriver, PortSpec, SecretsConfig, ServerConfig, ServiceDefinition, ServicesConfig,
    StaticsConfig, WatchConfig,
};
