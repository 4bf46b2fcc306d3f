//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::net::port::PortRange;

/// Root configuration for the application server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ActerConfig {
    /// Server identity, listener, persistence and optional mounts.
    pub server: ServerConfig,

    /// Name and version of the application being served.
    pub app: AppInfo,

    /// Declarative service definitions.
    pub services: ServicesConfig,

    /// Secrets (authentication signing key).
    pub secrets: SecretsConfig,

    /// Token issuance and local strategy settings.
    pub auth: AuthConfig,

    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server name printed in the startup banner.
    pub name: String,

    /// Server version printed in the startup banner.
    pub version: String,

    /// Host the listener binds to.
    pub host: String,

    /// Fixed port or `{ from, to }` range.
    pub port: PortSpec,

    /// Project root used to resolve relative paths. Defaults to the working directory.
    pub root: Option<PathBuf>,

    /// Folder (relative to the root) holding lifecycle hook files.
    pub hooks_folder: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,

    pub persistence: PersistenceConfig,

    pub statics: StaticsConfig,

    pub watch: WatchConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "acter".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            host: "0.0.0.0".to_string(),
            port: PortSpec::Fixed(3030),
            root: None,
            hooks_folder: "src/hooks".to_string(),
            request_timeout_secs: 30,
            persistence: PersistenceConfig::default(),
            statics: StaticsConfig::default(),
            watch: WatchConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Project root: the configured `root`, or the current working directory.
    pub fn project_root(&self) -> PathBuf {
        match &self.root {
            Some(root) => root.clone(),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// Resolve a path against the project root. Absolute paths are returned as-is.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root().join(path)
        }
    }
}

/// Port specification: a single port or an inclusive range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PortSpec {
    Fixed(u16),
    Range { from: u16, to: u16 },
}

impl PortSpec {
    /// Range to negotiate over. A fixed port becomes `{ from: p, to: p }`.
    pub fn range(&self) -> PortRange {
        match *self {
            PortSpec::Fixed(port) => PortRange::fixed(port),
            PortSpec::Range { from, to } => PortRange::new(from, to),
        }
    }
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortSpec::Fixed(port) => write!(f, "{}", port),
            PortSpec::Range { from, to } => write!(f, "{{ from: {}, to: {} }}", from, to),
        }
    }
}

/// Application identity.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
}

impl Default for AppInfo {
    fn default() -> Self {
        Self {
            name: "app".to_string(),
            version: "0.0.0".to_string(),
        }
    }
}

/// Persistence backend to initialize at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PersistenceDriver {
    #[default]
    Memory,
}

/// Persistence configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PersistenceConfig {
    pub driver: PersistenceDriver,

    /// Upper bound on persistence initialization in seconds (0 = wait forever).
    pub init_timeout_secs: u64,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            driver: PersistenceDriver::Memory,
            init_timeout_secs: 30,
        }
    }
}

/// Static file hosting.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticsConfig {
    pub active: bool,

    /// HTTP path prefix (e.g. "/public").
    pub endpoint: String,

    /// Folder to serve, relative to the project root.
    pub folder: String,
}

impl Default for StaticsConfig {
    fn default() -> Self {
        Self {
            active: false,
            endpoint: "/".to_string(),
            folder: "public".to_string(),
        }
    }
}

/// Folder watching.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WatchConfig {
    pub active: bool,

    /// Folder to watch, relative to the project root.
    pub folder: String,

    /// Name of the registered reporter that receives the watcher.
    pub report: String,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            active: false,
            folder: "watch".to_string(),
            report: String::new(),
        }
    }
}

/// Service definitions keyed by service name.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServicesConfig {
    pub definitions: BTreeMap<String, ServiceDefinition>,
}

/// Declarative description of a service, handed verbatim to the service loader.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServiceDefinition {
    /// Model (collection) backing the service.
    pub model: String,

    /// Create the backing collection eagerly.
    #[serde(default)]
    pub auto: bool,

    /// Loader-specific options.
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl ServiceDefinition {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            auto: false,
            options: Map::new(),
        }
    }

    pub fn auto(mut self, auto: bool) -> Self {
        self.auto = auto;
        self
    }
}

/// Secrets.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SecretsConfig {
    /// HMAC secret used to sign access tokens.
    pub auth: String,
}

/// Authentication settings other than the secret.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Access token lifetime in seconds.
    pub expires_in_secs: u64,

    /// `iss` claim of issued tokens.
    pub issuer: String,

    /// Field of a user record holding the login name.
    pub username_field: String,

    /// Field of a user record holding the password hash.
    pub password_field: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            expires_in_secs: 24 * 60 * 60,
            issuer: "acter".to_string(),
            username_field: "email".to_string(),
            password_field: "password".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,

    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}
