//! Startup orchestration.
//!
//! # Responsibilities
//! - Assemble the application from an already-validated configuration
//! - Initialize collaborators in dependency order
//! - Negotiate a port and bind the listener
//! - Begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: persistence, services, auth and binding errors are fatal
//! - Statics and watch mounts never abort the boot
//! - Subsystems initialize in order, not concurrently
//! - Listener starts last (traffic only when ready)

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::app::{App, ConfigureError};
use crate::auth::wire_authentication;
use crate::config::{ActerConfig, PersistenceConfig, PortSpec};
use crate::hooks::discover_hooks;
use crate::http::HttpServer;
use crate::lifecycle::shutdown::ServerHandle;
use crate::mounts::{mount_statics, mount_watch, ReporterRegistry};
use crate::net::listener::parse_host;
use crate::net::{bind, find_port, ListenerError, PortError};
use crate::persistence::{Connection, MemoryPersistence, Persistence, PersistenceError};
use crate::services::{register_services, CollectionLoader, LoaderFactory, ServiceError, ServiceRegistry};

/// Process exit status when no port in the configured range can be bound.
pub const NO_PORT_EXIT_CODE: i32 = -1;

/// Where the port settings are documented.
pub const CONFIG_DOCS_URL: &str = "https://github.com/onexdata/reaction-gateway#config-options";

/// Pluggable pieces the orchestrator consumes through their contracts.
pub struct Collaborators {
    pub persistence: Arc<dyn Persistence>,
    pub loader: LoaderFactory,
    pub reporters: ReporterRegistry,
}

impl Collaborators {
    pub fn with_persistence(mut self, persistence: impl Persistence + 'static) -> Self {
        self.persistence = Arc::new(persistence);
        self
    }

    pub fn with_loader(mut self, loader: LoaderFactory) -> Self {
        self.loader = loader;
        self
    }

    pub fn with_reporters(mut self, reporters: ReporterRegistry) -> Self {
        self.reporters = reporters;
        self
    }
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            persistence: Arc::new(MemoryPersistence),
            loader: CollectionLoader::factory(),
            reporters: ReporterRegistry::new(),
        }
    }
}

/// A booted application.
pub struct Booted {
    pub server: ServerHandle,
    pub app: App,
    pub services: ServiceRegistry,
}

#[derive(Debug, thiserror::Error)]
pub enum BootError {
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("persistence did not initialize within {0:?}")]
    PersistenceTimeout(Duration),
    #[error("failed to load services: {0}")]
    Service(#[source] ServiceError),
    #[error("failed to configure authentication: {0}")]
    Auth(#[from] ConfigureError),
    #[error("no free port for settings {port}")]
    NoPortAvailable {
        port: PortSpec,
        #[source]
        source: PortError,
    },
    #[error(transparent)]
    Listener(#[from] ListenerError),
    #[error("application setup failed: {0}")]
    Setup(#[source] ServiceError),
}

impl BootError {
    /// Exit status the process must terminate with, if this error dictates one.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            BootError::NoPortAvailable { .. } => Some(NO_PORT_EXIT_CODE),
            _ => None,
        }
    }
}

/// `"{server} v{version} running {app} v{version}"`.
pub fn banner(config: &ActerConfig) -> String {
    format!(
        "{} v{} running {} v{}",
        config.server.name, config.server.version, config.app.name, config.app.version
    )
}

/// Tell the operator why no port could be bound.
pub fn log_port_diagnostics(port: &PortSpec) {
    tracing::error!("Unable to get a free port.  Please change your settings.");
    tracing::error!("See {}", CONFIG_DOCS_URL);
    tracing::error!("Your current port settings are: {}", port);
}

/// Boot the application and start serving.
///
/// Logging must already be installed. The configuration is taken as-is;
/// validation happens when it is loaded.
pub async fn boot(config: ActerConfig, collaborators: Collaborators) -> Result<Booted, BootError> {
    let config = Arc::new(config);
    tracing::debug!("Booting...");
    tracing::info!("{}", banner(&config));

    let app = App::new();
    app.set(config.clone());

    let connection =
        init_persistence(collaborators.persistence.as_ref(), &config.server.persistence).await?;
    app.set(connection.clone());
    tracing::debug!("Persistence loaded.");

    let hooks = discover_hooks(&config.server.resolve(&config.server.hooks_folder));
    tracing::info!("{}", hooks.summary());

    if config.server.statics.active {
        mount_statics(&app, &config.server);
    }
    if config.server.watch.active {
        mount_watch(&app, &config, &collaborators.reporters);
    }

    let loader = (collaborators.loader)(config.clone(), app.clone(), connection);
    let services = register_services(&app, &config.services.definitions, loader.as_ref())
        .map_err(BootError::Service)?;

    wire_authentication(&app, &config)?;

    let host = parse_host(&config.server.host)?;
    let port = match find_port(host, config.server.port.range()).await {
        Ok(port) => port,
        Err(source) => {
            log_port_diagnostics(&config.server.port);
            return Err(BootError::NoPortAvailable {
                port: config.server.port,
                source,
            });
        }
    };

    tracing::debug!(port, "About to listen");
    let listener = bind(host, port).await?;
    let local_addr = listener
        .local_addr()
        .unwrap_or_else(|_| SocketAddr::new(host, port));

    app.setup().await.map_err(BootError::Setup)?;
    let server = ServerHandle::spawn(HttpServer::new(&app, &config), listener, local_addr);
    tracing::info!("Listening on {}", port);

    Ok(Booted {
        server,
        app,
        services,
    })
}

async fn init_persistence(
    persistence: &dyn Persistence,
    config: &PersistenceConfig,
) -> Result<Connection, BootError> {
    if config.init_timeout_secs == 0 {
        return Ok(persistence.init(config).await?);
    }

    let limit = Duration::from_secs(config.init_timeout_secs);
    match tokio::time::timeout(limit, persistence.init(config)).await {
        Ok(connection) => Ok(connection?),
        Err(_) => Err(BootError::PersistenceTimeout(limit)),
    }
}
