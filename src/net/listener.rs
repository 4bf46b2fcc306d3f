//! TCP listener binding.
//!
//! # Responsibilities
//! - Parse the configured host
//! - Bind the negotiated port
//! - Log the bound address

use std::net::{IpAddr, SocketAddr};

use tokio::net::TcpListener;

/// Error type for listener operations.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    /// Host is not an IP address.
    #[error("Invalid host `{host}`: {source}")]
    InvalidHost {
        host: String,
        #[source]
        source: std::net::AddrParseError,
    },
    /// Failed to bind to address.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Parse a configured host such as `0.0.0.0` or `::1`.
pub fn parse_host(host: &str) -> Result<IpAddr, ListenerError> {
    host.parse().map_err(|source| ListenerError::InvalidHost {
        host: host.to_string(),
        source,
    })
}

/// Bind a listener on `host:port`.
pub async fn bind(host: IpAddr, port: u16) -> Result<TcpListener, ListenerError> {
    let addr = SocketAddr::new(host, port);
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ListenerError::Bind { addr, source })?;

    tracing::debug!(address = %addr, "Listener bound");
    Ok(listener)
}
