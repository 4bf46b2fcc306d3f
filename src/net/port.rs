//! Port negotiation.
//!
//! # Responsibilities
//! - Scan an inclusive port range upward
//! - Return the first port that accepts a bind
//! - Report `NoPortAvailable` when the range is exhausted

use std::fmt;
use std::net::{IpAddr, SocketAddr};

use tokio::net::TcpListener;

/// Inclusive range of candidate ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRange {
    pub from: u16,
    pub to: u16,
}

impl PortRange {
    pub fn new(from: u16, to: u16) -> Self {
        Self { from, to }
    }

    /// A range that only admits `port`.
    pub fn fixed(port: u16) -> Self {
        Self { from: port, to: port }
    }

    pub fn is_fixed(&self) -> bool {
        self.from == self.to
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_fixed() {
            write!(f, "{}", self.from)
        } else {
            write!(f, "{}-{}", self.from, self.to)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("no port available in {range}")]
    NoPortAvailable { range: PortRange },
}

/// Find the first bindable port in `range` on `host`.
pub async fn find_port(host: IpAddr, range: PortRange) -> Result<u16, PortError> {
    if range.is_fixed() {
        tracing::debug!(port = range.from, "Trying port");
    } else {
        tracing::debug!(from = range.from, to = range.to, "Finding free port");
    }

    for port in range.from..=range.to {
        match TcpListener::bind(SocketAddr::new(host, port)).await {
            Ok(probe) => {
                drop(probe);
                return Ok(port);
            }
            Err(e) => {
                tracing::trace!(port, error = %e, "Port unavailable");
            }
        }
    }

    Err(PortError::NoPortAvailable { range })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    #[test]
    fn test_range_display() {
        assert_eq!(PortRange::fixed(8080).to_string(), "8080");
        assert_eq!(PortRange::new(3000, 3010).to_string(), "3000-3010");
    }

    #[tokio::test]
    async fn test_fixed_port_occupied() {
        let held = std::net::TcpListener::bind((LOCALHOST, 0)).unwrap();
        let port = held.local_addr().unwrap().port();

        let result = find_port(LOCALHOST, PortRange::fixed(port)).await;
        assert_eq!(
            result,
            Err(PortError::NoPortAvailable { range: PortRange::fixed(port) })
        );
    }

    #[tokio::test]
    async fn test_inverted_range_is_empty() {
        let result = find_port(LOCALHOST, PortRange::new(40010, 40000)).await;
        assert!(matches!(result, Err(PortError::NoPortAvailable { .. })));
    }
}
