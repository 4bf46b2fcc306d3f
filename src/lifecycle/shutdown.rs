//! Shutdown coordination for the running server.

use std::future::Future;
use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::{JoinError, JoinHandle};

use crate::http::HttpServer;

/// Coordinator for graceful shutdown.
///
/// Provides a broadcast channel that all long-running tasks can subscribe to.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("server failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("server task did not complete: {0}")]
    Join(#[from] JoinError),
}

/// The HTTP server running on its own task.
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown: Shutdown,
    task: JoinHandle<Result<(), std::io::Error>>,
}

impl ServerHandle {
    /// Start serving `listener` on a new task.
    pub fn spawn(server: HttpServer, listener: TcpListener, local_addr: SocketAddr) -> Self {
        let shutdown = Shutdown::new();
        let signal = shutdown.subscribe();
        let task = tokio::spawn(server.run(listener, signal));
        Self {
            local_addr,
            shutdown,
            task,
        }
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn port(&self) -> u16 {
        self.local_addr.port()
    }

    /// Stop accepting, drain in-flight requests and wait for the task.
    pub async fn shutdown(self) -> Result<(), ServeError> {
        self.shutdown.trigger();
        self.task.await??;
        Ok(())
    }

    /// Serve until `signal` resolves or the server stops on its own.
    pub async fn run_until<F>(mut self, signal: F) -> Result<(), ServeError>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            result = &mut self.task => {
                result??;
                return Ok(());
            }
            _ = signal => {}
        }
        tracing::info!("Shutting down");
        self.shutdown().await
    }
}
