//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the REST routes and static mounts
//! - Wire up middleware (request ID, tracing, timeout)
//! - Serve on the negotiated listener until shutdown

use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::app::App;
use crate::config::ActerConfig;
use crate::http::rest;

/// HTTP server for the application.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Build the server from the app's current services and mounts.
    pub fn new(app: &App, config: &ActerConfig) -> Self {
        Self {
            router: Self::build_router(app, config),
        }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// A static mount at `/` is tried before the REST routes, so files win
    /// over services of the same name; anything it cannot serve (missing
    /// files, non-GET methods) falls through to the services.
    pub fn build_router(app: &App, config: &ActerConfig) -> Router {
        let mut router = Router::new()
            .route(
                "/{service}",
                get(rest::find).post(rest::create).delete(rest::remove_all),
            )
            .route(
                "/{service}/{id}",
                get(rest::get)
                    .put(rest::update)
                    .patch(rest::patch)
                    .delete(rest::remove),
            )
            .with_state(app.clone());

        for mount in app.statics() {
            let endpoint = mount.endpoint.trim_end_matches('/');
            let files = ServeDir::new(&mount.folder);
            router = if endpoint.is_empty() {
                Router::new().fallback_service(
                    files
                        .call_fallback_on_method_not_allowed(true)
                        .fallback(router),
                )
            } else {
                router.nest_service(endpoint, files)
            };
        }

        router.layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(config.server.request_timeout_secs),
                )),
        )
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
