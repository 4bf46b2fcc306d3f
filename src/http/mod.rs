//! HTTP transport subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection (negotiated port)
//!     → server.rs (axum router, request id, tracing, timeout)
//!     → rest.rs (path → service name/id, query → params.query,
//!                Authorization → params.authorization)
//!     → HookedService call
//!     → JSON result, or response.rs error body
//!
//! Static mounts:
//!     → ServeDir nested under each configured endpoint
//! ```

pub mod response;
pub mod rest;
pub mod server;

pub use rest::REST_PROVIDER;
pub use server::HttpServer;
