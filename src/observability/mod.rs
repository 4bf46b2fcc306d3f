//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! main (process start)
//!     → logging.rs (install the global tracing subscriber once)
//!
//! Every subsystem:
//!     → tracing macros with structured fields
//!     → timestamped lines on stdout (pretty or JSON)
//! ```
//!
//! # Design Decisions
//! - The subscriber is installed by the caller, never by the boot sequence
//! - RUST_LOG overrides the configured level
//! - HTTP requests are traced by tower-http and carry x-request-id

pub mod logging;

pub use logging::{init_logging, LoggingError};
