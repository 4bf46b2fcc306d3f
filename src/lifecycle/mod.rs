//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Banner → App + config → Persistence → Hook discovery
//!         → Statics/Watch mounts → Services (+ users) → Auth wiring
//!         → Port negotiation → Bind → Setup → Serve
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain connections → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: each step completes before the next begins
//! - Fail fast: fatal steps return a `BootError`, optional mounts only log
//! - Listener starts last (traffic only when ready)

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{ServeError, ServerHandle, Shutdown};
pub use signals::shutdown_signal;
pub use startup::{boot, BootError, Booted, Collaborators, NO_PORT_EXIT_CODE};
