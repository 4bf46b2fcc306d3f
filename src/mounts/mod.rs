//! Optional mounts: static files and folder watching.
//!
//! # Data Flow
//! ```text
//! server.statics.active
//!     → statics.rs (resolve folder, register StaticRoute on the app)
//!     → http::server nests a ServeDir under the endpoint
//!
//! server.watch.active
//!     → watch.rs (folder exists? reporter registered?)
//!     → watcher.rs (notify watcher → broadcast channel)
//!     → reporter.attach({ app, watcher, config })
//! ```
//!
//! # Design Decisions
//! - Neither mount can fail the boot; problems are logged and skipped
//! - Reporters are registered by name before boot, never loaded from disk
//! - The reporter owns the watcher from then on

pub mod statics;
pub mod watch;
pub mod watcher;

pub use statics::mount_statics;
pub use watch::{mount_watch, ReporterRegistry, WatchContext, WatchOutcome, WatchReporter};
pub use watcher::{FolderWatcher, WatchEvent, WatchEventKind};
