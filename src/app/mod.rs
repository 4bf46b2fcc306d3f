//! Application handle.
//!
//! # Data Flow
//! ```text
//! boot
//!     → App::new
//!     → app.set(Arc<ActerConfig>)          shared typed context
//!     → app.mount_static / app.use_service  route table
//!     → app.configure(plugin)              authentication strategies
//!     → app.setup()                        after the listener is bound
//!     → http::server builds the router from the app
//! ```
//!
//! # Design Decisions
//! - `App` is a cheap `Arc` clone; every collaborator may hold one
//! - Services are looked up by name at request time
//! - Plugins are configured in call order and may depend on earlier ones

pub mod application;

pub use application::{App, ConfigureError, Plugin, StaticRoute};
