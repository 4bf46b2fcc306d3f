//! Request lifecycle hooks.
//!
//! # Data Flow
//! ```text
//! service call
//!     → HookContext { service, method, id, data, params }
//!     → pipeline.rs: Before / BeforeAll stages, in registration order
//!     → service method (skipped if a before stage produced a result)
//!     → pipeline.rs: After / AfterAll stages, in registration order
//!     → ctx.result back to the caller
//!
//! Boot:
//!     discovery.rs checks <root>/src/hooks/{before,after,error}.rs
//! ```
//!
//! # Design Decisions
//! - Stages are tagged variants, hooks are single-method trait objects
//! - Pipelines only grow; attaching hooks appends
//! - Discovery is informational; no hook code is loaded from disk

pub mod context;
pub mod discovery;
pub mod pipeline;

pub use context::HookContext;
pub use discovery::{discover_hooks, Aspect, HookPresence};
pub use pipeline::{Hook, HookPipeline, HookStage};
