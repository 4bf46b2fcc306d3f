//! Acter: bootstrap orchestrator for a pluggable application server.
//!
//! # Architecture Overview
//!
//! ```text
//!     config file ──▶ config (load + validate) ──▶ lifecycle::boot
//!                                                      │
//!        ┌──────────────┬──────────────┬───────────────┼──────────────┬─────────────┐
//!        ▼              ▼              ▼               ▼              ▼             ▼
//!   persistence   hooks discovery   mounts        services        auth        net (port
//!   (connection)  (before/after/   (statics,     (loader +       (token,      negotiation,
//!                  error)           watch)        users)          local, jwt)  bind)
//!                                                      │
//!                                                      ▼
//!     Client Request ──▶ http server (axum) ──▶ REST handlers ──▶ hooked services
//!                                                                   │
//!                                                                   ▼
//!                                                              memory store
//! ```
//!
//! Every service is reached through its hook pipeline; authentication is
//! wired as hooks on the `authentication` and `users` services.

// Core subsystems
pub mod app;
pub mod config;
pub mod http;
pub mod net;
pub mod services;

// Collaborators
pub mod auth;
pub mod hooks;
pub mod mounts;
pub mod persistence;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use app::App;
pub use config::ActerConfig;
pub use lifecycle::{boot, BootError, Booted, Collaborators};
