//! Authentication subsystem.
//!
//! # Data Flow
//! ```text
//! wiring.rs (boot step)
//!     → app.configure(TokenPlugin)   issuer + `authentication` service
//!     → app.configure(LocalPlugin)   email/password against `users`
//!     → app.configure(BearerPlugin)  access token in Authorization header
//!     → hooks on `authentication` and `users`
//!
//! POST /authentication { email, password }
//!     → Authenticate([jwt, local]) sets params.user
//!     → AuthenticationService::create issues { accessToken }
//!     → AttachUser adds result.user without its password
//! ```
//!
//! # Design Decisions
//! - Strategy order is fixed; local and bearer refuse to configure without the issuer
//! - Strategies read users through the raw service so hooks never hide the hash
//! - Internal calls (no provider) are never authenticated

pub mod bearer;
pub mod hooks;
pub mod local;
pub mod password;
pub mod plugins;
pub mod service;
pub mod strategy;
pub mod token;
pub mod wiring;

/// Name of the service that issues access tokens.
pub const AUTHENTICATION_SERVICE: &str = "authentication";

pub use hooks::{AttachUser, Authenticate, HashPassword, Protect};
pub use plugins::{BearerPlugin, LocalPlugin, TokenPlugin};
pub use service::AuthenticationService;
pub use strategy::{Authentication, Strategy, LOCAL_STRATEGY, TOKEN_STRATEGY};
pub use token::{Claims, TokenIssuer};
pub use wiring::wire_authentication;
