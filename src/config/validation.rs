//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (port range ordered, ports non-zero)
//! - Reject service names that cannot be routed or that are reserved
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ActerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use crate::auth::AUTHENTICATION_SERVICE;
use crate::config::schema::{ActerConfig, PortSpec};

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("port range is inverted: from {from} > to {to}")]
    InvertedPortRange { from: u16, to: u16 },
    #[error("port 0 is not allowed")]
    ZeroPort,
    #[error("secrets.auth must not be empty")]
    MissingAuthSecret,
    #[error("service names must not be empty")]
    EmptyServiceName,
    #[error("service name `{0}` must be a single URL path segment")]
    InvalidServiceName(String),
    #[error("service name `{0}` is reserved")]
    ReservedServiceName(String),
    #[error("service `{0}` has an empty model")]
    EmptyModel(String),
    #[error("statics endpoint `{0}` must start with `/`")]
    InvalidStaticsEndpoint(String),
    #[error("watch is active but watch.report is empty")]
    MissingWatchReport,
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &ActerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match config.server.port {
        PortSpec::Fixed(0) => errors.push(ValidationError::ZeroPort),
        PortSpec::Range { from, to } => {
            if from == 0 {
                errors.push(ValidationError::ZeroPort);
            }
            if from > to {
                errors.push(ValidationError::InvertedPortRange { from, to });
            }
        }
        PortSpec::Fixed(_) => {}
    }

    if config.secrets.auth.is_empty() {
        errors.push(ValidationError::MissingAuthSecret);
    }

    for (name, definition) in &config.services.definitions {
        if name.is_empty() {
            errors.push(ValidationError::EmptyServiceName);
            continue;
        }
        if name.contains('/') || name.contains('?') || name.contains('#') {
            errors.push(ValidationError::InvalidServiceName(name.clone()));
        }
        if name == AUTHENTICATION_SERVICE {
            errors.push(ValidationError::ReservedServiceName(name.clone()));
        }
        if definition.model.is_empty() {
            errors.push(ValidationError::EmptyModel(name.clone()));
        }
    }

    let statics = &config.server.statics;
    if statics.active && !statics.endpoint.starts_with('/') {
        errors.push(ValidationError::InvalidStaticsEndpoint(statics.endpoint.clone()));
    }

    let watch = &config.server.watch;
    if watch.active && watch.report.is_empty() {
        errors.push(ValidationError::MissingWatchReport);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
