//! Service errors.
//!
//! Every failure a service call can produce. The HTTP layer maps these onto
//! status codes; see `http::response`.

use crate::persistence::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotAuthenticated(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Method `{method}` is not supported by service `{service}`")]
    MethodNotAllowed { service: String, method: String },
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    General(String),
}

impl ServiceError {
    /// HTTP status code for this error.
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::NotAuthenticated(_) => 401,
            ServiceError::NotFound(_) => 404,
            ServiceError::MethodNotAllowed { .. } => 405,
            ServiceError::Conflict(_) => 409,
            ServiceError::General(_) => 500,
        }
    }

    /// Error name as exposed to clients.
    pub fn name(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "BadRequest",
            ServiceError::NotAuthenticated(_) => "NotAuthenticated",
            ServiceError::NotFound(_) => "NotFound",
            ServiceError::MethodNotAllowed { .. } => "MethodNotAllowed",
            ServiceError::Conflict(_) => "Conflict",
            ServiceError::General(_) => "GeneralError",
        }
    }

    /// kebab-case class name as exposed to clients.
    pub fn class_name(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad-request",
            ServiceError::NotAuthenticated(_) => "not-authenticated",
            ServiceError::NotFound(_) => "not-found",
            ServiceError::MethodNotAllowed { .. } => "method-not-allowed",
            ServiceError::Conflict(_) => "conflict",
            ServiceError::General(_) => "general-error",
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotAnObject => ServiceError::BadRequest(err.to_string()),
            StoreError::DuplicateId(_) => ServiceError::Conflict(err.to_string()),
            StoreError::InvalidId => ServiceError::BadRequest(err.to_string()),
        }
    }
}
