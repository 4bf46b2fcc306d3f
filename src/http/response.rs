//! Error responses.
//!
//! # Responsibilities
//! - Map service errors to HTTP status codes
//! - Render a JSON error body clients can branch on
//!
//! # Design Decisions
//! - 5xx errors are logged at error level, 4xx at debug
//! - The body always carries `name`, `message`, `code` and `className`

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::services::ServiceError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub name: &'static str,
    pub message: String,
    pub code: u16,
    pub class_name: &'static str,
}

impl From<&ServiceError> for ErrorBody {
    fn from(err: &ServiceError) -> Self {
        Self {
            name: err.name(),
            message: err.to_string(),
            code: err.code(),
            class_name: err.class_name(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(error = %self, "Service call failed");
        } else {
            tracing::debug!(status = %status, error = %self, "Service call rejected");
        }
        (status, Json(ErrorBody::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ServiceError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::NotAuthenticated("x".into()), StatusCode::UNAUTHORIZED),
            (ServiceError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ServiceError::Conflict("x".into()), StatusCode::CONFLICT),
            (ServiceError::General("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_body_fields() {
        let body = ErrorBody::from(&ServiceError::NotFound("gone".into()));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "NotFound",
                "message": "gone",
                "code": 404,
                "className": "not-found"
            })
        );
    }
}
