//! The `authentication` service: issues and revokes access tokens.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::auth::bearer::bearer_token;
use crate::auth::strategy::user_id;
use crate::auth::token::TokenIssuer;
use crate::auth::AUTHENTICATION_SERVICE;
use crate::services::{Params, Service, ServiceError};

pub struct AuthenticationService {
    issuer: Arc<TokenIssuer>,
}

impl AuthenticationService {
    pub fn new(issuer: Arc<TokenIssuer>) -> Self {
        Self { issuer }
    }
}

#[async_trait]
impl Service for AuthenticationService {
    fn kind(&self) -> &str {
        AUTHENTICATION_SERVICE
    }

    /// Requires `params.user`, set by the authenticate hook.
    async fn create(&self, _data: Value, params: &Params) -> Result<Value, ServiceError> {
        let user = params
            .user
            .as_ref()
            .ok_or_else(|| ServiceError::NotAuthenticated("Not authenticated".into()))?;
        let token = self.issuer.issue(&user_id(user)?)?;
        Ok(json!({ "accessToken": token }))
    }

    /// Tokens are stateless; removal acknowledges the token being dropped.
    async fn remove(&self, id: Option<&str>, params: &Params) -> Result<Value, ServiceError> {
        let token = id.map(str::to_string).or_else(|| {
            params
                .authorization
                .as_deref()
                .and_then(bearer_token)
                .map(str::to_string)
        });
        Ok(json!({ "accessToken": token }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthenticationService {
        AuthenticationService::new(Arc::new(TokenIssuer::new("secret", "acter", 60)))
    }

    #[tokio::test]
    async fn test_create_requires_user() {
        let result = service().create(json!({}), &Params::default()).await;
        assert!(matches!(result, Err(ServiceError::NotAuthenticated(_))));
    }

    #[tokio::test]
    async fn test_create_issues_token_for_user() {
        let params = Params {
            user: Some(json!({ "id": "u1" })),
            ..Params::default()
        };
        let result = service().create(json!({}), &params).await.unwrap();
        assert!(result["accessToken"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_remove_echoes_header_token() {
        for header in ["Bearer abc", "bearer abc"] {
            let params = Params::external("rest").with_authorization(header);
            let result = service().remove(None, &params).await.unwrap();
            assert_eq!(result, json!({ "accessToken": "abc" }));
        }

        let result = service().remove(Some("xyz"), &Params::default()).await.unwrap();
        assert_eq!(result, json!({ "accessToken": "xyz" }));
    }

    #[tokio::test]
    async fn test_find_is_not_allowed() {
        let result = service().find(&Params::default()).await;
        assert!(matches!(result, Err(ServiceError::MethodNotAllowed { .. })));
    }
}
