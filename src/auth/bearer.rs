//! Bearer access token strategy.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::app::App;
use crate::auth::strategy::{users_service, Strategy, TOKEN_STRATEGY};
use crate::auth::token::TokenIssuer;
use crate::hooks::HookContext;
use crate::services::{Method, Params, ServiceError};

pub struct BearerStrategy {
    app: App,
    issuer: Arc<TokenIssuer>,
    users: String,
}

impl BearerStrategy {
    pub fn new(app: App, issuer: Arc<TokenIssuer>, users: impl Into<String>) -> Self {
        Self {
            app,
            issuer,
            users: users.into(),
        }
    }
}

/// Token of an Authorization header value, with or without the `Bearer` scheme.
pub fn bearer_token(header: &str) -> Option<&str> {
    let token = header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .unwrap_or(header)
        .trim();
    (!token.is_empty()).then_some(token)
}

/// Token from the Authorization header, `data.accessToken`, or the id of a remove.
pub fn extract_token(ctx: &HookContext) -> Option<String> {
    if let Some(token) = ctx.params.authorization.as_deref().and_then(bearer_token) {
        return Some(token.to_string());
    }

    if let Some(token) = ctx
        .data
        .as_ref()
        .and_then(|data| data.get("accessToken"))
        .and_then(Value::as_str)
    {
        return Some(token.to_string());
    }

    match ctx.method {
        Method::Remove => ctx.id.clone(),
        _ => None,
    }
}

#[async_trait]
impl Strategy for BearerStrategy {
    fn name(&self) -> &'static str {
        TOKEN_STRATEGY
    }

    async fn authenticate(&self, ctx: &HookContext) -> Result<Option<Value>, ServiceError> {
        let Some(token) = extract_token(ctx) else {
            return Ok(None);
        };
        let claims = self.issuer.verify(&token)?;

        let users = users_service(&self.app, &self.users)?;
        let user = users
            .raw()
            .get(&claims.sub, &Params::default())
            .await
            .map_err(|_| ServiceError::NotAuthenticated("User for access token not found".into()))?;

        Ok(Some(user))
    }
}
