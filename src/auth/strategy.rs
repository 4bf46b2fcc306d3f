//! Strategy contract and the configured authentication state.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::app::App;
use crate::auth::token::TokenIssuer;
use crate::hooks::HookContext;
use crate::services::{ServiceError, ServiceHandle};

/// Bearer access token strategy name.
pub const TOKEN_STRATEGY: &str = "jwt";
/// Username/password strategy name.
pub const LOCAL_STRATEGY: &str = "local";

#[async_trait]
pub trait Strategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// `Ok(None)` when the call carries no credentials for this strategy,
    /// `Ok(Some(user))` on success, `Err` when credentials are present but wrong.
    async fn authenticate(&self, ctx: &HookContext) -> Result<Option<Value>, ServiceError>;
}

/// Authentication state kept in the app context.
#[derive(Clone, Default)]
pub struct Authentication {
    token: Option<Arc<TokenIssuer>>,
    strategies: Vec<Arc<dyn Strategy>>,
}

impl Authentication {
    pub fn with_token(token: Arc<TokenIssuer>) -> Self {
        Self {
            token: Some(token),
            strategies: Vec::new(),
        }
    }

    pub fn token(&self) -> Option<&Arc<TokenIssuer>> {
        self.token.as_ref()
    }

    pub fn push_strategy(&mut self, strategy: Arc<dyn Strategy>) {
        self.strategies.push(strategy);
    }

    pub fn strategy(&self, name: &str) -> Option<Arc<dyn Strategy>> {
        self.strategies.iter().find(|s| s.name() == name).cloned()
    }

    /// Strategy names in configuration order.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }
}

impl fmt::Debug for Authentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authentication")
            .field("token", &self.token)
            .field("strategies", &self.strategy_names())
            .finish()
    }
}

/// Look up the users service at call time.
pub(crate) fn users_service(app: &App, name: &str) -> Result<ServiceHandle, ServiceError> {
    app.service(name)
        .ok_or_else(|| ServiceError::General(format!("Users service `{}` is not registered", name)))
}

/// A user's id as a string.
pub(crate) fn user_id(user: &Value) -> Result<String, ServiceError> {
    match user.get("id") {
        Some(Value::String(id)) => Ok(id.clone()),
        Some(Value::Number(id)) => Ok(id.to_string()),
        _ => Err(ServiceError::General("Authenticated user has no id".into())),
    }
}
