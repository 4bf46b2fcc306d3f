//! Local (username/password) strategy.

use async_trait::async_trait;
use serde_json::Value;

use crate::app::App;
use crate::auth::password::verify_password_async;
use crate::auth::strategy::{users_service, Strategy, LOCAL_STRATEGY};
use crate::hooks::HookContext;
use crate::services::{Params, ServiceError};

pub struct LocalStrategy {
    app: App,
    users: String,
    username_field: String,
    password_field: String,
}

impl LocalStrategy {
    pub fn new(
        app: App,
        users: impl Into<String>,
        username_field: impl Into<String>,
        password_field: impl Into<String>,
    ) -> Self {
        Self {
            app,
            users: users.into(),
            username_field: username_field.into(),
            password_field: password_field.into(),
        }
    }
}

fn invalid_login() -> ServiceError {
    ServiceError::NotAuthenticated("Invalid login".into())
}

#[async_trait]
impl Strategy for LocalStrategy {
    fn name(&self) -> &'static str {
        LOCAL_STRATEGY
    }

    async fn authenticate(&self, ctx: &HookContext) -> Result<Option<Value>, ServiceError> {
        let Some(data) = ctx.data.as_ref().and_then(Value::as_object) else {
            return Ok(None);
        };
        let username = data.get(&self.username_field).and_then(Value::as_str);
        let password = data.get(&self.password_field).and_then(Value::as_str);
        let (Some(username), Some(password)) = (username, password) else {
            return Ok(None);
        };

        let users = users_service(&self.app, &self.users)?;
        let params = Params::default().with_query(self.username_field.clone(), username);
        let found = users.raw().find(&params).await?;

        let user = found
            .as_array()
            .and_then(|records| records.first())
            .cloned()
            .ok_or_else(invalid_login)?;
        let hash = user
            .get(&self.password_field)
            .and_then(Value::as_str)
            .ok_or_else(invalid_login)?
            .to_string();

        if verify_password_async(password.to_string(), hash).await {
            tracing::debug!(username = %username, "Local login succeeded");
            Ok(Some(user))
        } else {
            Err(invalid_login())
        }
    }
}
