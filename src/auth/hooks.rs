//! Authentication hooks.
//!
//! - `Authenticate`: try strategies in order, set `params.user`
//! - `HashPassword`: replace a plaintext field with its hash
//! - `Protect`: strip fields from every returned record
//! - `AttachUser`: copy the authenticated user onto the result

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::app::{App, ConfigureError};
use crate::auth::password::hash_password_async;
use crate::auth::strategy::{Authentication, Strategy};
use crate::hooks::{Hook, HookContext};
use crate::services::ServiceError;

/// The objects of a value: itself, the items of an array, or the `data`
/// items of a paginated page.
fn records_mut(value: &mut Value) -> Vec<&mut Map<String, Value>> {
    let paged = value.get("total").is_some() && value.get("data").is_some_and(Value::is_array);
    if paged {
        return match value.get_mut("data") {
            Some(Value::Array(items)) => items.iter_mut().filter_map(Value::as_object_mut).collect(),
            _ => Vec::new(),
        };
    }

    match value {
        Value::Array(items) => items.iter_mut().filter_map(Value::as_object_mut).collect(),
        Value::Object(map) => vec![map],
        _ => Vec::new(),
    }
}

pub struct Authenticate {
    strategies: Vec<Arc<dyn Strategy>>,
}

impl Authenticate {
    /// Resolve `names` against the strategies configured on `app`.
    pub fn new(app: &App, names: &[&str]) -> Result<Self, ConfigureError> {
        let auth = app.get::<Authentication>().unwrap_or_default();
        let strategies = names
            .iter()
            .map(|name| {
                auth.strategy(name)
                    .ok_or_else(|| ConfigureError::UnknownStrategy(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { strategies })
    }
}

#[async_trait]
impl Hook for Authenticate {
    fn name(&self) -> &'static str {
        "authenticate"
    }

    async fn apply(&self, mut ctx: HookContext) -> Result<HookContext, ServiceError> {
        if !ctx.params.is_external() || ctx.params.user.is_some() {
            return Ok(ctx);
        }

        let mut last_error = None;
        for strategy in &self.strategies {
            match strategy.authenticate(&ctx).await {
                Ok(Some(user)) => {
                    tracing::debug!(service = %ctx.service, strategy = strategy.name(), "Authenticated");
                    ctx.params.user = Some(user);
                    return Ok(ctx);
                }
                Ok(None) => {}
                Err(e) => last_error = Some(e),
            }
        }

        Err(last_error.unwrap_or_else(|| ServiceError::NotAuthenticated("No credentials provided".into())))
    }
}

pub struct HashPassword {
    field: String,
}

impl HashPassword {
    pub fn new(field: impl Into<String>) -> Self {
        Self { field: field.into() }
    }
}

#[async_trait]
impl Hook for HashPassword {
    fn name(&self) -> &'static str {
        "hash-password"
    }

    async fn apply(&self, mut ctx: HookContext) -> Result<HookContext, ServiceError> {
        if let Some(data) = ctx.data.as_mut() {
            for record in records_mut(data) {
                if let Some(Value::String(plain)) = record.get(&self.field) {
                    let hashed = hash_password_async(plain.clone()).await?;
                    record.insert(self.field.clone(), Value::String(hashed));
                }
            }
        }
        Ok(ctx)
    }
}

pub struct Protect {
    fields: Vec<String>,
}

impl Protect {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl Hook for Protect {
    fn name(&self) -> &'static str {
        "protect"
    }

    async fn apply(&self, mut ctx: HookContext) -> Result<HookContext, ServiceError> {
        if let Some(result) = ctx.result.as_mut() {
            for record in records_mut(result) {
                for field in &self.fields {
                    record.remove(field);
                }
            }
        }
        Ok(ctx)
    }
}

pub struct AttachUser {
    protected: String,
}

impl AttachUser {
    /// `protected` is stripped from the copied user.
    pub fn new(protected: impl Into<String>) -> Self {
        Self { protected: protected.into() }
    }
}

#[async_trait]
impl Hook for AttachUser {
    fn name(&self) -> &'static str {
        "attach-user"
    }

    async fn apply(&self, mut ctx: HookContext) -> Result<HookContext, ServiceError> {
        if let (Some(mut user), Some(Value::Object(result))) = (ctx.params.user.clone(), ctx.result.as_mut()) {
            if let Some(fields) = user.as_object_mut() {
                fields.remove(&self.protected);
            }
            result.insert("user".to_string(), user);
        }
        Ok(ctx)
    }
}
