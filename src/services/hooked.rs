//! Hook-wrapped services.
//!
//! # Responsibilities
//! - Run before hooks, the service method, then after hooks
//! - Let a before hook short-circuit the method by setting a result
//! - Accept additional hooks at any time without blocking callers

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde_json::Value;

use crate::hooks::{Aspect, HookContext, HookPipeline};
use crate::services::error::ServiceError;
use crate::services::service::{Method, Params, Service};

/// Shared handle to a registered service.
pub type ServiceHandle = Arc<HookedService>;

pub struct HookedService {
    name: String,
    inner: Arc<dyn Service>,
    hooks: ArcSwap<HookPipeline>,
}

impl HookedService {
    pub fn new(name: impl Into<String>, inner: Arc<dyn Service>) -> Self {
        Self {
            name: name.into(),
            inner,
            hooks: ArcSwap::from_pointee(HookPipeline::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The wrapped service, bypassing hooks.
    pub fn raw(&self) -> &Arc<dyn Service> {
        &self.inner
    }

    /// Append `pipeline` to this service's hooks.
    pub fn hooks(&self, pipeline: HookPipeline) {
        self.hooks.rcu(|current| {
            let mut next = HookPipeline::clone(current);
            next.extend(&pipeline);
            next
        });
    }

    /// Snapshot of the current pipeline.
    pub fn pipeline(&self) -> Arc<HookPipeline> {
        self.hooks.load_full()
    }

    /// Run a full call through the pipeline.
    pub async fn call(&self, ctx: HookContext) -> Result<Value, ServiceError> {
        let pipeline = self.hooks.load_full();

        let mut ctx = pipeline.run(Aspect::Before, ctx).await?;
        if ctx.result.is_none() {
            ctx.result = Some(self.dispatch(&ctx).await?);
        }
        let ctx = pipeline.run(Aspect::After, ctx).await?;

        Ok(ctx.result.unwrap_or(Value::Null))
    }

    async fn dispatch(&self, ctx: &HookContext) -> Result<Value, ServiceError> {
        let params = &ctx.params;
        let data = || ctx.data.clone().unwrap_or(Value::Null);
        match ctx.method {
            Method::Find => self.inner.find(params).await,
            Method::Get => self.inner.get(require_id(ctx)?, params).await,
            Method::Create => self.inner.create(data(), params).await,
            Method::Update => self.inner.update(require_id(ctx)?, data(), params).await,
            Method::Patch => self.inner.patch(require_id(ctx)?, data(), params).await,
            Method::Remove => self.inner.remove(ctx.id.as_deref(), params).await,
        }
    }

    fn context(&self, method: Method, params: Params) -> HookContext {
        HookContext::new(self.name.clone(), method, params)
    }

    pub async fn find(&self, params: Params) -> Result<Value, ServiceError> {
        self.call(self.context(Method::Find, params)).await
    }

    pub async fn get(&self, id: &str, params: Params) -> Result<Value, ServiceError> {
        let ctx = self.context(Method::Get, params).with_id(Some(id.to_string()));
        self.call(ctx).await
    }

    pub async fn create(&self, data: Value, params: Params) -> Result<Value, ServiceError> {
        let ctx = self.context(Method::Create, params).with_data(Some(data));
        self.call(ctx).await
    }

    pub async fn update(&self, id: &str, data: Value, params: Params) -> Result<Value, ServiceError> {
        let ctx = self
            .context(Method::Update, params)
            .with_id(Some(id.to_string()))
            .with_data(Some(data));
        self.call(ctx).await
    }

    pub async fn patch(&self, id: &str, data: Value, params: Params) -> Result<Value, ServiceError> {
        let ctx = self
            .context(Method::Patch, params)
            .with_id(Some(id.to_string()))
            .with_data(Some(data));
        self.call(ctx).await
    }

    pub async fn remove(&self, id: Option<&str>, params: Params) -> Result<Value, ServiceError> {
        let ctx = self
            .context(Method::Remove, params)
            .with_id(id.map(str::to_string));
        self.call(ctx).await
    }
}

fn require_id(ctx: &HookContext) -> Result<&str, ServiceError> {
    ctx.id
        .as_deref()
        .ok_or_else(|| ServiceError::BadRequest(format!("`{}` requires an id", ctx.method)))
}

impl fmt::Debug for HookedService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookedService")
            .field("name", &self.name)
            .field("hooks", &self.hooks.load_full())
            .finish_non_exhaustive()
    }
}
