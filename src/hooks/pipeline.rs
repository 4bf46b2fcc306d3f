//! Hook pipeline.
//!
//! # Responsibilities
//! - Name the point at which a hook runs (`HookStage`)
//! - Run matching hooks in registration order
//! - Stop at the first hook error

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::hooks::context::HookContext;
use crate::hooks::discovery::Aspect;
use crate::services::{Method, ServiceError};

/// Where in a call a hook runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStage {
    Before(Method),
    After(Method),
    BeforeAll,
    AfterAll,
}

impl HookStage {
    pub fn aspect(&self) -> Aspect {
        match self {
            HookStage::Before(_) | HookStage::BeforeAll => Aspect::Before,
            HookStage::After(_) | HookStage::AfterAll => Aspect::After,
        }
    }

    pub fn matches(&self, aspect: Aspect, method: Method) -> bool {
        if self.aspect() != aspect {
            return false;
        }
        match self {
            HookStage::Before(m) | HookStage::After(m) => *m == method,
            HookStage::BeforeAll | HookStage::AfterAll => true,
        }
    }
}

impl fmt::Display for HookStage {
    /// `beforeCreate`, `afterAll`, ...
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let method = match self {
            HookStage::Before(m) | HookStage::After(m) => m.as_str(),
            HookStage::BeforeAll | HookStage::AfterAll => "all",
        };
        let mut chars = method.chars();
        let capitalized = match chars.next() {
            Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
            None => String::new(),
        };
        write!(f, "{}{}", self.aspect(), capitalized)
    }
}

/// A single pipeline step.
#[async_trait]
pub trait Hook: Send + Sync {
    fn name(&self) -> &'static str;

    async fn apply(&self, ctx: HookContext) -> Result<HookContext, ServiceError>;
}

/// Ordered list of staged hooks.
#[derive(Clone, Default)]
pub struct HookPipeline {
    stages: Vec<(HookStage, Arc<dyn Hook>)>,
}

impl HookPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`HookPipeline::push`].
    pub fn with(mut self, stage: HookStage, hook: impl Hook + 'static) -> Self {
        self.push(stage, hook);
        self
    }

    pub fn push(&mut self, stage: HookStage, hook: impl Hook + 'static) {
        self.stages.push((stage, Arc::new(hook)));
    }

    /// Append every stage of `other` after the existing ones.
    pub fn extend(&mut self, other: &HookPipeline) {
        self.stages.extend(other.stages.iter().cloned());
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// `stage:hook` labels in order, e.g. `beforeCreate:hash-password`.
    pub fn describe(&self) -> Vec<String> {
        self.stages
            .iter()
            .map(|(stage, hook)| format!("{}:{}", stage, hook.name()))
            .collect()
    }

    /// Run every hook registered for `aspect` and the context's method.
    pub async fn run(&self, aspect: Aspect, mut ctx: HookContext) -> Result<HookContext, ServiceError> {
        for (stage, hook) in &self.stages {
            if stage.matches(aspect, ctx.method) {
                tracing::trace!(service = %ctx.service, stage = %stage, hook = hook.name(), "Running hook");
                ctx = hook.apply(ctx).await?;
            }
        }
        Ok(ctx)
    }
}

impl fmt::Debug for HookPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.describe()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::Params;
    use serde_json::{json, Value};

    struct Tag(&'static str);

    #[async_trait]
    impl Hook for Tag {
        fn name(&self) -> &'static str {
            self.0
        }

        async fn apply(&self, mut ctx: HookContext) -> Result<HookContext, ServiceError> {
            let mut trail = match ctx.result.take() {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            };
            trail.push(json!(self.0));
            ctx.result = Some(Value::Array(trail));
            Ok(ctx)
        }
    }

    struct Fail;

    #[async_trait]
    impl Hook for Fail {
        fn name(&self) -> &'static str {
            "fail"
        }

        async fn apply(&self, _ctx: HookContext) -> Result<HookContext, ServiceError> {
            Err(ServiceError::BadRequest("nope".into()))
        }
    }

    fn ctx(method: Method) -> HookContext {
        HookContext::new("things", method, Params::default())
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(HookStage::Before(Method::Create).to_string(), "beforeCreate");
        assert_eq!(HookStage::After(Method::Remove).to_string(), "afterRemove");
        assert_eq!(HookStage::AfterAll.to_string(), "afterAll");
    }

    #[tokio::test]
    async fn test_runs_matching_stages_in_order() {
        let pipeline = HookPipeline::new()
            .with(HookStage::BeforeAll, Tag("all"))
            .with(HookStage::Before(Method::Create), Tag("create"))
            .with(HookStage::Before(Method::Find), Tag("find"))
            .with(HookStage::After(Method::Create), Tag("after"));

        let out = pipeline.run(Aspect::Before, ctx(Method::Create)).await.unwrap();
        assert_eq!(out.result, Some(json!(["all", "create"])));

        let out = pipeline.run(Aspect::After, ctx(Method::Create)).await.unwrap();
        assert_eq!(out.result, Some(json!(["after"])));
    }

    #[tokio::test]
    async fn test_error_stops_pipeline() {
        let pipeline = HookPipeline::new()
            .with(HookStage::BeforeAll, Fail)
            .with(HookStage::BeforeAll, Tag("unreached"));

        let err = pipeline.run(Aspect::Before, ctx(Method::Get)).await.unwrap_err();
        assert_eq!(err, ServiceError::BadRequest("nope".into()));
    }

    #[test]
    fn test_extend_appends() {
        let mut first = HookPipeline::new().with(HookStage::BeforeAll, Tag("a"));
        let second = HookPipeline::new().with(HookStage::AfterAll, Tag("b"));
        first.extend(&second);
        assert_eq!(first.describe(), vec!["beforeAll:a", "afterAll:b"]);
    }
}
