//! The service contract.
//!
//! A service is a named unit of business logic with up to six methods.
//! Methods a service does not implement answer `MethodNotAllowed`.

use std::fmt;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::app::App;
use crate::services::error::ServiceError;

/// Service methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Find,
    Get,
    Create,
    Update,
    Patch,
    Remove,
}

impl Method {
    pub const ALL: [Method; 6] = [
        Method::Find,
        Method::Get,
        Method::Create,
        Method::Update,
        Method::Patch,
        Method::Remove,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Find => "find",
            Method::Get => "get",
            Method::Create => "create",
            Method::Update => "update",
            Method::Patch => "patch",
            Method::Remove => "remove",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-call parameters.
#[derive(Debug, Clone, Default)]
pub struct Params {
    /// Transport the call arrived through (`Some("rest")`); `None` for internal calls.
    pub provider: Option<String>,

    /// Query fields (find filters).
    pub query: Map<String, Value>,

    /// Raw `Authorization` header, if any.
    pub authorization: Option<String>,

    /// Authenticated user, set by authentication hooks.
    pub user: Option<Value>,
}

impl Params {
    /// Parameters for a call coming from outside the process.
    pub fn external(provider: impl Into<String>) -> Self {
        Self {
            provider: Some(provider.into()),
            ..Self::default()
        }
    }

    pub fn is_external(&self) -> bool {
        self.provider.is_some()
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn with_authorization(mut self, authorization: impl Into<String>) -> Self {
        self.authorization = Some(authorization.into());
        self
    }
}

#[async_trait]
pub trait Service: Send + Sync {
    /// Name used in `MethodNotAllowed` errors.
    fn kind(&self) -> &str;

    async fn find(&self, _params: &Params) -> Result<Value, ServiceError> {
        Err(self.not_allowed(Method::Find))
    }

    async fn get(&self, _id: &str, _params: &Params) -> Result<Value, ServiceError> {
        Err(self.not_allowed(Method::Get))
    }

    async fn create(&self, _data: Value, _params: &Params) -> Result<Value, ServiceError> {
        Err(self.not_allowed(Method::Create))
    }

    async fn update(&self, _id: &str, _data: Value, _params: &Params) -> Result<Value, ServiceError> {
        Err(self.not_allowed(Method::Update))
    }

    async fn patch(&self, _id: &str, _data: Value, _params: &Params) -> Result<Value, ServiceError> {
        Err(self.not_allowed(Method::Patch))
    }

    async fn remove(&self, _id: Option<&str>, _params: &Params) -> Result<Value, ServiceError> {
        Err(self.not_allowed(Method::Remove))
    }

    /// Called once after the server is bound.
    async fn setup(&self, _app: &App, _path: &str) -> Result<(), ServiceError> {
        Ok(())
    }

    fn not_allowed(&self, method: Method) -> ServiceError {
        ServiceError::MethodNotAllowed {
            service: self.kind().to_string(),
            method: method.to_string(),
        }
    }
}
