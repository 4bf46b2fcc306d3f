//! Hook context passed through a pipeline.

use serde_json::Value;

use crate::services::{Method, Params};

/// State of one service call as seen by hooks.
#[derive(Debug, Clone)]
pub struct HookContext {
    /// Service name the call was made on.
    pub service: String,
    pub method: Method,
    pub id: Option<String>,
    /// Request payload for create, update and patch.
    pub data: Option<Value>,
    pub params: Params,
    /// Method result; set by the service, or by a before hook to skip it.
    pub result: Option<Value>,
}

impl HookContext {
    pub fn new(service: impl Into<String>, method: Method, params: Params) -> Self {
        Self {
            service: service.into(),
            method,
            id: None,
            data: None,
            params,
            result: None,
        }
    }

    pub fn with_id(mut self, id: Option<String>) -> Self {
        self.id = id;
        self
    }

    pub fn with_data(mut self, data: Option<Value>) -> Self {
        self.data = data;
        self
    }
}
