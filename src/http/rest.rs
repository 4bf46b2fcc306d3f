//! REST handlers.
//!
//! | Route | Method |
//! |---|---|
//! | `GET /{service}` | find |
//! | `POST /{service}` | create |
//! | `DELETE /{service}` | remove (no id) |
//! | `GET /{service}/{id}` | get |
//! | `PUT /{service}/{id}` | update |
//! | `PATCH /{service}/{id}` | patch |
//! | `DELETE /{service}/{id}` | remove |

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use axum::Json;
use serde_json::Value;

use crate::app::App;
use crate::services::{Params, ServiceError, ServiceHandle};

/// Provider name of calls arriving over HTTP.
pub const REST_PROVIDER: &str = "rest";

type QueryMap = Query<HashMap<String, String>>;

fn params(headers: &HeaderMap, query: HashMap<String, String>) -> Params {
    let mut params = Params::external(REST_PROVIDER);
    params.query = query
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect();
    params.authorization = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    params
}

fn lookup(app: &App, name: &str) -> Result<ServiceHandle, ServiceError> {
    app.service(name)
        .ok_or_else(|| ServiceError::NotFound(format!("Service `{}` not found", name)))
}

pub async fn find(
    State(app): State<App>,
    Path(service): Path<String>,
    Query(query): QueryMap,
    headers: HeaderMap,
) -> Result<Json<Value>, ServiceError> {
    let service = lookup(&app, &service)?;
    Ok(Json(service.find(params(&headers, query)).await?))
}

pub async fn get(
    State(app): State<App>,
    Path((service, id)): Path<(String, String)>,
    Query(query): QueryMap,
    headers: HeaderMap,
) -> Result<Json<Value>, ServiceError> {
    let service = lookup(&app, &service)?;
    Ok(Json(service.get(&id, params(&headers, query)).await?))
}

pub async fn create(
    State(app): State<App>,
    Path(service): Path<String>,
    Query(query): QueryMap,
    headers: HeaderMap,
    Json(data): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ServiceError> {
    let service = lookup(&app, &service)?;
    let created = service.create(data, params(&headers, query)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(app): State<App>,
    Path((service, id)): Path<(String, String)>,
    Query(query): QueryMap,
    headers: HeaderMap,
    Json(data): Json<Value>,
) -> Result<Json<Value>, ServiceError> {
    let service = lookup(&app, &service)?;
    Ok(Json(service.update(&id, data, params(&headers, query)).await?))
}

pub async fn patch(
    State(app): State<App>,
    Path((service, id)): Path<(String, String)>,
    Query(query): QueryMap,
    headers: HeaderMap,
    Json(data): Json<Value>,
) -> Result<Json<Value>, ServiceError> {
    let service = lookup(&app, &service)?;
    Ok(Json(service.patch(&id, data, params(&headers, query)).await?))
}

pub async fn remove(
    State(app): State<App>,
    Path((service, id)): Path<(String, String)>,
    Query(query): QueryMap,
    headers: HeaderMap,
) -> Result<Json<Value>, ServiceError> {
    let service = lookup(&app, &service)?;
    Ok(Json(service.remove(Some(&id), params(&headers, query)).await?))
}

pub async fn remove_all(
    State(app): State<App>,
    Path(service): Path<String>,
    Query(query): QueryMap,
    headers: HeaderMap,
) -> Result<Json<Value>, ServiceError> {
    let service = lookup(&app, &service)?;
    Ok(Json(service.remove(None, params(&headers, query)).await?))
}
