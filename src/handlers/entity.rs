//! Entity CRUD handlers: list, create, bulk create, update, delete.

use crate::config::EntityRef;
use crate::error::AppError;
use crate::remote::Record;
use crate::response::{created, deleted, ok};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::Value;
use std::collections::HashMap;

const SORT_PARAM: &str = "sort";

fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    body.map(|Json(v)| v).map_err(|e| AppError::BadRequest(e.body_text()))
}

fn body_to_record(value: Value) -> Result<Record, AppError> {
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}

/// GET /api/:entity — never fails; remote errors yield `[]`.
pub async fn list(
    State(state): State<AppState>,
    Path(entity): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let entity = EntityRef::parse(&entity);
    let sort = params.get(SORT_PARAM).map(String::as_str);
    let rows = state.crud.list(&entity, sort, &params).await.into_rows();
    ok(rows)
}

pub async fn create(
    State(state): State<AppState>,
    Path(entity): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let entity = EntityRef::parse(&entity);
    let body = body_to_record(json_body(body)?)?;
    let row = state.crud.create(&entity, body).await?;
    Ok(created(row))
}

pub async fn bulk_create(
    State(state): State<AppState>,
    Path(entity): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let entity = EntityRef::parse(&entity);
    let items: Vec<Record> = match json_body(body)? {
        Value::Array(arr) => arr.into_iter().map(body_to_record).collect::<Result<_, _>>()?,
        _ => return Err(AppError::BadRequest("body must be a JSON array".into())),
    };
    let rows = state.crud.bulk_create(&entity, &items).await?;
    Ok(created(rows))
}

pub async fn update(
    State(state): State<AppState>,
    Path((entity, id)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let entity = EntityRef::parse(&entity);
    let patch = body_to_record(json_body(body)?)?;
    let rows = state.crud.update(&entity, &id, &patch).await?;
    Ok(ok(rows))
}

pub async fn delete(
    State(state): State<AppState>,
    Path((entity, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let entity = EntityRef::parse(&entity);
    state.crud.delete(&entity, &id).await?;
    Ok(deleted())
}
