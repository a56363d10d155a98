//! Response body helpers. Entity endpoints return bare JSON; ingestion uses a status envelope.

use axum::{http::StatusCode, Json};
use serde::Serialize;

pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(data))
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(data))
}

#[derive(Serialize)]
pub struct StatusBody {
    pub status: &'static str,
}

pub fn deleted() -> (StatusCode, Json<StatusBody>) {
    ok(StatusBody { status: "deleted" })
}

#[derive(Serialize)]
pub struct IngestSuccess<T> {
    pub status: &'static str,
    pub output: Vec<T>,
    pub count: usize,
}

pub fn ingest_success<T: Serialize>(output: Vec<T>) -> (StatusCode, Json<IngestSuccess<T>>) {
    let count = output.len();
    ok(IngestSuccess {
        status: "success",
        output,
        count,
    })
}
