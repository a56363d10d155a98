//! Spreadsheet ingestion routes with their own body limit.

use crate::handlers::integration::extract;
use axum::{extract::DefaultBodyLimit, routing::post, Router};

/// Bodies over `max_upload_bytes` fail while the multipart stream is read and map to 413.
pub fn integration_routes(max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/upload", post(extract))
        .route("/extract", post(extract))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}
