//! Entity CRUD routes. The entity segment is resolved to a table per request.

use crate::handlers::entity::{bulk_create, create, delete as delete_handler, list, update};
use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, routing::get, routing::patch, routing::post, Router};

pub fn entity_routes(state: AppState) -> Router {
    // Bulk bodies carry extracted spreadsheets, so they share the upload limit.
    let bulk_limit = DefaultBodyLimit::max(state.max_upload_bytes);
    Router::new()
        .route("/:entity", get(list).post(create))
        .route("/:entity/bulk", post(bulk_create).layer(bulk_limit))
        .route("/:entity/:id", patch(update).delete(delete_handler))
        .with_state(state)
}
