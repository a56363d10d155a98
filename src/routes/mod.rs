pub mod common;
pub mod entity;
pub mod integration;

pub use common::common_routes;
pub use entity::entity_routes;
pub use integration::integration_routes;

use crate::state::AppState;
use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Full application: common routes, `/api/integrations/*`, `/api/:entity/*`, CORS and request tracing.
pub fn app(state: AppState) -> Router {
    let max_upload_bytes = state.max_upload_bytes;
    Router::new()
        .merge(common_routes())
        .nest("/api/integrations", integration_routes(max_upload_bytes))
        .nest("/api", entity_routes(state))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
