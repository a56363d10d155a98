//! Shared application state for all routes. Built once from configuration; read-only afterwards.

use crate::config::GatewayConfig;
use crate::remote::{PostgrestClient, TableClient};
use crate::service::CrudService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub crud: CrudService,
    /// Body limit applied to upload routes.
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(config: &GatewayConfig) -> Self {
        let client = PostgrestClient::new(&config.remote);
        AppState::with_client(Arc::new(client), config.max_upload_bytes)
    }

    pub fn with_client(client: Arc<dyn TableClient>, max_upload_bytes: usize) -> Self {
        AppState {
            crud: CrudService::new(client),
            max_upload_bytes,
        }
    }
}
