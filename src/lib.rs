//! ERP gateway: entity CRUD over a hosted PostgREST database plus spreadsheet ingestion.

pub mod config;
pub mod error;
pub mod handlers;
pub mod ingest;
pub mod remote;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;

pub use config::{resolve, Entity, EntityRef, GatewayConfig, RemoteSettings};
pub use error::{AppError, IngestError, RemoteError};
pub use remote::{PostgrestClient, Record, TableClient};
pub use routes::{app, common_routes, entity_routes, integration_routes};
pub use service::{CrudService, ListOutcome};
pub use state::AppState;
