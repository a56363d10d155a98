//! Spreadsheet upload handlers. Uploads stay in memory; `upload` and `extract` both decode the file in the request.

use crate::error::IngestError;
use crate::ingest::{self, read_upload};
use crate::response::ingest_success;
use axum::extract::{multipart::MultipartRejection, Multipart};
use axum::response::IntoResponse;

/// POST /api/integrations/extract (and /upload): multipart form with a `file` field.
pub async fn extract(multipart: Result<Multipart, MultipartRejection>) -> Result<impl IntoResponse, IngestError> {
    let mut multipart = multipart.map_err(|e| IngestError::Multipart(e.body_text()))?;
    let upload = read_upload(&mut multipart).await?;
    let filename = upload.filename;
    let bytes = upload.bytes;

    let extraction = tokio::task::spawn_blocking(move || ingest::extract(bytes))
        .await
        .map_err(|e| IngestError::Decode(e.to_string()))??;

    tracing::info!(filename = %filename, count = extraction.count, "extracted spreadsheet");
    tracing::debug!(output = ?extraction.records, "extracted rows");
    Ok(ingest_success(extraction.records))
}
