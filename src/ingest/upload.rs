//! Read one uploaded file from a multipart body into memory.

use crate::error::IngestError;
use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;

/// Multipart field carrying the spreadsheet.
pub const FILE_FIELD: &str = "file";

#[derive(Debug)]
pub struct Upload {
    /// Client filename after sanitizing; used only for logging.
    pub filename: String,
    pub bytes: Bytes,
}

/// Take the `file` field from the body. Other fields are skipped.
pub async fn read_upload(multipart: &mut Multipart) -> Result<Upload, IngestError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(stream_error)?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = sanitize_filename(field.file_name().unwrap_or(""));
        if filename.is_empty() {
            return Err(IngestError::EmptyFilename);
        }
        let bytes = field.bytes().await.map_err(stream_error)?;
        tracing::info!(filename = %filename, size = bytes.len(), "received upload");
        return Ok(Upload { filename, bytes });
    }
    Err(IngestError::MissingFile)
}

/// Body-limit failures surface as 413; anything else is a malformed request.
fn stream_error(e: MultipartError) -> IngestError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        IngestError::TooLarge
    } else {
        IngestError::Multipart(e.body_text())
    }
}

/// Reduce a client-supplied filename to a safe basename: `[A-Za-z0-9_.-]` only, no leading dots.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(|c| c == '/' || c == '\\').next().unwrap_or("");
    let cleaned: String = base
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    cleaned.trim_matches(|c| c == '.' || c == '_').to_string()
}
