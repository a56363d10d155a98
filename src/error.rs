//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Failure talking to the remote tabular data service.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("remote service not configured: missing {0}")]
    NotConfigured(&'static str),
    #[error("remote request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("remote service returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected remote response: {0}")]
    Decode(String),
}

/// Errors surfaced by the entity CRUD endpoints.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error("bad request: {0}")]
    BadRequest(String),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Remote(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Errors surfaced by the spreadsheet ingestion endpoints.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("No file")]
    MissingFile,
    #[error("No selected file")]
    EmptyFilename,
    #[error("invalid upload: {0}")]
    Multipart(String),
    #[error("upload exceeds the size limit")]
    TooLarge,
    #[error("could not read spreadsheet: {0}")]
    Decode(String),
    #[error("spreadsheet has no worksheets")]
    NoSheet,
}

#[derive(Serialize)]
pub struct IngestErrorBody {
    pub status: &'static str,
    pub message: String,
}

impl IntoResponse for IngestError {
    fn into_response(self) -> Response {
        let status = match &self {
            IngestError::MissingFile | IngestError::EmptyFilename | IngestError::Multipart(_) => {
                StatusCode::BAD_REQUEST
            }
            IngestError::TooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            IngestError::Decode(_) | IngestError::NoSheet => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = IngestErrorBody {
            status: "error",
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<calamine::Error> for IngestError {
    fn from(e: calamine::Error) -> Self {
        IngestError::Decode(e.to_string())
    }
}
