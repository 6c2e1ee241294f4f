//! Error types for tableo-gi

use crate::services::importer::ImportError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Import pipeline failure, mapped per taxonomy
    #[error(transparent)]
    Import(#[from] ImportError),

    /// Generic error (500)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, inserted) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg, None),
            ApiError::Import(err) => import_error_parts(err),
            ApiError::Other(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                err.to_string(),
                None,
            ),
        };

        let mut body = json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        });

        // Partial-persistence responses must tell the caller how many
        // guests were committed before the failure
        if let Some(inserted) = inserted {
            body["insertedCount"] = json!(inserted);
        }

        (status, Json(body)).into_response()
    }
}

/// Map an import failure to HTTP status, error code and body extras
fn import_error_parts(err: ImportError) -> (StatusCode, &'static str, String, Option<usize>) {
    let message = err.to_string();
    match err {
        ImportError::NoFile => (StatusCode::BAD_REQUEST, "NO_FILE", message, None),
        ImportError::DisallowedExtension(_) => (
            StatusCode::BAD_REQUEST,
            "DISALLOWED_EXTENSION",
            message,
            None,
        ),
        ImportError::Spreadsheet(_) => (
            StatusCode::BAD_REQUEST,
            "SPREADSHEET_UNREADABLE",
            message,
            None,
        ),
        ImportError::EventNotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", message, None),
        ImportError::WindowClosed => (StatusCode::GONE, "EVENT_WINDOW_CLOSED", message, None),
        ImportError::Extraction(_) => (StatusCode::BAD_GATEWAY, "EXTRACTION_FAILED", message, None),
        ImportError::NoGuestsFound => (StatusCode::BAD_REQUEST, "NO_GUESTS_FOUND", message, None),
        ImportError::Persistence { inserted, .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "PERSISTENCE_FAILED",
            message,
            Some(inserted),
        ),
        ImportError::Database(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            message,
            None,
        ),
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
