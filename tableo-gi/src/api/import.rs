//! Guest-list import endpoint
//!
//! POST /events/{id}/guests/import: multipart upload of one seating
//! chart file, run through the import pipeline.

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::services::importer::{import_guest_list, FileUpload, ImportError};
use crate::AppState;

/// Multipart body cap; spreadsheets run larger than the 50 KB simple-file
/// threshold, plain text far below it
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Import success response
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub success: bool,
    #[serde(rename = "guestsCount")]
    pub guests_count: usize,
}

/// POST /events/{id}/guests/import
///
/// Reads the `file` part, runs the pipeline, and reports the number of
/// guests appended. Pipeline failures map to the structured error
/// taxonomy; a partial persistence failure carries `insertedCount`.
pub async fn import_guests(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    mut multipart: Multipart,
) -> ApiResult<Json<ImportResponse>> {
    let mut upload: Option<FileUpload> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read file data: {}", e)))?;

        upload = Some(FileUpload {
            filename,
            bytes: bytes.to_vec(),
        });
    }

    let upload = upload.ok_or(ApiError::Import(ImportError::NoFile))?;

    match import_guest_list(&state.db, &state.extractor, event_id, &upload).await {
        Ok(inserted) => Ok(Json(ImportResponse {
            success: true,
            guests_count: inserted,
        })),
        Err(err) => {
            *state.last_error.write().await = Some(err.to_string());
            Err(ApiError::Import(err))
        }
    }
}

/// Build import routes
pub fn import_routes() -> Router<AppState> {
    Router::new()
        .route("/events/:event_id/guests/import", post(import_guests))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}
