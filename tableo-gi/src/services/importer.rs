//! Guest-list import pipeline
//!
//! One import call walks: accessibility gate -> flatten -> local parse or
//! fallback extraction -> normalize -> resolve duplicates -> batched
//! persist. The existing-name fetch and candidate production are
//! independent reads and run concurrently; everything after the join is
//! sequential.
//!
//! Persistence is chunked and ordered with no cross-batch rollback: a
//! failing chunk aborts the import but the chunks before it stay
//! committed, and the error reports how many guests made it in. Two
//! concurrent imports for the same event are not serialized; they can
//! assign the same duplicate suffix.

use crate::db;
use crate::models::{GuestCandidate, NormalizedGuest};
use crate::services::duplicate_resolver::resolve_duplicates;
use crate::services::extraction_client::{ExtractionClient, ExtractionError};
use crate::services::local_parser::{self, LocalParse};
use crate::services::normalizer;
use crate::services::spreadsheet::{self, SpreadsheetError};
use sqlx::SqlitePool;
use thiserror::Error;
use uuid::Uuid;

/// Maximum guests per insert statement
pub const MAX_BATCH_SIZE: usize = 500;

/// Terminal import failures
///
/// A local parse that comes up empty is not in this taxonomy; it is the
/// normal branch that triggers fallback extraction.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("No file provided")]
    NoFile,

    #[error("File type not allowed: .{0}")]
    DisallowedExtension(String),

    #[error(transparent)]
    Spreadsheet(#[from] SpreadsheetError),

    #[error("Event not found: {0}")]
    EventNotFound(Uuid),

    #[error("Event is no longer accessible (grace period elapsed)")]
    WindowClosed,

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("No guests found in file")]
    NoGuestsFound,

    /// A chunk insert failed; `inserted` chunks-worth of guests before it
    /// remain committed
    #[error("Persistence failed after {inserted} guests: {source}")]
    Persistence {
        inserted: usize,
        source: sqlx::Error,
    },

    #[error("Database error: {0}")]
    Database(#[source] anyhow::Error),
}

/// One uploaded file
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Import a guest list into an event
///
/// Returns the number of guests inserted on full success.
pub async fn import_guest_list(
    pool: &SqlitePool,
    extractor: &ExtractionClient,
    event_id: Uuid,
    upload: &FileUpload,
) -> Result<usize, ImportError> {
    // Accessibility gate runs before any pipeline work
    let event = db::events::load_event(pool, event_id)
        .await
        .map_err(ImportError::Database)?
        .ok_or(ImportError::EventNotFound(event_id))?;

    if !event.is_accessible(chrono::Utc::now()) {
        return Err(ImportError::WindowClosed);
    }

    let extension = spreadsheet::file_extension(&upload.filename).unwrap_or_default();
    if !spreadsheet::is_allowed_extension(&extension) {
        return Err(ImportError::DisallowedExtension(extension));
    }

    tracing::info!(
        event_id = %event_id,
        filename = %upload.filename,
        size = upload.bytes.len(),
        "Import received"
    );

    // Spreadsheets flatten to delimited text (first sheet) before any
    // parsing; the eligibility check below sees the flattened content
    let content = spreadsheet::flatten_upload(&extension, &upload.bytes)?;

    // Two independent reads, joined before normalization
    let (existing_names, candidates) = tokio::join!(
        db::guests::load_guest_names(pool, event_id),
        produce_candidates(extractor, &upload.filename, &content),
    );
    let existing_names = existing_names.map_err(ImportError::Database)?;
    let candidates = candidates?;

    let normalized = normalizer::normalize(&candidates);
    if normalized.is_empty() {
        return Err(ImportError::NoGuestsFound);
    }

    let resolved = resolve_duplicates(normalized, existing_names);

    let inserted = persist_batches(pool, event_id, &resolved).await?;

    tracing::info!(event_id = %event_id, inserted, "Import completed");

    Ok(inserted)
}

/// Produce raw candidates: local heuristics when the file is simple,
/// fallback extraction otherwise
async fn produce_candidates(
    extractor: &ExtractionClient,
    filename: &str,
    content: &str,
) -> Result<Vec<GuestCandidate>, ImportError> {
    if local_parser::is_simple_file(filename, content) {
        if let LocalParse::Parsed(candidates) = local_parser::try_parse(content) {
            tracing::info!(count = candidates.len(), "Parsed guest list locally");
            return Ok(candidates);
        }
        tracing::debug!("Local heuristics gave up, using extraction service");
    } else {
        tracing::debug!("File not eligible for local parsing, using extraction service");
    }

    let candidates = extractor.extract_guests(content).await?;
    Ok(candidates)
}

/// Persist guests in ordered chunks, aborting on the first failure
async fn persist_batches(
    pool: &SqlitePool,
    event_id: Uuid,
    guests: &[NormalizedGuest],
) -> Result<usize, ImportError> {
    let mut inserted = 0;

    for chunk in guests.chunks(MAX_BATCH_SIZE) {
        if let Err(source) = db::guests::insert_guests(pool, event_id, chunk).await {
            tracing::error!(
                event_id = %event_id,
                inserted,
                error = %source,
                "Guest batch insert failed, earlier batches remain committed"
            );
            return Err(ImportError::Persistence { inserted, source });
        }
        inserted += chunk.len();
        tracing::debug!(event_id = %event_id, inserted, total = guests.len(), "Guest batch committed");
    }

    Ok(inserted)
}
