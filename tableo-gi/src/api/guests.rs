//! Guest CRUD endpoints
//!
//! GET /events/{id}/guests, POST /events/{id}/guests,
//! DELETE /events/{id}/guests/{guest_id}

use axum::{
    extract::{Path, State},
    routing::{get, delete},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::models::{GuestRecord, NormalizedGuest};
use crate::services::duplicate_resolver::collision_free_name;
use crate::AppState;

/// GET /events/{id}/guests response
#[derive(Debug, Serialize)]
pub struct GuestListResponse {
    pub guests: Vec<GuestRecord>,
    #[serde(rename = "totalGuests")]
    pub total_guests: usize,
}

/// POST /events/{id}/guests request
#[derive(Debug, Deserialize)]
pub struct AddGuestRequest {
    pub guest_name: String,
    pub table_number: String,
    #[serde(default)]
    pub seat_number: Option<String>,
}

/// GET /events/{id}/guests
///
/// Guests ordered by table then seat, with the total count.
pub async fn list_guests(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> ApiResult<Json<GuestListResponse>> {
    require_event(&state, event_id).await?;

    let guests = db::guests::list_guests(&state.db, event_id)
        .await
        .map_err(ApiError::Other)?;

    let total_guests = guests.len();
    Ok(Json(GuestListResponse {
        guests,
        total_guests,
    }))
}

/// POST /events/{id}/guests
///
/// Manual single-guest add. The same collision rule as the import path
/// applies, so "Alice" joining an event that has one becomes "Alice 1".
pub async fn add_guest(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(request): Json<AddGuestRequest>,
) -> ApiResult<Json<GuestRecord>> {
    let event = require_event(&state, event_id).await?;

    if !event.is_accessible(chrono::Utc::now()) {
        return Err(ApiError::Import(
            crate::services::importer::ImportError::WindowClosed,
        ));
    }

    let guest_name = request.guest_name.trim().to_string();
    let table_number = request.table_number.trim().to_string();

    if guest_name.is_empty() || table_number.is_empty() {
        return Err(ApiError::BadRequest(
            "guest_name and table_number are required".to_string(),
        ));
    }

    let existing_names = db::guests::load_guest_names(&state.db, event_id)
        .await
        .map_err(ApiError::Other)?;

    let guest = NormalizedGuest {
        guest_name: collision_free_name(&guest_name, &existing_names),
        table_number,
        seat_number: request
            .seat_number
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
    };

    let record = db::guests::insert_guest(&state.db, event_id, &guest)
        .await
        .map_err(ApiError::Other)?;

    tracing::info!(event_id = %event_id, guest_name = %record.guest_name, "Guest added");

    Ok(Json(record))
}

/// DELETE /events/{id}/guests/{guest_id}
pub async fn remove_guest(
    State(state): State<AppState>,
    Path((event_id, guest_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Value>> {
    require_event(&state, event_id).await?;

    let removed = db::guests::delete_guest(&state.db, event_id, guest_id)
        .await
        .map_err(ApiError::Other)?;

    if !removed {
        return Err(ApiError::NotFound(format!("Guest not found: {}", guest_id)));
    }

    tracing::info!(event_id = %event_id, guest_id = %guest_id, "Guest removed");

    Ok(Json(json!({ "success": true })))
}

/// Load the event or 404
async fn require_event(state: &AppState, event_id: Uuid) -> ApiResult<crate::models::Event> {
    db::events::load_event(&state.db, event_id)
        .await
        .map_err(ApiError::Other)?
        .ok_or_else(|| ApiError::NotFound(format!("Event not found: {}", event_id)))
}

/// Build guest routes
pub fn guest_routes() -> Router<AppState> {
    Router::new()
        .route("/events/:event_id/guests", get(list_guests).post(add_guest))
        .route("/events/:event_id/guests/:guest_id", delete(remove_guest))
}
