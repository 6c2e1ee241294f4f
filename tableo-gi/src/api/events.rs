//! Event endpoints
//!
//! POST /events, GET /events/{id}

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::models::Event;
use crate::AppState;

/// POST /events request
#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub name: String,
    /// ISO date (YYYY-MM-DD)
    pub event_date: String,
}

/// GET /events/{id} response
#[derive(Debug, Serialize)]
pub struct EventResponse {
    #[serde(flatten)]
    pub event: Event,
    #[serde(rename = "guestsCount")]
    pub guests_count: i64,
    #[serde(rename = "isAccessible")]
    pub is_accessible: bool,
}

/// POST /events
pub async fn create_event(
    State(state): State<AppState>,
    Json(request): Json<CreateEventRequest>,
) -> ApiResult<Json<Event>> {
    let name = request.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::BadRequest("name is required".to_string()));
    }

    let event_date = NaiveDate::parse_from_str(&request.event_date, "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest("event_date must be YYYY-MM-DD".to_string()))?;

    let event = Event {
        id: Uuid::new_v4(),
        name,
        event_date,
    };

    db::events::save_event(&state.db, &event)
        .await
        .map_err(ApiError::Other)?;

    tracing::info!(event_id = %event.id, name = %event.name, "Event created");

    Ok(Json(event))
}

/// GET /events/{id}
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> ApiResult<Json<EventResponse>> {
    let event = db::events::load_event(&state.db, event_id)
        .await
        .map_err(ApiError::Other)?
        .ok_or_else(|| ApiError::NotFound(format!("Event not found: {}", event_id)))?;

    let guests_count = db::guests::count_guests(&state.db, event_id)
        .await
        .map_err(ApiError::Other)?;

    let is_accessible = event.is_accessible(chrono::Utc::now());

    Ok(Json(EventResponse {
        event,
        guests_count,
        is_accessible,
    }))
}

/// Build event routes
pub fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/events", post(create_event))
        .route("/events/:event_id", get(get_event))
}
