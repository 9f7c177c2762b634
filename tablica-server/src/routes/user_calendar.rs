//! Events added through the board's admin forms

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
};
use serde::{Deserialize, Serialize};

use tablica_core::store::{NewEvent, StoredEvent};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/user-calendar", get(list_events).post(create_event))
        .route("/user-calendar/{id}", put(update_event).delete(delete_event))
}

/// Request body for creating or updating an event
#[derive(Deserialize)]
pub struct EventRequest {
    #[serde(default)]
    pub password: Option<String>,
    #[serde(flatten)]
    pub event: NewEvent,
}

#[derive(Deserialize)]
pub struct PasswordQuery {
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// GET /user-calendar - List stored events
async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<StoredEvent>>, AppError> {
    Ok(Json(state.store().list()?))
}

/// POST /user-calendar - Create an event
async fn create_event(
    State(state): State<AppState>,
    Json(req): Json<EventRequest>,
) -> Result<(StatusCode, Json<StoredEvent>), AppError> {
    state.check_password(req.password.as_deref())?;

    let event = state.store().create(req.event)?;
    tracing::info!(id = %event.id, title = %event.title, "Created user event");

    Ok((StatusCode::CREATED, Json(event)))
}

/// PUT /user-calendar/{id} - Replace an event's fields
async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<EventRequest>,
) -> Result<Json<StoredEvent>, AppError> {
    state.check_password(req.password.as_deref())?;

    let event = state.store().update(&id, req.event)?;
    tracing::info!(id = %event.id, "Updated user event");

    Ok(Json(event))
}

/// DELETE /user-calendar/{id}?password=... - Remove an event
async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<PasswordQuery>,
) -> Result<Json<DeleteResponse>, AppError> {
    state.check_password(query.password.as_deref())?;

    if !state.store().delete(&id)? {
        return Err(AppError::new(StatusCode::NOT_FOUND, "Event not found"));
    }
    tracing::info!(%id, "Deleted user event");

    Ok(Json(DeleteResponse { success: true }))
}
