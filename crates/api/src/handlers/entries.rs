//! Handlers for the `/entries` resource.
//!
//! Reads return the whole table (filtering and pagination are client-side);
//! mutations are the batch assign/unassign pair and the single-entry status
//! change. All validation happens before any query is issued.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use biograph_core::error::CoreError;
use biograph_core::status::validate_status;
use biograph_core::types::DbId;
use biograph_db::models::entry::{AssignEntries, CreateEntry, UnassignEntries, UpdateEntryStatus};
use biograph_db::repositories::EntryRepo;

use crate::error::{AppError, AppResult};
use crate::response::{DataResponse, UpdatedCount};
use crate::state::AppState;

/// GET /api/v1/entries
///
/// List every entry in id order.
pub async fn list_entries(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let entries = EntryRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// POST /api/v1/entries
///
/// Insert a new entry. Names are required; an empty status is stored as
/// NULL so it reads back as "Not Indicated".
pub async fn create_entry(
    State(state): State<AppState>,
    Json(mut input): Json<CreateEntry>,
) -> AppResult<impl IntoResponse> {
    if input.given_names.trim().is_empty() {
        return Err(AppError::BadRequest("given_names is required".into()));
    }
    if input.family_name.trim().is_empty() {
        return Err(AppError::BadRequest("family_name is required".into()));
    }
    match input.status.as_deref() {
        Some(s) if s.trim().is_empty() => input.status = None,
        Some(s) => validate_status(s).map_err(AppError::BadRequest)?,
        None => {}
    }

    let entry = EntryRepo::create(&state.pool, &input).await?;

    tracing::info!(entry_id = entry.id, "Entry created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

/// PUT /api/v1/entries/assign
///
/// Set both assignment fields on every selected entry in one batch update.
pub async fn assign_entries(
    State(state): State<AppState>,
    Json(input): Json<AssignEntries>,
) -> AppResult<impl IntoResponse> {
    if input.entry_ids.is_empty() {
        return Err(AppError::BadRequest("No entries selected".into()));
    }
    if input.assigned_id.trim().is_empty() || input.assigned_to.trim().is_empty() {
        return Err(AppError::BadRequest(
            "assigned_id and assigned_to are required".into(),
        ));
    }

    let updated = EntryRepo::assign(&state.pool, &input).await?;

    tracing::info!(
        assigned_id = %input.assigned_id,
        assigned_to = %input.assigned_to,
        updated,
        "Entries assigned"
    );

    Ok(Json(DataResponse {
        data: UpdatedCount { updated },
    }))
}

/// PUT /api/v1/entries/unassign
///
/// Clear both assignment fields on every selected entry.
pub async fn unassign_entries(
    State(state): State<AppState>,
    Json(input): Json<UnassignEntries>,
) -> AppResult<impl IntoResponse> {
    if input.entry_ids.is_empty() {
        return Err(AppError::BadRequest("No entries selected".into()));
    }

    let updated = EntryRepo::unassign(&state.pool, &input).await?;

    tracing::info!(updated, "Entries unassigned");

    Ok(Json(DataResponse {
        data: UpdatedCount { updated },
    }))
}

/// PUT /api/v1/entries/{id}/status
///
/// Change one entry's review status, returning the updated row.
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEntryStatus>,
) -> AppResult<impl IntoResponse> {
    validate_status(&input.status).map_err(AppError::BadRequest)?;

    let entry = EntryRepo::update_status(&state.pool, id, &input.status)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Entry", id }))?;

    tracing::info!(entry_id = id, status = %input.status, "Entry status updated");

    Ok(Json(DataResponse { data: entry }))
}
