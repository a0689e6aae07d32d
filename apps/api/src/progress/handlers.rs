//! Axum route handlers for progress tracking and saved roadmaps.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::progress::ProgressRecord;
use crate::models::roadmap::Roadmap;
use crate::progress::saved::SaveState;
use crate::progress::tracker::ProgressSummary;
use crate::state::AppState;

// Identifiers default to blank so a missing one fails `require_non_blank`
// with the same error as an empty one.

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    #[serde(default)]
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct UserIdBody {
    #[serde(default)]
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SetProgressRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub resource_id: String,
    pub completed: Option<bool>,
}

/// PUT /api/v1/roadmaps/:id/progress
pub async fn handle_set_progress(
    State(state): State<AppState>,
    Path(roadmap_id): Path<Uuid>,
    payload: Result<Json<SetProgressRequest>, JsonRejection>,
) -> Result<Json<ProgressRecord>, AppError> {
    let Json(req) = payload?;
    let completed = req
        .completed
        .ok_or_else(|| AppError::Validation("completed is required".to_string()))?;
    let record = state
        .progress
        .set_resource_completion(&req.user_id, roadmap_id, &req.resource_id, completed)
        .await?;
    Ok(Json(record))
}

/// GET /api/v1/roadmaps/:id/progress
pub async fn handle_get_progress(
    State(state): State<AppState>,
    Path(roadmap_id): Path<Uuid>,
    query: Result<Query<UserIdQuery>, QueryRejection>,
) -> Result<Json<ProgressRecord>, AppError> {
    let Query(params) = query?;
    Ok(Json(
        state.progress.get_progress(&params.user_id, roadmap_id).await?,
    ))
}

/// GET /api/v1/progress
///
/// Completion percentage for every roadmap the user has saved.
pub async fn handle_progress_summary(
    State(state): State<AppState>,
    query: Result<Query<UserIdQuery>, QueryRejection>,
) -> Result<Json<Vec<ProgressSummary>>, AppError> {
    let Query(params) = query?;
    Ok(Json(
        state.progress.get_aggregate_progress(&params.user_id).await?,
    ))
}

/// POST /api/v1/roadmaps/:id/save
pub async fn handle_toggle_save(
    State(state): State<AppState>,
    Path(roadmap_id): Path<Uuid>,
    payload: Result<Json<UserIdBody>, JsonRejection>,
) -> Result<Json<SaveState>, AppError> {
    let Json(req) = payload?;
    Ok(Json(state.saved.toggle_save(&req.user_id, roadmap_id).await?))
}

/// PUT /api/v1/roadmaps/:id/saved
pub async fn handle_save(
    State(state): State<AppState>,
    Path(roadmap_id): Path<Uuid>,
    payload: Result<Json<UserIdBody>, JsonRejection>,
) -> Result<Json<SaveState>, AppError> {
    let Json(req) = payload?;
    Ok(Json(state.saved.save(&req.user_id, roadmap_id).await?))
}

/// DELETE /api/v1/roadmaps/:id/saved
pub async fn handle_unsave(
    State(state): State<AppState>,
    Path(roadmap_id): Path<Uuid>,
    query: Result<Query<UserIdQuery>, QueryRejection>,
) -> Result<Json<SaveState>, AppError> {
    let Query(params) = query?;
    Ok(Json(state.saved.unsave(&params.user_id, roadmap_id).await?))
}

/// GET /api/v1/saved
pub async fn handle_list_saved(
    State(state): State<AppState>,
    query: Result<Query<UserIdQuery>, QueryRejection>,
) -> Result<Json<Vec<Roadmap>>, AppError> {
    let Query(params) = query?;
    Ok(Json(state.saved.list_saved(&params.user_id).await?))
}
