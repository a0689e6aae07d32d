//! Axum route handlers for the Roadmap API.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::progress::ProgressRecord;
use crate::models::roadmap::Roadmap;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateRoadmapRequest {
    pub company_id: Option<Uuid>,
    #[serde(default)]
    pub job_profile: String,
}

#[derive(Debug, Deserialize)]
pub struct InferSkillsRequest {
    #[serde(default)]
    pub job_profile: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct InferSkillsResponse {
    pub skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListRoadmapsQuery {
    pub company_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct RoadmapDetailQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RoadmapDetailResponse {
    pub roadmap: Roadmap,
    pub progress: Option<ProgressRecord>,
    pub is_saved: Option<bool>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/roadmaps/generate
///
/// Returns the roadmap for the company and job profile, creating it on first request.
pub async fn handle_generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRoadmapRequest>, JsonRejection>,
) -> Result<Json<Roadmap>, AppError> {
    let Json(request) = payload?;
    let company_id = request
        .company_id
        .ok_or_else(|| AppError::Validation("company_id is required".to_string()))?;
    let roadmap = state
        .roadmaps
        .get_or_create(company_id, &request.job_profile)
        .await?;
    Ok(Json(roadmap))
}

/// POST /api/v1/skills/infer
///
/// Previews the skills inferred from role text without creating a roadmap.
pub async fn handle_infer_skills(
    State(state): State<AppState>,
    payload: Result<Json<InferSkillsRequest>, JsonRejection>,
) -> Result<Json<InferSkillsResponse>, AppError> {
    let Json(request) = payload?;
    let skills = state
        .roadmaps
        .inference()
        .infer(&request.job_profile, &request.roles);
    Ok(Json(InferSkillsResponse { skills }))
}

/// GET /api/v1/roadmaps
///
/// All roadmaps, or only one company's when `company_id` is given.
pub async fn handle_list_roadmaps(
    State(state): State<AppState>,
    query: Result<Query<ListRoadmapsQuery>, QueryRejection>,
) -> Result<Json<Vec<Roadmap>>, AppError> {
    let Query(params) = query?;
    let roadmaps = match params.company_id {
        Some(company_id) => state.roadmaps.list_by_company(company_id).await?,
        None => state.roadmaps.list_all().await?,
    };
    Ok(Json(roadmaps))
}

/// GET /api/v1/companies/:company_id/roadmaps
pub async fn handle_list_by_company(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<Json<Vec<Roadmap>>, AppError> {
    Ok(Json(state.roadmaps.list_by_company(company_id).await?))
}

/// GET /api/v1/roadmaps/:id
///
/// The roadmap plus, when `user_id` is supplied, the caller's progress record and saved flag.
pub async fn handle_get_roadmap(
    State(state): State<AppState>,
    Path(roadmap_id): Path<Uuid>,
    query: Result<Query<RoadmapDetailQuery>, QueryRejection>,
) -> Result<Json<RoadmapDetailResponse>, AppError> {
    let Query(params) = query?;
    let roadmap = state.roadmaps.get_by_id(roadmap_id).await?;

    let (progress, is_saved) = match params.user_id.as_deref() {
        Some(user_id) => (
            state.progress.find_progress(user_id, roadmap_id).await?,
            Some(state.saved.is_saved(user_id, roadmap_id).await?),
        ),
        None => (None, None),
    };

    Ok(Json(RoadmapDetailResponse {
        roadmap,
        progress,
        is_saved,
    }))
}
