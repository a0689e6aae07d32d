pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::progress::handlers as progress_handlers;
use crate::roadmap::handlers as roadmap_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Roadmaps
        .route(
            "/api/v1/roadmaps",
            get(roadmap_handlers::handle_list_roadmaps),
        )
        .route(
            "/api/v1/roadmaps/generate",
            post(roadmap_handlers::handle_generate),
        )
        .route(
            "/api/v1/roadmaps/:id",
            get(roadmap_handlers::handle_get_roadmap),
        )
        .route(
            "/api/v1/companies/:company_id/roadmaps",
            get(roadmap_handlers::handle_list_by_company),
        )
        .route(
            "/api/v1/skills/infer",
            post(roadmap_handlers::handle_infer_skills),
        )
        // Progress
        .route(
            "/api/v1/roadmaps/:id/progress",
            put(progress_handlers::handle_set_progress).get(progress_handlers::handle_get_progress),
        )
        .route(
            "/api/v1/progress",
            get(progress_handlers::handle_progress_summary),
        )
        // Saved roadmaps
        .route(
            "/api/v1/roadmaps/:id/save",
            post(progress_handlers::handle_toggle_save),
        )
        .route(
            "/api/v1/roadmaps/:id/saved",
            put(progress_handlers::handle_save).delete(progress_handlers::handle_unsave),
        )
        .route("/api/v1/saved", get(progress_handlers::handle_list_saved))
        .with_state(state)
}
