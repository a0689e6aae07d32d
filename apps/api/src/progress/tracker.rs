//! Progress Tracker: per-(user, roadmap) completion sets and the aggregate
//! view over a user's saved roadmaps.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::{require_non_blank, AppError};
use crate::models::progress::ProgressRecord;
use crate::models::roadmap::Roadmap;
use crate::progress::saved::SavedRoadmapRegistry;
use crate::storage::{ProgressRepository, RoadmapRepository};

/// Completion summary for one saved roadmap.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgressSummary {
    pub roadmap_id: Uuid,
    pub company_id: Uuid,
    pub job_profile: String,
    pub percentage: u32, // 0-100
    pub completed_count: usize,
    pub total_count: usize,
}

#[derive(Clone)]
pub struct ProgressTracker {
    roadmaps: Arc<dyn RoadmapRepository>,
    progress: Arc<dyn ProgressRepository>,
    saved: SavedRoadmapRegistry,
}

impl ProgressTracker {
    pub fn new(
        roadmaps: Arc<dyn RoadmapRepository>,
        progress: Arc<dyn ProgressRepository>,
        saved: SavedRoadmapRegistry,
    ) -> Self {
        Self {
            roadmaps,
            progress,
            saved,
        }
    }

    /// Marks a resource complete or incomplete and returns the updated record.
    ///
    /// The resource must belong to the roadmap; foreign ids are rejected rather
    /// than stored. Repeating a call with the same `completed` value is a no-op
    /// on the set (only `last_updated` moves).
    pub async fn set_resource_completion(
        &self,
        user_id: &str,
        roadmap_id: Uuid,
        resource_id: &str,
        completed: bool,
    ) -> Result<ProgressRecord, AppError> {
        let user_id = require_non_blank("user_id", user_id)?;
        let resource_id = require_non_blank("resource_id", resource_id)?;

        let roadmap = self
            .roadmaps
            .get(roadmap_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Roadmap {roadmap_id} not found")))?;

        if !roadmap.contains_resource(resource_id) {
            return Err(AppError::Validation(format!(
                "Resource '{resource_id}' does not belong to roadmap {roadmap_id}"
            )));
        }

        let record = if completed {
            self.progress
                .add_completed(user_id, roadmap_id, resource_id)
                .await?
        } else {
            self.progress
                .remove_completed(user_id, roadmap_id, resource_id)
                .await?
        };

        info!(
            "User {user_id} marked {resource_id} on roadmap {roadmap_id} as {} ({} completed)",
            if completed { "complete" } else { "incomplete" },
            record.completed_resources.len()
        );
        Ok(record)
    }

    pub async fn get_progress(
        &self,
        user_id: &str,
        roadmap_id: Uuid,
    ) -> Result<ProgressRecord, AppError> {
        self.find_progress(user_id, roadmap_id).await?.ok_or_else(|| {
            AppError::NotFound(format!(
                "No progress recorded for user {user_id} on roadmap {roadmap_id}"
            ))
        })
    }

    /// Like `get_progress`, but absence is a normal outcome.
    pub async fn find_progress(
        &self,
        user_id: &str,
        roadmap_id: Uuid,
    ) -> Result<Option<ProgressRecord>, AppError> {
        let user_id = require_non_blank("user_id", user_id)?;
        self.progress.find(user_id, roadmap_id).await
    }

    /// One summary per saved roadmap, in saved order.
    pub async fn get_aggregate_progress(
        &self,
        user_id: &str,
    ) -> Result<Vec<ProgressSummary>, AppError> {
        let user_id = require_non_blank("user_id", user_id)?;
        let roadmaps = self.saved.list_saved(user_id).await?;
        let ids: Vec<Uuid> = roadmaps.iter().map(|r| r.id).collect();

        let records: HashMap<Uuid, ProgressRecord> = self
            .progress
            .find_many(user_id, &ids)
            .await?
            .into_iter()
            .map(|r| (r.roadmap_id, r))
            .collect();

        Ok(roadmaps
            .iter()
            .map(|roadmap| {
                let completed = records
                    .get(&roadmap.id)
                    .map(|r| r.completed_resources.as_slice())
                    .unwrap_or(&[]);
                summarize(roadmap, completed)
            })
            .collect())
    }
}

/// Counts only ids that exist in the roadmap, so stale or foreign ids never
/// inflate the percentage.
pub fn summarize(roadmap: &Roadmap, completed: &[String]) -> ProgressSummary {
    let total_count = roadmap.total_resources();
    let completed_count = completed
        .iter()
        .filter(|id| roadmap.contains_resource(id))
        .count();

    ProgressSummary {
        roadmap_id: roadmap.id,
        company_id: roadmap.company_id,
        job_profile: roadmap.job_profile.clone(),
        percentage: completion_percentage(completed_count, total_count),
        completed_count,
        total_count,
    }
}

/// `round(100 * completed / total)`, clamped to 0-100; 0 when `total` is 0.
pub fn completion_percentage(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let pct = (completed as f64 / total as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u32
}
