//! Saved Roadmap Registry: per-user bookmark membership.
//!
//! `save` / `unsave` are the idempotent primitives; `toggle_save` is a thin
//! wrapper kept for clients that only know "flip it".

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::{require_non_blank, AppError};
use crate::models::roadmap::Roadmap;
use crate::storage::{RoadmapRepository, SavedRoadmapRepository};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveState {
    pub is_saved: bool,
}

#[derive(Clone)]
pub struct SavedRoadmapRegistry {
    saved: Arc<dyn SavedRoadmapRepository>,
    roadmaps: Arc<dyn RoadmapRepository>,
}

impl SavedRoadmapRegistry {
    pub fn new(
        saved: Arc<dyn SavedRoadmapRepository>,
        roadmaps: Arc<dyn RoadmapRepository>,
    ) -> Self {
        Self { saved, roadmaps }
    }

    async fn ensure_roadmap(&self, roadmap_id: Uuid) -> Result<(), AppError> {
        if self.roadmaps.get(roadmap_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Roadmap {roadmap_id} not found")));
        }
        Ok(())
    }

    pub async fn save(&self, user_id: &str, roadmap_id: Uuid) -> Result<SaveState, AppError> {
        let user_id = require_non_blank("user_id", user_id)?;
        self.ensure_roadmap(roadmap_id).await?;
        if self.saved.save(user_id, roadmap_id).await? {
            info!("User {user_id} saved roadmap {roadmap_id}");
        }
        Ok(SaveState { is_saved: true })
    }

    /// Unknown roadmaps are not an error here: there is nothing to remove.
    pub async fn unsave(&self, user_id: &str, roadmap_id: Uuid) -> Result<SaveState, AppError> {
        let user_id = require_non_blank("user_id", user_id)?;
        if self.saved.unsave(user_id, roadmap_id).await? {
            info!("User {user_id} unsaved roadmap {roadmap_id}");
        }
        Ok(SaveState { is_saved: false })
    }

    /// Flips membership and reports the new state.
    pub async fn toggle_save(
        &self,
        user_id: &str,
        roadmap_id: Uuid,
    ) -> Result<SaveState, AppError> {
        let user_id = require_non_blank("user_id", user_id)?;
        if self.saved.is_saved(user_id, roadmap_id).await? {
            self.unsave(user_id, roadmap_id).await
        } else {
            self.save(user_id, roadmap_id).await
        }
    }

    pub async fn is_saved(&self, user_id: &str, roadmap_id: Uuid) -> Result<bool, AppError> {
        let user_id = require_non_blank("user_id", user_id)?;
        self.saved.is_saved(user_id, roadmap_id).await
    }

    /// Saved roadmaps in the order they were saved. Ids that no longer resolve are skipped.
    pub async fn list_saved(&self, user_id: &str) -> Result<Vec<Roadmap>, AppError> {
        let user_id = require_non_blank("user_id", user_id)?;
        let ids = self.saved.list_ids(user_id).await?;
        let mut by_id: HashMap<Uuid, Roadmap> = self
            .roadmaps
            .get_many(&ids)
            .await?
            .into_iter()
            .map(|r| (r.id, r))
            .collect();
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStorage;
    use chrono::Utc;

    async fn registry_with_roadmaps(count: usize) -> (SavedRoadmapRegistry, Vec<Uuid>) {
        let memory = Arc::new(MemoryStorage::new());
        let company_id = Uuid::new_v4();
        let mut ids = Vec::new();
        for i in 0..count {
            let roadmap = Roadmap {
                id: Uuid::new_v4(),
                company_id,
                job_profile: format!("Profile {i}"),
                skills: vec![],
                created_at: Utc::now(),
            };
            ids.push(roadmap.id);
            memory.insert_if_absent(&roadmap).await.unwrap();
        }
        (SavedRoadmapRegistry::new(memory.clone(), memory), ids)
    }

    #[tokio::test]
    async fn test_toggle_alternates() {
        let (registry, ids) = registry_with_roadmaps(1).await;
        let expected = [true, false, true, false];
        for is_saved in expected {
            let state = registry.toggle_save("u1", ids[0]).await.unwrap();
            assert_eq!(state, SaveState { is_saved });
        }
    }

    #[tokio::test]
    async fn test_save_and_unsave_are_idempotent() {
        let (registry, ids) = registry_with_roadmaps(1).await;
        assert!(registry.save("u1", ids[0]).await.unwrap().is_saved);
        assert!(registry.save("u1", ids[0]).await.unwrap().is_saved);
        assert_eq!(registry.list_saved("u1").await.unwrap().len(), 1);

        assert!(!registry.unsave("u1", ids[0]).await.unwrap().is_saved);
        assert!(!registry.unsave("u1", ids[0]).await.unwrap().is_saved);
        assert!(registry.list_saved("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_saved_preserves_insertion_order() {
        let (registry, ids) = registry_with_roadmaps(3).await;
        for id in [ids[2], ids[0], ids[1]] {
            registry.save("u1", id).await.unwrap();
        }
        let listed: Vec<Uuid> = registry
            .list_saved("u1")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(listed, vec![ids[2], ids[0], ids[1]]);
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let (registry, ids) = registry_with_roadmaps(1).await;
        registry.save("u1", ids[0]).await.unwrap();
        assert!(registry.is_saved("u1", ids[0]).await.unwrap());
        assert!(!registry.is_saved("u2", ids[0]).await.unwrap());
    }

    #[tokio::test]
    async fn test_save_unknown_roadmap_is_not_found() {
        let (registry, _) = registry_with_roadmaps(0).await;
        let err = registry.save("u1", Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_blank_user_is_rejected() {
        let (registry, ids) = registry_with_roadmaps(1).await;
        let err = registry.toggle_save(" ", ids[0]).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
