use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::company::CompanyProfile;
use crate::models::progress::ProgressRecord;
use crate::models::roadmap::Roadmap;
use crate::storage::{
    CompanyDirectory, InsertOutcome, ProgressRepository, RoadmapRepository,
    SavedRoadmapRepository,
};

/// Process-local storage with the same semantics as `PgStorage`. Each write
/// takes the relevant write lock, which also serializes conflicting inserts.
#[derive(Default)]
pub struct MemoryStorage {
    companies: RwLock<HashMap<Uuid, CompanyProfile>>,
    // Insertion order doubles as creation order.
    roadmaps: RwLock<Vec<Roadmap>>,
    progress: RwLock<HashMap<(String, Uuid), ProgressRecord>>,
    saved: RwLock<HashMap<String, Vec<Uuid>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_companies(companies: Vec<CompanyProfile>) -> Self {
        Self {
            companies: RwLock::new(companies.into_iter().map(|c| (c.id, c)).collect()),
            ..Self::default()
        }
    }

    /// Loads a JSON array of companies, e.g. exported from the portal's CRUD layer.
    pub fn from_seed_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read company seed file {}", path.display()))?;
        let companies: Vec<CompanyProfile> = serde_json::from_str(&raw)
            .with_context(|| format!("Company seed file {} is not valid JSON", path.display()))?;
        Ok(Self::with_companies(companies))
    }

    pub async fn company_count(&self) -> usize {
        self.companies.read().await.len()
    }
}

#[async_trait]
impl CompanyDirectory for MemoryStorage {
    async fn get_company(&self, company_id: Uuid) -> Result<Option<CompanyProfile>, AppError> {
        Ok(self.companies.read().await.get(&company_id).cloned())
    }
}

#[async_trait]
impl RoadmapRepository for MemoryStorage {
    async fn find_by_key(
        &self,
        company_id: Uuid,
        job_profile: &str,
    ) -> Result<Option<Roadmap>, AppError> {
        Ok(self
            .roadmaps
            .read()
            .await
            .iter()
            .find(|r| r.company_id == company_id && r.job_profile == job_profile)
            .cloned())
    }

    async fn insert_if_absent(&self, roadmap: &Roadmap) -> Result<InsertOutcome, AppError> {
        let mut roadmaps = self.roadmaps.write().await;
        let taken = roadmaps
            .iter()
            .any(|r| r.company_id == roadmap.company_id && r.job_profile == roadmap.job_profile);
        if taken {
            return Ok(InsertOutcome::AlreadyExists);
        }
        if roadmaps.iter().any(|r| r.id == roadmap.id) {
            return Err(AppError::Storage(format!(
                "Roadmap id {} already in use",
                roadmap.id
            )));
        }
        roadmaps.push(roadmap.clone());
        Ok(InsertOutcome::Created(roadmap.clone()))
    }

    async fn get(&self, roadmap_id: Uuid) -> Result<Option<Roadmap>, AppError> {
        Ok(self
            .roadmaps
            .read()
            .await
            .iter()
            .find(|r| r.id == roadmap_id)
            .cloned())
    }

    async fn get_many(&self, roadmap_ids: &[Uuid]) -> Result<Vec<Roadmap>, AppError> {
        Ok(self
            .roadmaps
            .read()
            .await
            .iter()
            .filter(|r| roadmap_ids.contains(&r.id))
            .cloned()
            .collect())
    }

    async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<Roadmap>, AppError> {
        Ok(self
            .roadmaps
            .read()
            .await
            .iter()
            .filter(|r| r.company_id == company_id)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Roadmap>, AppError> {
        Ok(self.roadmaps.read().await.to_vec())
    }
}

#[async_trait]
impl ProgressRepository for MemoryStorage {
    async fn find(
        &self,
        user_id: &str,
        roadmap_id: Uuid,
    ) -> Result<Option<ProgressRecord>, AppError> {
        Ok(self
            .progress
            .read()
            .await
            .get(&(user_id.to_string(), roadmap_id))
            .cloned())
    }

    async fn find_many(
        &self,
        user_id: &str,
        roadmap_ids: &[Uuid],
    ) -> Result<Vec<ProgressRecord>, AppError> {
        let progress = self.progress.read().await;
        Ok(roadmap_ids
            .iter()
            .filter_map(|id| progress.get(&(user_id.to_string(), *id)).cloned())
            .collect())
    }

    async fn add_completed(
        &self,
        user_id: &str,
        roadmap_id: Uuid,
        resource_id: &str,
    ) -> Result<ProgressRecord, AppError> {
        let mut progress = self.progress.write().await;
        let record = progress
            .entry((user_id.to_string(), roadmap_id))
            .or_insert_with(|| empty_record(user_id, roadmap_id));
        if !record.completed_resources.iter().any(|id| id == resource_id) {
            record.completed_resources.push(resource_id.to_string());
        }
        record.last_updated = Utc::now();
        Ok(record.clone())
    }

    async fn remove_completed(
        &self,
        user_id: &str,
        roadmap_id: Uuid,
        resource_id: &str,
    ) -> Result<ProgressRecord, AppError> {
        let mut progress = self.progress.write().await;
        let record = progress
            .entry((user_id.to_string(), roadmap_id))
            .or_insert_with(|| empty_record(user_id, roadmap_id));
        record.completed_resources.retain(|id| id != resource_id);
        record.last_updated = Utc::now();
        Ok(record.clone())
    }
}

fn empty_record(user_id: &str, roadmap_id: Uuid) -> ProgressRecord {
    ProgressRecord {
        user_id: user_id.to_string(),
        roadmap_id,
        completed_resources: Vec::new(),
        last_updated: Utc::now(),
    }
}

#[async_trait]
impl SavedRoadmapRepository for MemoryStorage {
    async fn save(&self, user_id: &str, roadmap_id: Uuid) -> Result<bool, AppError> {
        let mut saved = self.saved.write().await;
        let ids = saved.entry(user_id.to_string()).or_default();
        if ids.contains(&roadmap_id) {
            return Ok(false);
        }
        ids.push(roadmap_id);
        Ok(true)
    }

    async fn unsave(&self, user_id: &str, roadmap_id: Uuid) -> Result<bool, AppError> {
        let mut saved = self.saved.write().await;
        let Some(ids) = saved.get_mut(user_id) else {
            return Ok(false);
        };
        let before = ids.len();
        ids.retain(|id| *id != roadmap_id);
        Ok(ids.len() != before)
    }

    async fn is_saved(&self, user_id: &str, roadmap_id: Uuid) -> Result<bool, AppError> {
        Ok(self
            .saved
            .read()
            .await
            .get(user_id)
            .is_some_and(|ids| ids.contains(&roadmap_id)))
    }

    async fn list_ids(&self, user_id: &str) -> Result<Vec<Uuid>, AppError> {
        Ok(self
            .saved
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roadmap(company_id: Uuid, job_profile: &str) -> Roadmap {
        Roadmap {
            id: Uuid::new_v4(),
            company_id,
            job_profile: job_profile.to_string(),
            skills: vec![],
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_if_absent_rejects_same_key() {
        let storage = MemoryStorage::new();
        let company_id = Uuid::new_v4();

        let first = storage
            .insert_if_absent(&roadmap(company_id, "SDE"))
            .await
            .unwrap();
        assert!(matches!(first, InsertOutcome::Created(_)));

        let second = storage
            .insert_if_absent(&roadmap(company_id, "SDE"))
            .await
            .unwrap();
        assert!(matches!(second, InsertOutcome::AlreadyExists));

        let other_profile = storage
            .insert_if_absent(&roadmap(company_id, "Data Analyst"))
            .await
            .unwrap();
        assert!(matches!(other_profile, InsertOutcome::Created(_)));
    }

    #[tokio::test]
    async fn test_listings_are_oldest_first() {
        let storage = MemoryStorage::new();
        let company_id = Uuid::new_v4();
        let first = roadmap(company_id, "SDE");
        let second = roadmap(Uuid::new_v4(), "SDE");
        let third = roadmap(company_id, "Data Analyst");
        for r in [&first, &second, &third] {
            storage.insert_if_absent(r).await.unwrap();
        }

        let all: Vec<Uuid> = storage.list_all().await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(all, vec![first.id, second.id, third.id]);

        let by_company: Vec<Uuid> = storage
            .list_by_company(company_id)
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(by_company, vec![first.id, third.id]);
    }

    #[tokio::test]
    async fn test_remove_on_missing_record_creates_empty_record() {
        let storage = MemoryStorage::new();
        let roadmap_id = Uuid::new_v4();
        let record = storage
            .remove_completed("u1", roadmap_id, "react-0")
            .await
            .unwrap();
        assert!(record.completed_resources.is_empty());
        assert!(storage.find("u1", roadmap_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_saved_ids_keep_insertion_order() {
        let storage = MemoryStorage::new();
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        for id in [b, a, c] {
            assert!(storage.save("u1", id).await.unwrap());
        }
        assert!(!storage.save("u1", a).await.unwrap());
        assert_eq!(storage.list_ids("u1").await.unwrap(), vec![b, a, c]);

        assert!(storage.unsave("u1", a).await.unwrap());
        assert!(!storage.unsave("u1", a).await.unwrap());
        assert_eq!(storage.list_ids("u1").await.unwrap(), vec![b, c]);
    }

    #[tokio::test]
    async fn test_seed_file_round_trip() {
        let path = std::env::temp_dir().join(format!("companies-{}.json", Uuid::new_v4()));
        std::fs::write(
            &path,
            r#"[{"id": "6f1c1c1e-8a2b-4c1e-9a7e-2f0a4b1c9d10", "name": "Acme", "job_profile": "SDE"}]"#,
        )
        .unwrap();
        let storage = MemoryStorage::from_seed_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(storage.company_count().await, 1);
    }
}
