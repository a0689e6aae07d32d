//! Persistence seams. Services depend on these traits only; `postgres` and
//! `memory` provide the two backends.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::company::CompanyProfile;
use crate::models::progress::ProgressRecord;
use crate::models::roadmap::Roadmap;

use self::memory::MemoryStorage;
use self::postgres::PgStorage;

/// Read access to company records owned by the portal's CRUD layer.
#[async_trait]
pub trait CompanyDirectory: Send + Sync {
    async fn get_company(&self, company_id: Uuid) -> Result<Option<CompanyProfile>, AppError>;
}

/// Result of a conditional roadmap insert.
#[derive(Debug)]
pub enum InsertOutcome {
    Created(Roadmap),
    /// Another writer already holds `(company_id, job_profile)`.
    AlreadyExists,
}

#[async_trait]
pub trait RoadmapRepository: Send + Sync {
    async fn find_by_key(
        &self,
        company_id: Uuid,
        job_profile: &str,
    ) -> Result<Option<Roadmap>, AppError>;

    /// Inserts the whole roadmap tree in one write, unless the key is taken.
    async fn insert_if_absent(&self, roadmap: &Roadmap) -> Result<InsertOutcome, AppError>;

    async fn get(&self, roadmap_id: Uuid) -> Result<Option<Roadmap>, AppError>;

    /// Unordered; missing ids are skipped.
    async fn get_many(&self, roadmap_ids: &[Uuid]) -> Result<Vec<Roadmap>, AppError>;

    /// Oldest first, like `list_all`.
    async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<Roadmap>, AppError>;

    /// Oldest first by creation time.
    async fn list_all(&self) -> Result<Vec<Roadmap>, AppError>;
}

#[async_trait]
pub trait ProgressRepository: Send + Sync {
    async fn find(
        &self,
        user_id: &str,
        roadmap_id: Uuid,
    ) -> Result<Option<ProgressRecord>, AppError>;

    async fn find_many(
        &self,
        user_id: &str,
        roadmap_ids: &[Uuid],
    ) -> Result<Vec<ProgressRecord>, AppError>;

    /// Find-or-create, then add `resource_id` to the completed set.
    async fn add_completed(
        &self,
        user_id: &str,
        roadmap_id: Uuid,
        resource_id: &str,
    ) -> Result<ProgressRecord, AppError>;

    /// Find-or-create, then remove `resource_id` from the completed set.
    async fn remove_completed(
        &self,
        user_id: &str,
        roadmap_id: Uuid,
        resource_id: &str,
    ) -> Result<ProgressRecord, AppError>;
}

#[async_trait]
pub trait SavedRoadmapRepository: Send + Sync {
    /// Returns `true` if the roadmap was newly added.
    async fn save(&self, user_id: &str, roadmap_id: Uuid) -> Result<bool, AppError>;

    /// Returns `true` if the roadmap was present and removed.
    async fn unsave(&self, user_id: &str, roadmap_id: Uuid) -> Result<bool, AppError>;

    async fn is_saved(&self, user_id: &str, roadmap_id: Uuid) -> Result<bool, AppError>;

    /// Saved roadmap ids in insertion order.
    async fn list_ids(&self, user_id: &str) -> Result<Vec<Uuid>, AppError>;
}

/// The full set of repositories a running service needs.
#[derive(Clone)]
pub struct Storage {
    pub companies: Arc<dyn CompanyDirectory>,
    pub roadmaps: Arc<dyn RoadmapRepository>,
    pub progress: Arc<dyn ProgressRepository>,
    pub saved: Arc<dyn SavedRoadmapRepository>,
}

impl Storage {
    pub fn postgres(pool: PgPool) -> Self {
        let pg = Arc::new(PgStorage::new(pool));
        Storage {
            companies: pg.clone(),
            roadmaps: pg.clone(),
            progress: pg.clone(),
            saved: pg,
        }
    }

    pub fn memory(memory: Arc<MemoryStorage>) -> Self {
        Storage {
            companies: memory.clone(),
            roadmaps: memory.clone(),
            progress: memory.clone(),
            saved: memory,
        }
    }
}
