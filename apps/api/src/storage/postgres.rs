use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::company::CompanyProfile;
use crate::models::progress::ProgressRecord;
use crate::models::roadmap::{Roadmap, RoadmapRow};
use crate::storage::{
    CompanyDirectory, InsertOutcome, ProgressRepository, RoadmapRepository,
    SavedRoadmapRepository,
};

/// PostgreSQL-backed storage. Roadmap trees are stored as JSONB; uniqueness
/// of `(company_id, job_profile)` is enforced by `roadmaps_company_profile_key`.
#[derive(Clone)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompanyDirectory for PgStorage {
    async fn get_company(&self, company_id: Uuid) -> Result<Option<CompanyProfile>, AppError> {
        Ok(sqlx::query_as::<_, CompanyProfile>(
            r#"
            SELECT id, name, job_profile, required_skills, roles_and_responsibilities
            FROM companies
            WHERE id = $1
            "#,
        )
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?)
    }
}

#[async_trait]
impl RoadmapRepository for PgStorage {
    async fn find_by_key(
        &self,
        company_id: Uuid,
        job_profile: &str,
    ) -> Result<Option<Roadmap>, AppError> {
        let row = sqlx::query_as::<_, RoadmapRow>(
            "SELECT * FROM roadmaps WHERE company_id = $1 AND job_profile = $2",
        )
        .bind(company_id)
        .bind(job_profile)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Roadmap::from))
    }

    async fn insert_if_absent(&self, roadmap: &Roadmap) -> Result<InsertOutcome, AppError> {
        // Single statement: the skill tree lands with the row or not at all.
        let row = sqlx::query_as::<_, RoadmapRow>(
            r#"
            INSERT INTO roadmaps (id, company_id, job_profile, skills, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (company_id, job_profile) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(roadmap.id)
        .bind(roadmap.company_id)
        .bind(&roadmap.job_profile)
        .bind(Json(&roadmap.skills))
        .bind(roadmap.created_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(match row {
            Some(row) => InsertOutcome::Created(row.into()),
            None => InsertOutcome::AlreadyExists,
        })
    }

    async fn get(&self, roadmap_id: Uuid) -> Result<Option<Roadmap>, AppError> {
        let row = sqlx::query_as::<_, RoadmapRow>("SELECT * FROM roadmaps WHERE id = $1")
            .bind(roadmap_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Roadmap::from))
    }

    async fn get_many(&self, roadmap_ids: &[Uuid]) -> Result<Vec<Roadmap>, AppError> {
        if roadmap_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, RoadmapRow>("SELECT * FROM roadmaps WHERE id = ANY($1)")
            .bind(roadmap_ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Roadmap::from).collect())
    }

    async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<Roadmap>, AppError> {
        let rows = sqlx::query_as::<_, RoadmapRow>(
            "SELECT * FROM roadmaps WHERE company_id = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Roadmap::from).collect())
    }

    async fn list_all(&self) -> Result<Vec<Roadmap>, AppError> {
        let rows = sqlx::query_as::<_, RoadmapRow>(
            "SELECT * FROM roadmaps ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Roadmap::from).collect())
    }
}

#[async_trait]
impl ProgressRepository for PgStorage {
    async fn find(
        &self,
        user_id: &str,
        roadmap_id: Uuid,
    ) -> Result<Option<ProgressRecord>, AppError> {
        Ok(sqlx::query_as::<_, ProgressRecord>(
            r#"
            SELECT user_id, roadmap_id, completed_resources, last_updated
            FROM roadmap_progress
            WHERE user_id = $1 AND roadmap_id = $2
            "#,
        )
        .bind(user_id)
        .bind(roadmap_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn find_many(
        &self,
        user_id: &str,
        roadmap_ids: &[Uuid],
    ) -> Result<Vec<ProgressRecord>, AppError> {
        if roadmap_ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(sqlx::query_as::<_, ProgressRecord>(
            r#"
            SELECT user_id, roadmap_id, completed_resources, last_updated
            FROM roadmap_progress
            WHERE user_id = $1 AND roadmap_id = ANY($2)
            "#,
        )
        .bind(user_id)
        .bind(roadmap_ids)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn add_completed(
        &self,
        user_id: &str,
        roadmap_id: Uuid,
        resource_id: &str,
    ) -> Result<ProgressRecord, AppError> {
        // Upsert keeps set semantics inside one statement; concurrent toggles
        // of the same id resolve last-writer-wins.
        Ok(sqlx::query_as::<_, ProgressRecord>(
            r#"
            INSERT INTO roadmap_progress (user_id, roadmap_id, completed_resources, last_updated)
            VALUES ($1, $2, ARRAY[$3::TEXT], now())
            ON CONFLICT (user_id, roadmap_id) DO UPDATE SET
                completed_resources = CASE
                    WHEN $3::TEXT = ANY(roadmap_progress.completed_resources)
                        THEN roadmap_progress.completed_resources
                    ELSE array_append(roadmap_progress.completed_resources, $3::TEXT)
                END,
                last_updated = now()
            RETURNING user_id, roadmap_id, completed_resources, last_updated
            "#,
        )
        .bind(user_id)
        .bind(roadmap_id)
        .bind(resource_id)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn remove_completed(
        &self,
        user_id: &str,
        roadmap_id: Uuid,
        resource_id: &str,
    ) -> Result<ProgressRecord, AppError> {
        Ok(sqlx::query_as::<_, ProgressRecord>(
            r#"
            INSERT INTO roadmap_progress (user_id, roadmap_id, completed_resources, last_updated)
            VALUES ($1, $2, '{}', now())
            ON CONFLICT (user_id, roadmap_id) DO UPDATE SET
                completed_resources = array_remove(roadmap_progress.completed_resources, $3::TEXT),
                last_updated = now()
            RETURNING user_id, roadmap_id, completed_resources, last_updated
            "#,
        )
        .bind(user_id)
        .bind(roadmap_id)
        .bind(resource_id)
        .fetch_one(&self.pool)
        .await?)
    }
}

#[async_trait]
impl SavedRoadmapRepository for PgStorage {
    async fn save(&self, user_id: &str, roadmap_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO saved_roadmaps (user_id, roadmap_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, roadmap_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(roadmap_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn unsave(&self, user_id: &str, roadmap_id: Uuid) -> Result<bool, AppError> {
        let result =
            sqlx::query("DELETE FROM saved_roadmaps WHERE user_id = $1 AND roadmap_id = $2")
                .bind(user_id)
                .bind(roadmap_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn is_saved(&self, user_id: &str, roadmap_id: Uuid) -> Result<bool, AppError> {
        Ok(sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM saved_roadmaps WHERE user_id = $1 AND roadmap_id = $2)",
        )
        .bind(user_id)
        .bind(roadmap_id)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn list_ids(&self, user_id: &str) -> Result<Vec<Uuid>, AppError> {
        Ok(sqlx::query_scalar::<_, Uuid>(
            "SELECT roadmap_id FROM saved_roadmaps WHERE user_id = $1 ORDER BY position ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }
}
