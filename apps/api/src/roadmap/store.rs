//! Roadmap Store: idempotent get-or-create plus read access for roadmaps.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::{require_non_blank, AppError};
use crate::models::company::CompanyProfile;
use crate::models::roadmap::Roadmap;
use crate::roadmap::catalog::ResourceCatalog;
use crate::roadmap::inference::SkillInferenceEngine;
use crate::storage::{CompanyDirectory, InsertOutcome, RoadmapRepository};

/// Conditional inserts attempted before giving up. A lost race is resolved by
/// re-reading the winner, so more than one attempt only happens if the winning
/// row cannot be read back.
const MAX_CREATE_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct RoadmapStore {
    roadmaps: Arc<dyn RoadmapRepository>,
    companies: Arc<dyn CompanyDirectory>,
    inference: SkillInferenceEngine,
    catalog: ResourceCatalog,
}

impl RoadmapStore {
    pub fn new(
        roadmaps: Arc<dyn RoadmapRepository>,
        companies: Arc<dyn CompanyDirectory>,
        inference: SkillInferenceEngine,
        catalog: ResourceCatalog,
    ) -> Self {
        Self {
            roadmaps,
            companies,
            inference,
            catalog,
        }
    }

    pub fn inference(&self) -> &SkillInferenceEngine {
        &self.inference
    }

    /// Returns the roadmap for `(company_id, job_profile)`, creating it on first use.
    ///
    /// Concurrent callers for the same key all receive the same roadmap: the
    /// insert is conditional on the key, and the loser re-reads the winner.
    pub async fn get_or_create(
        &self,
        company_id: Uuid,
        job_profile: &str,
    ) -> Result<Roadmap, AppError> {
        let job_profile = require_non_blank("job_profile", job_profile)?;

        if let Some(existing) = self.roadmaps.find_by_key(company_id, job_profile).await? {
            debug!("Roadmap {} already exists for company {company_id}", existing.id);
            return Ok(existing);
        }

        let company = self
            .companies
            .get_company(company_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Company {company_id} not found")))?;

        for attempt in 1..=MAX_CREATE_ATTEMPTS {
            let candidate = self.assemble(&company, job_profile);

            match self.roadmaps.insert_if_absent(&candidate).await? {
                InsertOutcome::Created(roadmap) => {
                    info!(
                        "Created roadmap {} for company {company_id} ({job_profile}) with {} skills",
                        roadmap.id,
                        roadmap.skills.len()
                    );
                    return Ok(roadmap);
                }
                InsertOutcome::AlreadyExists => {
                    if let Some(winner) = self.roadmaps.find_by_key(company_id, job_profile).await? {
                        info!(
                            "Concurrent generation for company {company_id} ({job_profile}); using roadmap {}",
                            winner.id
                        );
                        return Ok(winner);
                    }
                    warn!(
                        "Roadmap key for company {company_id} ({job_profile}) reported taken but unreadable (attempt {attempt})"
                    );
                }
            }
        }

        Err(AppError::Internal(anyhow::anyhow!(
            "Could not create or read roadmap for company {company_id} ({job_profile}) after {MAX_CREATE_ATTEMPTS} attempts"
        )))
    }

    /// Ordered skill names for a company: role-derived skills, then any
    /// `required_skills` not already present, then the job-profile fallback if
    /// both were empty.
    pub fn plan_skills(&self, company: &CompanyProfile, job_profile: &str) -> Vec<String> {
        let mut skills = self.inference.detect(&company.roles_and_responsibilities);

        for required in &company.required_skills {
            let required = required.trim();
            if required.is_empty() {
                continue;
            }
            let key = required.to_lowercase();
            if !skills.iter().any(|s| s.to_lowercase() == key) {
                skills.push(required.to_string());
            }
        }

        if skills.is_empty() {
            skills = self.inference.fallback(job_profile);
        }
        skills
    }

    /// Builds a complete, unsaved roadmap. Pure apart from the fresh id and timestamp.
    pub fn assemble(&self, company: &CompanyProfile, job_profile: &str) -> Roadmap {
        let skills = self
            .plan_skills(company, job_profile)
            .iter()
            .map(|name| {
                self.catalog
                    .build_skill(name, job_profile, &company.roles_and_responsibilities)
            })
            .collect();

        Roadmap {
            id: Uuid::new_v4(),
            company_id: company.id,
            job_profile: job_profile.to_string(),
            skills,
            created_at: Utc::now(),
        }
    }

    pub async fn get_by_id(&self, roadmap_id: Uuid) -> Result<Roadmap, AppError> {
        self.roadmaps
            .get(roadmap_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Roadmap {roadmap_id} not found")))
    }

    pub async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<Roadmap>, AppError> {
        self.roadmaps.list_by_company(company_id).await
    }

    pub async fn list_all(&self) -> Result<Vec<Roadmap>, AppError> {
        self.roadmaps.list_all().await
    }
}
