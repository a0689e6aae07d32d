use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Video,
    Article,
    Documentation,
    Project,
    Course,
}

/// One learning asset. `id` is derived from the owning skill name and the
/// resource's position, so regenerating a skill yields the same ids.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resource {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub url: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Skill {
    pub name: String,
    pub description: String,
    pub resources: Vec<Resource>,
}

/// A company- and job-profile-specific curriculum. At most one exists per
/// `(company_id, job_profile)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Roadmap {
    pub id: Uuid,
    pub company_id: Uuid,
    pub job_profile: String,
    pub skills: Vec<Skill>,
    pub created_at: DateTime<Utc>,
}

impl Roadmap {
    /// Sum of resource counts across all skills.
    pub fn total_resources(&self) -> usize {
        self.skills.iter().map(|s| s.resources.len()).sum()
    }

    pub fn contains_resource(&self, resource_id: &str) -> bool {
        self.skills
            .iter()
            .flat_map(|s| s.resources.iter())
            .any(|r| r.id == resource_id)
    }
}

/// Storage shape: the skill/resource tree lives in a single JSONB column.
#[derive(Debug, Clone, FromRow)]
pub struct RoadmapRow {
    pub id: Uuid,
    pub company_id: Uuid,
    pub job_profile: String,
    pub skills: Json<Vec<Skill>>,
    pub created_at: DateTime<Utc>,
}

impl From<RoadmapRow> for Roadmap {
    fn from(row: RoadmapRow) -> Self {
        Roadmap {
            id: row.id,
            company_id: row.company_id,
            job_profile: row.job_profile,
            skills: row.skills.0,
            created_at: row.created_at,
        }
    }
}
