use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Per-user, per-roadmap completion state. `completed_resources` behaves as a
/// set: no duplicates, first-completion order.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct ProgressRecord {
    pub user_id: String,
    pub roadmap_id: Uuid,
    pub completed_resources: Vec<String>,
    pub last_updated: DateTime<Utc>,
}
