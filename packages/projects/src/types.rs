// ABOUTME: Project type definitions
// ABOUTME: Projects may belong to a team, a lead, both, or neither

use cadence_core::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    NotStarted,
    InProgress,
    Completed,
    OnHold,
}

impl Default for ProjectStatus {
    fn default() -> Self {
        ProjectStatus::NotStarted
    }
}

/// A project. `progress` is an explicit 0-100 override; when NULL the
/// percentage is derived from the project's tasks at read time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub team_id: Option<EntityId>,
    pub lead_id: Option<EntityId>,
    pub status: ProjectStatus,
    pub progress: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectCreateInput {
    pub name: String,
    pub description: Option<String>,
    pub team_id: Option<EntityId>,
    pub lead_id: Option<EntityId>,
    pub status: Option<ProjectStatus>,
    pub progress: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectUpdateInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub lead_id: Option<EntityId>,
    pub status: Option<ProjectStatus>,
    pub progress: Option<i64>,
}

/// Filter for lead-scoped project listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectFilter {
    pub status: Option<ProjectStatus>,
}
