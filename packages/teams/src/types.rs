// ABOUTME: Team type definitions
// ABOUTME: Teams carry an optional lead and an org-chart parent pointer

use cadence_core::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A team. Its member set is derived from `users.team_id`, never stored here.
/// `parent_team_id` is org-chart display only and carries no authority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub lead_id: Option<EntityId>,
    pub parent_team_id: Option<EntityId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamCreateInput {
    pub name: String,
    pub description: Option<String>,
    pub lead_id: Option<EntityId>,
    pub parent_team_id: Option<EntityId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamUpdateInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub lead_id: Option<EntityId>,
    pub parent_team_id: Option<EntityId>,
}
