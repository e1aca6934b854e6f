// ABOUTME: Sprint type definitions
// ABOUTME: Each sprint carries a persisted summary of its task graph

use cadence_core::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum SprintStatus {
    Upcoming,
    Active,
    Completed,
    Cancelled,
}

impl Default for SprintStatus {
    fn default() -> Self {
        SprintStatus::Upcoming
    }
}

/// Denormalized task summary. Recomputed inside the same transaction as any
/// task write that touches the sprint, so it is always in step with the
/// tasks table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SprintStats {
    pub total_tasks: i64,
    pub tasks_completed: i64,
    pub estimated_hours: f64,
    pub time_spent_hours: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sprint {
    pub id: EntityId,
    pub name: String,
    pub project_id: EntityId,
    pub status: SprintStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub stats: SprintStats,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SprintCreateInput {
    pub name: String,
    pub project_id: EntityId,
    pub status: Option<SprintStatus>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SprintUpdateInput {
    pub name: Option<String>,
    pub status: Option<SprintStatus>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Filter for lead-scoped sprint listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SprintFilter {
    pub status: Option<SprintStatus>,
    pub project_id: Option<EntityId>,
}
