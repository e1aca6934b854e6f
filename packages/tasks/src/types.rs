// ABOUTME: Task type definitions
// ABOUTME: Structures for tasks, their review workflow state, and filters

use cadence_core::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    ToDo,
    InProgress,
    Review,
    Done,
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::ToDo
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TaskStatus::ToDo => "to-do",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Review => "review",
            TaskStatus::Done => "done",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Medium
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: EntityId,
    pub title: String,
    pub description: Option<String>,
    pub project_id: EntityId,
    pub sprint_id: Option<EntityId>,
    pub assignee_id: Option<EntityId>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
    pub story_points: i64,
    pub estimated_hours: Option<f64>,
    pub time_spent_hours: Option<f64>,

    // Attachment references only; the files live in an external store
    pub requirement_attachments: Vec<String>,
    pub completion_attachments: Vec<String>,
    pub review_notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskCreateInput {
    pub title: String,
    pub description: Option<String>,
    pub project_id: EntityId,
    pub sprint_id: Option<EntityId>,
    pub assignee_id: Option<EntityId>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DateTime<Utc>>,
    pub story_points: Option<i64>,
    pub estimated_hours: Option<f64>,
    pub requirement_attachments: Option<Vec<String>>,
}

/// Field updates for a task. Status never moves through here; transitions go
/// through the lifecycle operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskUpdateInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub sprint_id: Option<EntityId>,
    pub assignee_id: Option<EntityId>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DateTime<Utc>>,
    pub story_points: Option<i64>,
    pub estimated_hours: Option<f64>,
    pub time_spent_hours: Option<f64>,
    pub requirement_attachments: Option<Vec<String>>,
}

/// Filter for lead-scoped task listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assignee_id: Option<EntityId>,
    pub project_id: Option<EntityId>,
    pub sprint_id: Option<EntityId>,
}
