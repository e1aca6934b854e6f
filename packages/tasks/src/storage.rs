// ABOUTME: Task storage layer using SQLite
// ABOUTME: Row reads on the pool; writes take a caller-supplied executor

use sqlx::{Executor, Row, Sqlite, SqlitePool};
use tracing::debug;

use cadence_core::EntityId;
use cadence_storage::StorageError;

use crate::types::{Task, TaskFilter};

pub struct TaskStorage {
    pool: SqlitePool,
}

impl TaskStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a full task row. Runs on whatever executor the caller supplies
    /// so the lifecycle engine can pair it with a sprint stats recompute.
    pub async fn insert<'a, E>(&self, executor: E, task: &Task) -> Result<(), StorageError>
    where
        E: Executor<'a, Database = Sqlite>,
    {
        debug!("Inserting task: {} ({})", task.id, task.title);

        sqlx::query(
            r#"
            INSERT INTO tasks (
                id, title, description, project_id, sprint_id, assignee_id,
                status, priority, due_date, story_points, estimated_hours,
                time_spent_hours, requirement_attachments, completion_attachments,
                review_notes, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.project_id)
        .bind(&task.sprint_id)
        .bind(&task.assignee_id)
        .bind(&task.status)
        .bind(&task.priority)
        .bind(task.due_date)
        .bind(task.story_points)
        .bind(task.estimated_hours)
        .bind(task.time_spent_hours)
        .bind(serde_json::to_string(&task.requirement_attachments).map_err(StorageError::Json)?)
        .bind(serde_json::to_string(&task.completion_attachments).map_err(StorageError::Json)?)
        .bind(&task.review_notes)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(executor)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(())
    }

    /// Write back every mutable column of a task row.
    pub async fn save<'a, E>(&self, executor: E, task: &Task) -> Result<(), StorageError>
    where
        E: Executor<'a, Database = Sqlite>,
    {
        debug!("Saving task: {}", task.id);

        sqlx::query(
            r#"
            UPDATE tasks
            SET title = ?, description = ?, sprint_id = ?, assignee_id = ?,
                status = ?, priority = ?, due_date = ?, story_points = ?,
                estimated_hours = ?, time_spent_hours = ?,
                requirement_attachments = ?, completion_attachments = ?,
                review_notes = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.sprint_id)
        .bind(&task.assignee_id)
        .bind(&task.status)
        .bind(&task.priority)
        .bind(task.due_date)
        .bind(task.story_points)
        .bind(task.estimated_hours)
        .bind(task.time_spent_hours)
        .bind(serde_json::to_string(&task.requirement_attachments).map_err(StorageError::Json)?)
        .bind(serde_json::to_string(&task.completion_attachments).map_err(StorageError::Json)?)
        .bind(&task.review_notes)
        .bind(task.updated_at)
        .bind(&task.id)
        .execute(executor)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(())
    }

    pub async fn delete<'a, E>(
        &self,
        executor: E,
        task_id: &EntityId,
    ) -> Result<bool, StorageError>
    where
        E: Executor<'a, Database = Sqlite>,
    {
        debug!("Deleting task: {}", task_id);

        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(task_id)
            .execute(executor)
            .await
            .map_err(StorageError::Sqlx)?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn get_task(&self, task_id: &EntityId) -> Result<Option<Task>, StorageError> {
        debug!("Fetching task: {}", task_id);

        let row = sqlx::query("SELECT * FROM tasks WHERE id = ?")
            .bind(task_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        row.map(|r| self.row_to_task(&r)).transpose()
    }

    /// Tasks under any of the given projects. The scope resolver feeds this
    /// its authorized project set.
    pub async fn list_in_projects(
        &self,
        project_ids: &[EntityId],
        filter: &TaskFilter,
    ) -> Result<Vec<Task>, StorageError> {
        if project_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; project_ids.len()].join(", ");
        let mut query = format!("SELECT * FROM tasks WHERE project_id IN ({})", placeholders);
        if filter.status.is_some() {
            query.push_str(" AND status = ?");
        }
        if filter.priority.is_some() {
            query.push_str(" AND priority = ?");
        }
        if filter.assignee_id.is_some() {
            query.push_str(" AND assignee_id = ?");
        }
        if filter.project_id.is_some() {
            query.push_str(" AND project_id = ?");
        }
        if filter.sprint_id.is_some() {
            query.push_str(" AND sprint_id = ?");
        }
        query.push_str(" ORDER BY created_at");

        let mut q = sqlx::query(&query);
        for project_id in project_ids {
            q = q.bind(project_id);
        }
        if let Some(status) = &filter.status {
            q = q.bind(status);
        }
        if let Some(priority) = &filter.priority {
            q = q.bind(priority);
        }
        if let Some(assignee_id) = &filter.assignee_id {
            q = q.bind(assignee_id);
        }
        if let Some(project_id) = &filter.project_id {
            q = q.bind(project_id);
        }
        if let Some(sprint_id) = &filter.sprint_id {
            q = q.bind(sprint_id);
        }

        let rows = q.fetch_all(&self.pool).await.map_err(StorageError::Sqlx)?;

        rows.iter().map(|r| self.row_to_task(r)).collect()
    }

    /// The sprint board view: all tasks attached to a sprint.
    pub async fn list_for_sprint(&self, sprint_id: &EntityId) -> Result<Vec<Task>, StorageError> {
        let rows = sqlx::query("SELECT * FROM tasks WHERE sprint_id = ? ORDER BY created_at")
            .bind(sprint_id)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(|r| self.row_to_task(r)).collect()
    }

    fn row_to_task(&self, row: &sqlx::sqlite::SqliteRow) -> Result<Task, StorageError> {
        Ok(Task {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            project_id: row.try_get("project_id")?,
            sprint_id: row.try_get("sprint_id")?,
            assignee_id: row.try_get("assignee_id")?,
            status: row.try_get("status")?,
            priority: row.try_get("priority")?,
            due_date: row.try_get("due_date")?,
            story_points: row.try_get("story_points")?,
            estimated_hours: row.try_get("estimated_hours")?,
            time_spent_hours: row.try_get("time_spent_hours")?,
            requirement_attachments: decode_refs(
                row.try_get::<Option<String>, _>("requirement_attachments")?,
            )?,
            completion_attachments: decode_refs(
                row.try_get::<Option<String>, _>("completion_attachments")?,
            )?,
            review_notes: row.try_get("review_notes")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

fn decode_refs(raw: Option<String>) -> Result<Vec<String>, StorageError> {
    match raw {
        Some(json) => serde_json::from_str(&json).map_err(StorageError::Json),
        None => Ok(Vec::new()),
    }
}
