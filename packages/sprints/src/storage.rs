// ABOUTME: Sprint storage layer using SQLite
// ABOUTME: CRUD plus the stats recompute shared with task write transactions

use chrono::Utc;
use sqlx::{Executor, Row, Sqlite, SqlitePool};
use tracing::debug;

use cadence_core::EntityId;
use cadence_storage::StorageError;

use crate::types::{
    Sprint, SprintCreateInput, SprintFilter, SprintStats, SprintStatus, SprintUpdateInput,
};

/// Recompute a sprint's persisted task summary from the tasks table.
///
/// A single statement, so it can run on a pool or inside a caller's
/// transaction (`&mut *tx`) to keep summary and task writes atomic.
pub async fn recompute_sprint_stats<'a, E>(
    executor: E,
    sprint_id: &EntityId,
) -> Result<bool, StorageError>
where
    E: Executor<'a, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        UPDATE sprints
        SET stats_total_tasks = (SELECT COUNT(*) FROM tasks WHERE sprint_id = sprints.id),
            stats_tasks_completed = (SELECT COUNT(*) FROM tasks WHERE sprint_id = sprints.id AND status = 'done'),
            stats_estimated_hours = (SELECT COALESCE(SUM(estimated_hours), 0) FROM tasks WHERE sprint_id = sprints.id),
            stats_time_spent_hours = (SELECT COALESCE(SUM(time_spent_hours), 0) FROM tasks WHERE sprint_id = sprints.id),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(Utc::now())
    .bind(sprint_id)
    .execute(executor)
    .await
    .map_err(StorageError::Sqlx)?;

    Ok(result.rows_affected() > 0)
}

pub struct SprintStorage {
    pool: SqlitePool,
}

impl SprintStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_sprint(&self, input: SprintCreateInput) -> Result<Sprint, StorageError> {
        let sprint_id = EntityId::generate();
        let now = Utc::now();
        let status = input.status.unwrap_or(SprintStatus::Upcoming);

        debug!("Creating sprint: {} ({})", sprint_id, input.name);

        sqlx::query(
            r#"
            INSERT INTO sprints (id, name, project_id, status, start_date, end_date, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&sprint_id)
        .bind(&input.name)
        .bind(&input.project_id)
        .bind(&status)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        let row = sqlx::query("SELECT * FROM sprints WHERE id = ?")
            .bind(&sprint_id)
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        self.row_to_sprint(&row)
    }

    pub async fn get_sprint(&self, sprint_id: &EntityId) -> Result<Option<Sprint>, StorageError> {
        debug!("Fetching sprint: {}", sprint_id);

        let row = sqlx::query("SELECT * FROM sprints WHERE id = ?")
            .bind(sprint_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        row.map(|r| self.row_to_sprint(&r)).transpose()
    }

    /// Sprints belonging to any of the given projects. The scope resolver
    /// feeds this its authorized project set.
    pub async fn list_for_projects(
        &self,
        project_ids: &[EntityId],
        filter: &SprintFilter,
    ) -> Result<Vec<Sprint>, StorageError> {
        if project_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; project_ids.len()].join(", ");
        let mut query = format!(
            "SELECT * FROM sprints WHERE project_id IN ({})",
            placeholders
        );
        if filter.status.is_some() {
            query.push_str(" AND status = ?");
        }
        if filter.project_id.is_some() {
            query.push_str(" AND project_id = ?");
        }
        query.push_str(" ORDER BY start_date, created_at");

        let mut q = sqlx::query(&query);
        for project_id in project_ids {
            q = q.bind(project_id);
        }
        if let Some(status) = &filter.status {
            q = q.bind(status);
        }
        if let Some(project_id) = &filter.project_id {
            q = q.bind(project_id);
        }

        let rows = q.fetch_all(&self.pool).await.map_err(StorageError::Sqlx)?;

        rows.iter().map(|r| self.row_to_sprint(r)).collect()
    }

    pub async fn update_sprint(
        &self,
        sprint_id: &EntityId,
        input: SprintUpdateInput,
    ) -> Result<Option<Sprint>, StorageError> {
        debug!("Updating sprint: {}", sprint_id);

        let mut query = String::from("UPDATE sprints SET updated_at = ?");
        let mut has_updates = false;

        if input.name.is_some() {
            query.push_str(", name = ?");
            has_updates = true;
        }
        if input.status.is_some() {
            query.push_str(", status = ?");
            has_updates = true;
        }
        if input.start_date.is_some() {
            query.push_str(", start_date = ?");
            has_updates = true;
        }
        if input.end_date.is_some() {
            query.push_str(", end_date = ?");
            has_updates = true;
        }

        query.push_str(" WHERE id = ?");

        if !has_updates {
            return self.get_sprint(sprint_id).await;
        }

        let now = Utc::now();
        let mut q = sqlx::query(&query).bind(now);

        if let Some(name) = &input.name {
            q = q.bind(name);
        }
        if let Some(status) = &input.status {
            q = q.bind(status);
        }
        if let Some(start_date) = input.start_date {
            q = q.bind(start_date);
        }
        if let Some(end_date) = input.end_date {
            q = q.bind(end_date);
        }

        q = q.bind(sprint_id);

        q.execute(&self.pool).await.map_err(StorageError::Sqlx)?;

        self.get_sprint(sprint_id).await
    }

    pub async fn delete_sprint(&self, sprint_id: &EntityId) -> Result<bool, StorageError> {
        debug!("Deleting sprint: {}", sprint_id);

        let result = sqlx::query("DELETE FROM sprints WHERE id = ?")
            .bind(sprint_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        Ok(result.rows_affected() > 0)
    }

    /// Pool-backed wrapper for the public recompute operation.
    pub async fn recompute_stats(&self, sprint_id: &EntityId) -> Result<bool, StorageError> {
        recompute_sprint_stats(&self.pool, sprint_id).await
    }

    fn row_to_sprint(&self, row: &sqlx::sqlite::SqliteRow) -> Result<Sprint, StorageError> {
        Ok(Sprint {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            project_id: row.try_get("project_id")?,
            status: row.try_get("status")?,
            start_date: row.try_get("start_date")?,
            end_date: row.try_get("end_date")?,
            stats: SprintStats {
                total_tasks: row.try_get("stats_total_tasks")?,
                tasks_completed: row.try_get("stats_tasks_completed")?,
                estimated_hours: row.try_get("stats_estimated_hours")?,
                time_spent_hours: row.try_get("stats_time_spent_hours")?,
            },
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}
