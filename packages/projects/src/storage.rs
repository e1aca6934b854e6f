// ABOUTME: Project storage layer using SQLite
// ABOUTME: CRUD, the lead-scope query, team moves, and the member subset

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use cadence_core::EntityId;
use cadence_storage::StorageError;

use crate::types::{Project, ProjectCreateInput, ProjectFilter, ProjectStatus, ProjectUpdateInput};

pub struct ProjectStorage {
    pool: SqlitePool,
}

impl ProjectStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_project(&self, input: ProjectCreateInput) -> Result<Project, StorageError> {
        let project_id = EntityId::generate();
        let now = Utc::now();
        let status = input.status.unwrap_or(ProjectStatus::NotStarted);

        debug!("Creating project: {} ({})", project_id, input.name);

        sqlx::query(
            r#"
            INSERT INTO projects (id, name, description, team_id, lead_id, status, progress, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&project_id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.team_id)
        .bind(&input.lead_id)
        .bind(&status)
        .bind(input.progress)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        let row = sqlx::query("SELECT * FROM projects WHERE id = ?")
            .bind(&project_id)
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        self.row_to_project(&row)
    }

    pub async fn get_project(&self, project_id: &EntityId) -> Result<Option<Project>, StorageError> {
        debug!("Fetching project: {}", project_id);

        let row = sqlx::query("SELECT * FROM projects WHERE id = ?")
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        row.map(|r| self.row_to_project(&r)).transpose()
    }

    /// Projects a lead is authorized over: owned directly, or assigned to the
    /// lead's team. The union is intentional.
    pub async fn list_for_lead(
        &self,
        lead_id: &EntityId,
        team_id: Option<&EntityId>,
        filter: &ProjectFilter,
    ) -> Result<Vec<Project>, StorageError> {
        debug!("Fetching projects for lead: {} (team: {:?})", lead_id, team_id);

        let mut query = String::from("SELECT * FROM projects WHERE (lead_id = ?");
        if team_id.is_some() {
            query.push_str(" OR team_id = ?");
        }
        query.push(')');
        if filter.status.is_some() {
            query.push_str(" AND status = ?");
        }
        query.push_str(" ORDER BY created_at");

        let mut q = sqlx::query(&query).bind(lead_id);
        if let Some(team) = team_id {
            q = q.bind(team);
        }
        if let Some(status) = &filter.status {
            q = q.bind(status);
        }

        let rows = q.fetch_all(&self.pool).await.map_err(StorageError::Sqlx)?;

        rows.iter().map(|r| self.row_to_project(r)).collect()
    }

    /// Projects assigned to a team (ignores per-project leads).
    pub async fn list_for_team(&self, team_id: &EntityId) -> Result<Vec<Project>, StorageError> {
        let rows = sqlx::query("SELECT * FROM projects WHERE team_id = ? ORDER BY created_at")
            .bind(team_id)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(|r| self.row_to_project(r)).collect()
    }

    pub async fn update_project(
        &self,
        project_id: &EntityId,
        input: ProjectUpdateInput,
    ) -> Result<Option<Project>, StorageError> {
        debug!("Updating project: {}", project_id);

        let mut query = String::from("UPDATE projects SET updated_at = ?");
        let mut has_updates = false;

        if input.name.is_some() {
            query.push_str(", name = ?");
            has_updates = true;
        }
        if input.description.is_some() {
            query.push_str(", description = ?");
            has_updates = true;
        }
        if input.lead_id.is_some() {
            query.push_str(", lead_id = ?");
            has_updates = true;
        }
        if input.status.is_some() {
            query.push_str(", status = ?");
            has_updates = true;
        }
        if input.progress.is_some() {
            query.push_str(", progress = ?");
            has_updates = true;
        }

        query.push_str(" WHERE id = ?");

        if !has_updates {
            return self.get_project(project_id).await;
        }

        let now = Utc::now();
        let mut q = sqlx::query(&query).bind(now);

        if let Some(name) = &input.name {
            q = q.bind(name);
        }
        if let Some(description) = &input.description {
            q = q.bind(description);
        }
        if let Some(lead_id) = &input.lead_id {
            q = q.bind(lead_id);
        }
        if let Some(status) = &input.status {
            q = q.bind(status);
        }
        if let Some(progress) = input.progress {
            q = q.bind(progress);
        }

        q = q.bind(project_id);

        q.execute(&self.pool).await.map_err(StorageError::Sqlx)?;

        self.get_project(project_id).await
    }

    /// Reassign a project to another team (or to none). A single UPDATE, so
    /// readers never observe the project half-moved between teams.
    pub async fn move_to_team(
        &self,
        project_id: &EntityId,
        new_team_id: Option<&EntityId>,
    ) -> Result<Option<Project>, StorageError> {
        debug!("Moving project {} to team {:?}", project_id, new_team_id);

        let result = sqlx::query(
            r#"
            UPDATE projects
            SET team_id = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(new_team_id)
        .bind(Utc::now())
        .bind(project_id)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_project(project_id).await
    }

    pub async fn delete_project(&self, project_id: &EntityId) -> Result<bool, StorageError> {
        debug!("Deleting project: {}", project_id);

        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(project_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn add_project_member(
        &self,
        project_id: &EntityId,
        user_id: &EntityId,
    ) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT OR IGNORE INTO project_members (project_id, user_id) VALUES (?, ?)",
        )
        .bind(project_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(())
    }

    pub async fn remove_project_member(
        &self,
        project_id: &EntityId,
        user_id: &EntityId,
    ) -> Result<bool, StorageError> {
        let result =
            sqlx::query("DELETE FROM project_members WHERE project_id = ? AND user_id = ?")
                .bind(project_id)
                .bind(user_id)
                .execute(&self.pool)
                .await
                .map_err(StorageError::Sqlx)?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list_project_members(
        &self,
        project_id: &EntityId,
    ) -> Result<Vec<EntityId>, StorageError> {
        let rows = sqlx::query(
            "SELECT user_id FROM project_members WHERE project_id = ? ORDER BY created_at",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter()
            .map(|r| r.try_get("user_id").map_err(StorageError::Sqlx))
            .collect()
    }

    fn row_to_project(&self, row: &sqlx::sqlite::SqliteRow) -> Result<Project, StorageError> {
        Ok(Project {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            team_id: row.try_get("team_id")?,
            lead_id: row.try_get("lead_id")?,
            status: row.try_get("status")?,
            progress: row.try_get("progress")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}
