// ABOUTME: Team storage layer using SQLite
// ABOUTME: Handles CRUD operations for teams

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use cadence_core::EntityId;
use cadence_storage::StorageError;

use crate::types::{Team, TeamCreateInput, TeamUpdateInput};

pub struct TeamStorage {
    pool: SqlitePool,
}

impl TeamStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_team(&self, input: TeamCreateInput) -> Result<Team, StorageError> {
        let team_id = EntityId::generate();
        let now = Utc::now();

        debug!("Creating team: {} ({})", team_id, input.name);

        sqlx::query(
            r#"
            INSERT INTO teams (id, name, description, lead_id, parent_team_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&team_id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.lead_id)
        .bind(&input.parent_team_id)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        let row = sqlx::query("SELECT * FROM teams WHERE id = ?")
            .bind(&team_id)
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        self.row_to_team(&row)
    }

    pub async fn get_team(&self, team_id: &EntityId) -> Result<Option<Team>, StorageError> {
        debug!("Fetching team: {}", team_id);

        let row = sqlx::query("SELECT * FROM teams WHERE id = ?")
            .bind(team_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        row.map(|r| self.row_to_team(&r)).transpose()
    }

    pub async fn list_teams(&self) -> Result<Vec<Team>, StorageError> {
        let rows = sqlx::query("SELECT * FROM teams ORDER BY name, created_at")
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(|r| self.row_to_team(r)).collect()
    }

    pub async fn update_team(
        &self,
        team_id: &EntityId,
        input: TeamUpdateInput,
    ) -> Result<Option<Team>, StorageError> {
        debug!("Updating team: {}", team_id);

        let mut query = String::from("UPDATE teams SET updated_at = ?");
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
        if input.parent_team_id.is_some() {
            query.push_str(", parent_team_id = ?");
            has_updates = true;
        }

        query.push_str(" WHERE id = ?");

        if !has_updates {
            return self.get_team(team_id).await;
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
        if let Some(parent_team_id) = &input.parent_team_id {
            q = q.bind(parent_team_id);
        }

        q = q.bind(team_id);

        q.execute(&self.pool).await.map_err(StorageError::Sqlx)?;

        self.get_team(team_id).await
    }

    pub async fn delete_team(&self, team_id: &EntityId) -> Result<bool, StorageError> {
        debug!("Deleting team: {}", team_id);

        let result = sqlx::query("DELETE FROM teams WHERE id = ?")
            .bind(team_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        Ok(result.rows_affected() > 0)
    }

    fn row_to_team(&self, row: &sqlx::sqlite::SqliteRow) -> Result<Team, StorageError> {
        Ok(Team {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            lead_id: row.try_get("lead_id")?,
            parent_team_id: row.try_get("parent_team_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}
