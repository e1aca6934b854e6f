// ABOUTME: User storage layer using SQLite
// ABOUTME: CRUD plus the guarded single-statement team attach/detach updates

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use cadence_core::EntityId;
use cadence_storage::StorageError;

use crate::types::{User, UserCreateInput, UserRole, UserStatus, UserUpdateInput};

pub struct UserStorage {
    pool: SqlitePool,
}

impl UserStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_user(&self, input: UserCreateInput) -> Result<User, StorageError> {
        let user_id = EntityId::generate();
        let now = Utc::now();
        let role = input.role.unwrap_or(UserRole::Member);
        let status = input.status.unwrap_or(UserStatus::Active);

        debug!("Creating user: {} ({})", user_id, input.email);

        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, role, status, team_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user_id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&role)
        .bind(&status)
        .bind(&input.team_id)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(&user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        self.row_to_user(&row)
    }

    pub async fn get_user(&self, user_id: &EntityId) -> Result<Option<User>, StorageError> {
        debug!("Fetching user: {}", user_id);

        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        row.map(|r| self.row_to_user(&r)).transpose()
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        row.map(|r| self.row_to_user(&r)).transpose()
    }

    pub async fn list_users(&self) -> Result<Vec<User>, StorageError> {
        let rows = sqlx::query("SELECT * FROM users ORDER BY name, created_at")
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(|r| self.row_to_user(r)).collect()
    }

    /// Members of a team, derived from users.team_id.
    pub async fn list_team_members(&self, team_id: &EntityId) -> Result<Vec<User>, StorageError> {
        debug!("Fetching members of team: {}", team_id);

        let rows = sqlx::query("SELECT * FROM users WHERE team_id = ? ORDER BY name, created_at")
            .bind(team_id)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(|r| self.row_to_user(r)).collect()
    }

    pub async fn update_user(
        &self,
        user_id: &EntityId,
        input: UserUpdateInput,
    ) -> Result<Option<User>, StorageError> {
        debug!("Updating user: {}", user_id);

        // Build dynamic UPDATE query based on provided fields
        let mut query = String::from("UPDATE users SET updated_at = ?");
        let mut has_updates = false;

        if input.name.is_some() {
            query.push_str(", name = ?");
            has_updates = true;
        }
        if input.email.is_some() {
            query.push_str(", email = ?");
            has_updates = true;
        }
        if input.role.is_some() {
            query.push_str(", role = ?");
            has_updates = true;
        }
        if input.status.is_some() {
            query.push_str(", status = ?");
            has_updates = true;
        }

        query.push_str(" WHERE id = ?");

        if !has_updates {
            return self.get_user(user_id).await;
        }

        let now = Utc::now();
        let mut q = sqlx::query(&query).bind(now);

        if let Some(name) = &input.name {
            q = q.bind(name);
        }
        if let Some(email) = &input.email {
            q = q.bind(email);
        }
        if let Some(role) = &input.role {
            q = q.bind(role);
        }
        if let Some(status) = &input.status {
            q = q.bind(status);
        }

        q = q.bind(user_id);

        q.execute(&self.pool).await.map_err(StorageError::Sqlx)?;

        self.get_user(user_id).await
    }

    pub async fn delete_user(&self, user_id: &EntityId) -> Result<bool, StorageError> {
        debug!("Deleting user: {}", user_id);

        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        Ok(result.rows_affected() > 0)
    }

    /// Attach a user to a team only if they are not on one already.
    /// Returns false when the user is unknown or already has a team.
    pub async fn attach_to_team(
        &self,
        user_id: &EntityId,
        team_id: &EntityId,
    ) -> Result<bool, StorageError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET team_id = ?, updated_at = ?
            WHERE id = ? AND team_id IS NULL
            "#,
        )
        .bind(team_id)
        .bind(Utc::now())
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(result.rows_affected() > 0)
    }

    /// Detach a user from a team; only clears membership of that exact team.
    pub async fn detach_from_team(
        &self,
        user_id: &EntityId,
        team_id: &EntityId,
    ) -> Result<bool, StorageError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET team_id = NULL, updated_at = ?
            WHERE id = ? AND team_id = ?
            "#,
        )
        .bind(Utc::now())
        .bind(user_id)
        .bind(team_id)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(result.rows_affected() > 0)
    }

    fn row_to_user(&self, row: &sqlx::sqlite::SqliteRow) -> Result<User, StorageError> {
        Ok(User {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            role: row.try_get("role")?,
            status: row.try_get("status")?,
            team_id: row.try_get("team_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}
