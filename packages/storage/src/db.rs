// ABOUTME: SQLite connection pool setup and migration runner
// ABOUTME: Exposes connect helpers used by the server and by package tests

use std::path::Path;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::{StorageError, StorageResult};

/// Open (or create) the database at `database_path` and run migrations.
pub async fn connect(database_path: &Path) -> StorageResult<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = database_path.parent() {
        std::fs::create_dir_all(parent).map_err(StorageError::Io)?;
    }

    debug!("Connecting to database: {}", database_path.display());

    let options = SqliteConnectOptions::new()
        .filename(database_path)
        .create_if_missing(true);

    // Configure connection pool
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(30))
        .connect_with(options)
        .await
        .map_err(StorageError::Sqlx)?;

    configure(&pool).await?;

    info!("Database connection established");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(StorageError::Migration)?;

    debug!("Database migrations completed");

    Ok(pool)
}

/// In-memory database for tests. A single connection keeps the database
/// alive for the lifetime of the pool.
pub async fn connect_in_memory() -> StorageResult<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .map_err(StorageError::Sqlx)?;

    configure(&pool).await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(StorageError::Migration)?;

    Ok(pool)
}

// Configure SQLite settings
async fn configure(pool: &SqlitePool) -> StorageResult<()> {
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(pool)
        .await
        .map_err(StorageError::Sqlx)?;

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(pool)
        .await
        .map_err(StorageError::Sqlx)?;

    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(pool)
        .await
        .map_err(StorageError::Sqlx)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_creates_database_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("cadence.db");

        let pool = connect(&path).await.expect("connect");
        assert!(path.exists());

        // Migrations ran: the core tables answer queries
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .expect("query users");
        assert_eq!(count.0, 0);
    }

    #[tokio::test]
    async fn in_memory_database_has_schema() {
        let pool = connect_in_memory().await.expect("connect");

        for table in ["users", "teams", "projects", "project_members", "sprints", "tasks"] {
            let query = format!("SELECT COUNT(*) FROM {}", table);
            let count: (i64,) = sqlx::query_as(&query)
                .fetch_one(&pool)
                .await
                .unwrap_or_else(|e| panic!("table {} missing: {}", table, e));
            assert_eq!(count.0, 0);
        }
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let pool = connect_in_memory().await.expect("connect");

        let result = sqlx::query(
            "INSERT INTO tasks (id, title, project_id) VALUES ('aaaaaaaaaaaaaaaaaaaaaaaa', 'x', 'bbbbbbbbbbbbbbbbbbbbbbbb')",
        )
        .execute(&pool)
        .await;

        assert!(result.is_err());
    }
}
