// ABOUTME: Statistics engine running aggregate queries over the store
// ABOUTME: Team dashboards degrade to zeroes instead of failing the caller

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use cadence_core::EntityId;
use cadence_projects::Project;
use cadence_storage::StorageError;

use crate::types::TeamStatistics;

pub struct StatsEngine {
    pool: SqlitePool,
}

impl StatsEngine {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Dashboard numbers for a team. This never fails the caller: a missing
    /// team id or any storage failure degrades to zeroed output.
    pub async fn compute_team_statistics(&self, team_id: Option<&EntityId>) -> TeamStatistics {
        let Some(team_id) = team_id else {
            return TeamStatistics::default();
        };

        match self.team_statistics(team_id).await {
            Ok(stats) => stats,
            Err(err) => {
                warn!("Team statistics for {} degraded to zeroes: {}", team_id, err);
                TeamStatistics::default()
            }
        }
    }

    async fn team_statistics(&self, team_id: &EntityId) -> Result<TeamStatistics, StorageError> {
        debug!("Computing statistics for team: {}", team_id);

        let total_members: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE team_id = ?")
                .bind(team_id)
                .fetch_one(&self.pool)
                .await
                .map_err(StorageError::Sqlx)?;

        let active_projects: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM projects WHERE team_id = ? AND status = 'in-progress'",
        )
        .bind(team_id)
        .fetch_one(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        // Mean over stored progress values, an unset value counting as zero.
        // A team with no projects reads as zero, not as a division error.
        let team_progress: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(CAST(ROUND(AVG(COALESCE(progress, 0))) AS INTEGER), 0)
            FROM projects WHERE team_id = ?
            "#,
        )
        .bind(team_id)
        .fetch_one(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        let upcoming_sprints: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM sprints
            WHERE status = 'upcoming'
              AND datetime(start_date) >= datetime(?)
              AND project_id IN (SELECT id FROM projects WHERE team_id = ?)
            "#,
        )
        .bind(Utc::now())
        .bind(team_id)
        .fetch_one(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        // Task counters come from the persisted sprint summaries, so backlog
        // tasks outside any sprint are invisible on the team dashboard.
        let (completed_tasks, total_tasks): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(stats_tasks_completed), 0),
                   COALESCE(SUM(stats_total_tasks), 0)
            FROM sprints
            WHERE project_id IN (SELECT id FROM projects WHERE team_id = ?)
            "#,
        )
        .bind(team_id)
        .fetch_one(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(TeamStatistics {
            total_members,
            active_projects,
            team_progress,
            upcoming_sprints,
            completed_tasks,
            total_tasks,
        })
    }

    /// Percent complete for one project: the stored override when set,
    /// otherwise derived live from the tasks table.
    pub async fn project_progress(&self, project: &Project) -> Result<i64, StorageError> {
        if let Some(progress) = project.progress {
            return Ok(progress);
        }

        let (done, total): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(CASE WHEN status = 'done' THEN 1 ELSE 0 END), 0),
                   COUNT(*)
            FROM tasks WHERE project_id = ?
            "#,
        )
        .bind(&project.id)
        .fetch_one(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        if total == 0 {
            return Ok(0);
        }
        Ok((100.0 * done as f64 / total as f64).round() as i64)
    }
}
