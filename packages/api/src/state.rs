// ABOUTME: Shared application state for API handlers
// ABOUTME: One pool, with storages and engines constructed over it

use std::sync::Arc;

use sqlx::SqlitePool;

use cadence_projects::ProjectStorage;
use cadence_scope::ScopeResolver;
use cadence_sprints::SprintStorage;
use cadence_stats::StatsEngine;
use cadence_tasks::{TaskEngine, TaskStorage};
use cadence_teams::{MembershipManager, TeamStorage};
use cadence_users::UserStorage;

#[derive(Clone)]
pub struct DbState {
    pub pool: SqlitePool,
    pub user_storage: Arc<UserStorage>,
    pub team_storage: Arc<TeamStorage>,
    pub project_storage: Arc<ProjectStorage>,
    pub sprint_storage: Arc<SprintStorage>,
    pub task_storage: Arc<TaskStorage>,
    pub membership_manager: Arc<MembershipManager>,
    pub scope_resolver: Arc<ScopeResolver>,
    pub task_engine: Arc<TaskEngine>,
    pub stats_engine: Arc<StatsEngine>,
}

impl DbState {
    /// Create application state from a SQLite pool
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            user_storage: Arc::new(UserStorage::new(pool.clone())),
            team_storage: Arc::new(TeamStorage::new(pool.clone())),
            project_storage: Arc::new(ProjectStorage::new(pool.clone())),
            sprint_storage: Arc::new(SprintStorage::new(pool.clone())),
            task_storage: Arc::new(TaskStorage::new(pool.clone())),
            membership_manager: Arc::new(MembershipManager::new(pool.clone())),
            scope_resolver: Arc::new(ScopeResolver::new(pool.clone())),
            task_engine: Arc::new(TaskEngine::new(pool.clone())),
            stats_engine: Arc::new(StatsEngine::new(pool.clone())),
            pool,
        }
    }
}
