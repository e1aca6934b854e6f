// ABOUTME: Lead scope resolver and the shared project authority predicate
// ABOUTME: Read-only; safe to call any number of times per request

use serde::Serialize;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::debug;

use cadence_core::EntityId;
use cadence_projects::{Project, ProjectFilter, ProjectStorage};
use cadence_sprints::{Sprint, SprintFilter, SprintStorage};
use cadence_storage::StorageError;
use cadence_users::{User, UserStorage};

#[derive(Error, Debug)]
pub enum ScopeError {
    #[error("user not found: {0}")]
    UserNotFound(EntityId),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// The identifiers a lead is authorized over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadScope {
    pub project_ids: Vec<EntityId>,
    pub sprint_ids: Vec<EntityId>,
}

/// The shared authorization predicate for lead-driven mutations: a lead
/// controls a project they own directly, or any project assigned to their
/// team. The union is deliberate; personal ownership and team assignment
/// are independent grants.
pub fn lead_has_authority(lead: &User, project: &Project) -> bool {
    if project.lead_id.as_ref() == Some(&lead.id) {
        return true;
    }
    match (&lead.team_id, &project.team_id) {
        (Some(lead_team), Some(project_team)) => lead_team == project_team,
        _ => false,
    }
}

pub struct ScopeResolver {
    users: UserStorage,
    projects: ProjectStorage,
    sprints: SprintStorage,
}

impl ScopeResolver {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            users: UserStorage::new(pool.clone()),
            projects: ProjectStorage::new(pool.clone()),
            sprints: SprintStorage::new(pool),
        }
    }

    /// Resolve the full scope for a user: the projects they own or that
    /// belong to their team, and every sprint under those projects.
    pub async fn resolve_lead_scope(&self, user_id: &EntityId) -> Result<LeadScope, ScopeError> {
        let user = self.require_user(user_id).await?;

        let projects = self
            .projects
            .list_for_lead(&user.id, user.team_id.as_ref(), &ProjectFilter::default())
            .await?;
        let project_ids: Vec<EntityId> = projects.into_iter().map(|p| p.id).collect();

        let sprints = self
            .sprints
            .list_for_projects(&project_ids, &SprintFilter::default())
            .await?;
        let sprint_ids: Vec<EntityId> = sprints.into_iter().map(|s| s.id).collect();

        debug!(
            "Resolved scope for {}: {} projects, {} sprints",
            user_id,
            project_ids.len(),
            sprint_ids.len()
        );

        Ok(LeadScope {
            project_ids,
            sprint_ids,
        })
    }

    /// Hydrated projects in the caller's scope.
    pub async fn list_scoped_projects(
        &self,
        user_id: &EntityId,
        filter: &ProjectFilter,
    ) -> Result<Vec<Project>, ScopeError> {
        let user = self.require_user(user_id).await?;

        Ok(self
            .projects
            .list_for_lead(&user.id, user.team_id.as_ref(), filter)
            .await?)
    }

    /// Hydrated sprints in the caller's scope.
    pub async fn list_scoped_sprints(
        &self,
        user_id: &EntityId,
        filter: &SprintFilter,
    ) -> Result<Vec<Sprint>, ScopeError> {
        let scope = self.resolve_lead_scope(user_id).await?;

        Ok(self
            .sprints
            .list_for_projects(&scope.project_ids, filter)
            .await?)
    }

    async fn require_user(&self, user_id: &EntityId) -> Result<User, ScopeError> {
        self.users
            .get_user(user_id)
            .await?
            .ok_or_else(|| ScopeError::UserNotFound(user_id.clone()))
    }
}
