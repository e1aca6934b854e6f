// ABOUTME: Task lifecycle engine driving the review workflow
// ABOUTME: Status transitions, authority checks, and transactional persistence

use chrono::Utc;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info};

use cadence_core::EntityId;
use cadence_projects::{Project, ProjectStorage};
use cadence_scope::{lead_has_authority, ScopeError, ScopeResolver};
use cadence_sprints::{recompute_sprint_stats, Sprint, SprintStorage};
use cadence_storage::StorageError;
use cadence_users::{User, UserStorage};

use crate::guard;
use crate::storage::TaskStorage;
use crate::types::{Task, TaskCreateInput, TaskFilter, TaskStatus, TaskUpdateInput};

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("task not found: {0}")]
    TaskNotFound(EntityId),
    #[error("project not found: {0}")]
    ProjectNotFound(EntityId),
    #[error("sprint not found: {0}")]
    SprintNotFound(EntityId),
    #[error("user not found: {0}")]
    UserNotFound(EntityId),
    #[error("not authorized to manage this task")]
    Forbidden,
    #[error("cannot move task from {from} to {to}")]
    InvalidTransition { from: TaskStatus, to: TaskStatus },
    #[error("rejection notes must not be blank")]
    BlankReviewNotes,
    #[error("assignee {assignee} is not on the acting lead's team")]
    AssigneeNotOnLeadTeam { assignee: EntityId },
    #[error("sprint {sprint} does not belong to project {project}")]
    SprintProjectMismatch { sprint: EntityId, project: EntityId },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<ScopeError> for TaskError {
    fn from(err: ScopeError) -> Self {
        match err {
            ScopeError::UserNotFound(id) => TaskError::UserNotFound(id),
            ScopeError::Storage(err) => TaskError::Storage(err),
        }
    }
}

/// The status table. Rejection returns a task to in-progress, never to
/// to-do, and done is terminal.
pub fn transition_allowed(from: &TaskStatus, to: &TaskStatus) -> bool {
    matches!(
        (from, to),
        (TaskStatus::ToDo, TaskStatus::InProgress)
            | (TaskStatus::InProgress, TaskStatus::Review)
            | (TaskStatus::Review, TaskStatus::Done)
            | (TaskStatus::Review, TaskStatus::InProgress)
    )
}

/// Drives task creation, updates, and the review workflow. Every mutation
/// runs in one transaction together with the affected sprint's stats
/// recompute, so the persisted summaries never lag the task rows.
pub struct TaskEngine {
    pool: SqlitePool,
    tasks: TaskStorage,
    users: UserStorage,
    projects: ProjectStorage,
    sprints: SprintStorage,
    scope: ScopeResolver,
}

impl TaskEngine {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            tasks: TaskStorage::new(pool.clone()),
            users: UserStorage::new(pool.clone()),
            projects: ProjectStorage::new(pool.clone()),
            sprints: SprintStorage::new(pool.clone()),
            scope: ScopeResolver::new(pool.clone()),
            pool,
        }
    }

    /// Create a task on a project the acting lead controls. Defaults to
    /// to-do status, medium priority, and one story point.
    pub async fn create_task(
        &self,
        actor: &EntityId,
        input: TaskCreateInput,
    ) -> Result<Task, TaskError> {
        let project = self.require_project(&input.project_id).await?;
        let lead = self.require_user(actor).await?;
        if !lead_has_authority(&lead, &project) {
            return Err(TaskError::Forbidden);
        }

        if let Some(assignee_id) = &input.assignee_id {
            let assignee = self.require_user(assignee_id).await?;
            guard::ensure_assignee_on_lead_team(&assignee, &lead)?;
        }
        if let Some(sprint_id) = &input.sprint_id {
            let sprint = self.require_sprint(sprint_id).await?;
            guard::ensure_sprint_in_project(&sprint, &input.project_id)?;
        }

        let now = Utc::now();
        let task = Task {
            id: EntityId::generate(),
            title: input.title,
            description: input.description,
            project_id: input.project_id,
            sprint_id: input.sprint_id,
            assignee_id: input.assignee_id,
            status: TaskStatus::default(),
            priority: input.priority.unwrap_or_default(),
            due_date: input.due_date,
            story_points: input.story_points.unwrap_or(1),
            estimated_hours: input.estimated_hours,
            time_spent_hours: None,
            requirement_attachments: input.requirement_attachments.unwrap_or_default(),
            completion_attachments: Vec::new(),
            review_notes: None,
            created_at: now,
            updated_at: now,
        };

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;
        self.tasks.insert(&mut *tx, &task).await?;
        if let Some(sprint_id) = &task.sprint_id {
            recompute_sprint_stats(&mut *tx, sprint_id).await?;
        }
        tx.commit().await.map_err(StorageError::Sqlx)?;

        info!("Created task: {} ({})", task.id, task.title);
        Ok(task)
    }

    /// Field updates, lead-driven. A changed assignee or sprint reference is
    /// re-validated before anything is written; when a task moves between
    /// sprints both summaries are recomputed in the same transaction.
    pub async fn update_task(
        &self,
        actor: &EntityId,
        task_id: &EntityId,
        input: TaskUpdateInput,
    ) -> Result<Task, TaskError> {
        let mut task = self.require_task(task_id).await?;
        let (lead, _) = self.authorize_lead(actor, &task.project_id).await?;

        let previous_sprint = task.sprint_id.clone();

        if let Some(title) = input.title {
            task.title = title;
        }
        if let Some(description) = input.description {
            task.description = Some(description);
        }
        if let Some(sprint_id) = input.sprint_id {
            if task.sprint_id.as_ref() != Some(&sprint_id) {
                let sprint = self.require_sprint(&sprint_id).await?;
                guard::ensure_sprint_in_project(&sprint, &task.project_id)?;
            }
            task.sprint_id = Some(sprint_id);
        }
        if let Some(assignee_id) = input.assignee_id {
            if task.assignee_id.as_ref() != Some(&assignee_id) {
                let assignee = self.require_user(&assignee_id).await?;
                guard::ensure_assignee_on_lead_team(&assignee, &lead)?;
            }
            task.assignee_id = Some(assignee_id);
        }
        if let Some(priority) = input.priority {
            task.priority = priority;
        }
        if let Some(due_date) = input.due_date {
            task.due_date = Some(due_date);
        }
        if let Some(story_points) = input.story_points {
            task.story_points = story_points;
        }
        if let Some(estimated_hours) = input.estimated_hours {
            task.estimated_hours = Some(estimated_hours);
        }
        if let Some(time_spent_hours) = input.time_spent_hours {
            task.time_spent_hours = Some(time_spent_hours);
        }
        if let Some(refs) = input.requirement_attachments {
            task.requirement_attachments = refs;
        }
        task.updated_at = Utc::now();

        self.persist(&task, previous_sprint.as_ref()).await?;
        Ok(task)
    }

    /// Delete a task and settle its sprint's summary in one transaction.
    pub async fn delete_task(&self, actor: &EntityId, task_id: &EntityId) -> Result<(), TaskError> {
        let task = self.require_task(task_id).await?;
        self.authorize_lead(actor, &task.project_id).await?;

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;
        self.tasks.delete(&mut *tx, task_id).await?;
        if let Some(sprint_id) = &task.sprint_id {
            recompute_sprint_stats(&mut *tx, sprint_id).await?;
        }
        tx.commit().await.map_err(StorageError::Sqlx)?;

        info!("Deleted task: {}", task_id);
        Ok(())
    }

    /// to-do → in-progress. Open to the assignee picking the task up, or to
    /// an authorizing lead marking it read on their behalf.
    pub async fn mark_read(&self, actor: &EntityId, task_id: &EntityId) -> Result<Task, TaskError> {
        let mut task = self.require_task(task_id).await?;

        let is_assignee = task.assignee_id.as_ref() == Some(actor);
        if !is_assignee {
            self.authorize_lead(actor, &task.project_id).await?;
        }

        Self::step(&mut task, TaskStatus::ToDo, TaskStatus::InProgress)?;
        self.persist(&task, None).await?;

        debug!("Task {} picked up by {}", task.id, actor);
        Ok(task)
    }

    /// in-progress → review, assignee only. Completion attachment refs
    /// handed in here are appended to the task.
    pub async fn move_to_review(
        &self,
        actor: &EntityId,
        task_id: &EntityId,
        completion_attachments: Vec<String>,
    ) -> Result<Task, TaskError> {
        let mut task = self.require_task(task_id).await?;
        if task.assignee_id.as_ref() != Some(actor) {
            return Err(TaskError::Forbidden);
        }

        Self::step(&mut task, TaskStatus::InProgress, TaskStatus::Review)?;
        task.completion_attachments.extend(completion_attachments);
        self.persist(&task, None).await?;

        debug!("Task {} submitted for review", task.id);
        Ok(task)
    }

    /// review → done, lead only. Notes are optional on acceptance.
    pub async fn accept(
        &self,
        actor: &EntityId,
        task_id: &EntityId,
        notes: Option<String>,
    ) -> Result<Task, TaskError> {
        let mut task = self.require_task(task_id).await?;
        self.authorize_lead(actor, &task.project_id).await?;

        Self::step(&mut task, TaskStatus::Review, TaskStatus::Done)?;
        if let Some(notes) = notes {
            task.review_notes = Some(notes);
        }
        self.persist(&task, None).await?;

        info!("Task {} accepted", task.id);
        Ok(task)
    }

    /// review → in-progress, lead only. The rejection must say why.
    pub async fn reject(
        &self,
        actor: &EntityId,
        task_id: &EntityId,
        notes: String,
    ) -> Result<Task, TaskError> {
        let mut task = self.require_task(task_id).await?;
        self.authorize_lead(actor, &task.project_id).await?;

        Self::step(&mut task, TaskStatus::Review, TaskStatus::InProgress)?;
        if notes.trim().is_empty() {
            return Err(TaskError::BlankReviewNotes);
        }
        task.review_notes = Some(notes);
        self.persist(&task, None).await?;

        info!("Task {} rejected back to in-progress", task.id);
        Ok(task)
    }

    /// The completion shortcut: skips the status table and forces done from
    /// whatever state the task is in. Lead only.
    pub async fn mark_completed(
        &self,
        actor: &EntityId,
        task_id: &EntityId,
    ) -> Result<Task, TaskError> {
        let mut task = self.require_task(task_id).await?;
        self.authorize_lead(actor, &task.project_id).await?;

        task.status = TaskStatus::Done;
        task.updated_at = Utc::now();
        self.persist(&task, None).await?;

        info!("Task {} marked completed", task.id);
        Ok(task)
    }

    /// Tasks across every project in the caller's scope.
    pub async fn list_scoped_tasks(
        &self,
        actor: &EntityId,
        filter: &TaskFilter,
    ) -> Result<Vec<Task>, TaskError> {
        let scope = self.scope.resolve_lead_scope(actor).await?;
        Ok(self.tasks.list_in_projects(&scope.project_ids, filter).await?)
    }

    /// Move through one row of the status table. Each operation names its
    /// expected source state; review → in-progress and to-do → in-progress
    /// share a target but belong to different operations.
    fn step(task: &mut Task, from: TaskStatus, to: TaskStatus) -> Result<(), TaskError> {
        debug_assert!(transition_allowed(&from, &to));
        if task.status != from {
            return Err(TaskError::InvalidTransition {
                from: task.status.clone(),
                to,
            });
        }
        task.status = to;
        task.updated_at = Utc::now();
        Ok(())
    }

    /// Write the task back and recompute every sprint summary it touches,
    /// all inside one transaction.
    async fn persist(
        &self,
        task: &Task,
        previous_sprint: Option<&EntityId>,
    ) -> Result<(), TaskError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;
        self.tasks.save(&mut *tx, task).await?;
        if let Some(sprint_id) = &task.sprint_id {
            recompute_sprint_stats(&mut *tx, sprint_id).await?;
        }
        if let Some(old) = previous_sprint {
            if task.sprint_id.as_ref() != Some(old) {
                recompute_sprint_stats(&mut *tx, old).await?;
            }
        }
        tx.commit().await.map_err(StorageError::Sqlx)?;
        Ok(())
    }

    async fn authorize_lead(
        &self,
        actor: &EntityId,
        project_id: &EntityId,
    ) -> Result<(User, Project), TaskError> {
        let user = self.require_user(actor).await?;
        let project = self.require_project(project_id).await?;
        if !lead_has_authority(&user, &project) {
            return Err(TaskError::Forbidden);
        }
        Ok((user, project))
    }

    async fn require_task(&self, task_id: &EntityId) -> Result<Task, TaskError> {
        self.tasks
            .get_task(task_id)
            .await?
            .ok_or_else(|| TaskError::TaskNotFound(task_id.clone()))
    }

    async fn require_user(&self, user_id: &EntityId) -> Result<User, TaskError> {
        self.users
            .get_user(user_id)
            .await?
            .ok_or_else(|| TaskError::UserNotFound(user_id.clone()))
    }

    async fn require_project(&self, project_id: &EntityId) -> Result<Project, TaskError> {
        self.projects
            .get_project(project_id)
            .await?
            .ok_or_else(|| TaskError::ProjectNotFound(project_id.clone()))
    }

    async fn require_sprint(&self, sprint_id: &EntityId) -> Result<Sprint, TaskError> {
        self.sprints
            .get_sprint(sprint_id)
            .await?
            .ok_or_else(|| TaskError::SprintNotFound(sprint_id.clone()))
    }
}
