// ABOUTME: HTTP API layer for Cadence providing REST endpoints and routing
// ABOUTME: Integration layer that depends on all domain packages

use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub mod error;
pub mod health_handlers;
pub mod identity;
pub mod projects_handlers;
pub mod response;
pub mod scope_handlers;
pub mod sprints_handlers;
pub mod state;
pub mod tasks_handlers;
pub mod teams_handlers;
pub mod users_handlers;


pub use error::AppError;
pub use identity::{Identity, USER_ID_HEADER};
pub use response::ApiResponse;
pub use state::DbState;

/// Creates the users API router
pub fn create_users_router() -> Router<DbState> {
    Router::new()
        .route("/", get(users_handlers::list_users))
        .route("/", post(users_handlers::create_user))
        .route("/current", get(users_handlers::get_current_user))
        .route("/{id}", get(users_handlers::get_user))
        .route("/{id}", put(users_handlers::update_user))
        .route("/{id}", delete(users_handlers::delete_user))
}

/// Creates the teams API router
pub fn create_teams_router() -> Router<DbState> {
    Router::new()
        .route("/", get(teams_handlers::list_teams))
        .route("/", post(teams_handlers::create_team))
        .route("/{id}", get(teams_handlers::get_team))
        .route("/{id}", put(teams_handlers::update_team))
        .route("/{id}", delete(teams_handlers::delete_team))
        .route("/{id}/members", get(teams_handlers::list_members))
        .route("/{id}/members", post(teams_handlers::add_members))
        .route("/{id}/members/remove", post(teams_handlers::remove_members))
        .route("/{id}/projects", get(teams_handlers::list_team_projects))
        .route("/{id}/statistics", get(teams_handlers::team_statistics))
}

/// Creates the projects API router
pub fn create_projects_router() -> Router<DbState> {
    Router::new()
        .route("/", get(projects_handlers::list_projects))
        .route("/", post(projects_handlers::create_project))
        .route("/{id}", get(projects_handlers::get_project))
        .route("/{id}", put(projects_handlers::update_project))
        .route("/{id}", delete(projects_handlers::delete_project))
        .route("/{id}/progress", get(projects_handlers::project_progress))
        .route("/{id}/members", get(projects_handlers::list_project_members))
        .route("/{id}/members", post(projects_handlers::add_project_member))
        .route(
            "/{id}/members/remove",
            post(projects_handlers::remove_project_member),
        )
}

/// Creates the sprints API router
pub fn create_sprints_router() -> Router<DbState> {
    Router::new()
        .route("/", get(sprints_handlers::list_sprints))
        .route("/", post(sprints_handlers::create_sprint))
        .route("/{id}", get(sprints_handlers::get_sprint))
        .route("/{id}", put(sprints_handlers::update_sprint))
        .route("/{id}", delete(sprints_handlers::delete_sprint))
        .route("/{id}/tasks", get(sprints_handlers::list_sprint_tasks))
        .route(
            "/{id}/recompute-stats",
            post(sprints_handlers::recompute_sprint_stats),
        )
}

/// Creates the tasks API router
pub fn create_tasks_router() -> Router<DbState> {
    Router::new()
        .route("/", get(tasks_handlers::list_tasks))
        .route("/", post(tasks_handlers::create_task))
        .route("/{id}", get(tasks_handlers::get_task))
        .route("/{id}", put(tasks_handlers::update_task))
        .route("/{id}", delete(tasks_handlers::delete_task))
        .route("/{id}/read", post(tasks_handlers::mark_task_read))
        .route("/{id}/review", post(tasks_handlers::submit_task_for_review))
        .route("/{id}/accept", post(tasks_handlers::accept_task))
        .route("/{id}/reject", post(tasks_handlers::reject_task))
        .route("/{id}/complete", post(tasks_handlers::complete_task))
}

/// Creates the scope API router
pub fn create_scope_router() -> Router<DbState> {
    Router::new().route("/", get(scope_handlers::get_scope))
}

/// Assembles the full API surface over a shared database state
pub fn create_router(state: DbState) -> Router {
    Router::new()
        .route("/api/health", get(health_handlers::health_check))
        .nest("/api/users", create_users_router())
        .nest("/api/teams", create_teams_router())
        .nest("/api/projects", create_projects_router())
        .nest("/api/sprints", create_sprints_router())
        .nest("/api/tasks", create_tasks_router())
        .nest("/api/scope", create_scope_router())
        .with_state(state)
}
