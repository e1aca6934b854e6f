// ABOUTME: HTTP request handlers for project operations
// ABOUTME: Lead-scoped listing, CRUD, team moves, and the member subset

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
    Json,
};
use serde::Deserialize;
use tracing::info;

use cadence_core::EntityId;
use cadence_projects::{ProjectCreateInput, ProjectFilter, ProjectUpdateInput};

use crate::error::AppError;
use crate::identity::Identity;
use crate::response::ApiResponse;
use crate::state::DbState;

pub async fn create_project(
    State(db): State<DbState>,
    Json(input): Json<ProjectCreateInput>,
) -> Result<impl IntoResponse, AppError> {
    info!("Creating project: {}", input.name);

    let project = db.project_storage.create_project(input).await?;
    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success(project)),
    ))
}

/// Projects the caller owns or that belong to their team
pub async fn list_projects(
    State(db): State<DbState>,
    Identity(user_id): Identity,
    Query(filter): Query<ProjectFilter>,
) -> Result<impl IntoResponse, AppError> {
    let projects = db
        .scope_resolver
        .list_scoped_projects(&user_id, &filter)
        .await?;

    Ok((StatusCode::OK, ResponseJson(ApiResponse::success(projects))))
}

pub async fn get_project(
    State(db): State<DbState>,
    Path(project_id): Path<EntityId>,
) -> Result<impl IntoResponse, AppError> {
    let project = db
        .project_storage
        .get_project(&project_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok((StatusCode::OK, ResponseJson(ApiResponse::success(project))))
}

/// Request body for project updates. A `team_id` here moves the project to
/// that team in a single write; absent means the team stays untouched.
#[derive(Deserialize)]
pub struct ProjectUpdateRequest {
    #[serde(flatten)]
    pub fields: ProjectUpdateInput,
    pub team_id: Option<EntityId>,
}

pub async fn update_project(
    State(db): State<DbState>,
    Path(project_id): Path<EntityId>,
    Json(request): Json<ProjectUpdateRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!("Updating project: {}", project_id);

    if let Some(team_id) = &request.team_id {
        db.team_storage
            .get_team(team_id)
            .await?
            .ok_or(AppError::NotFound)?;
        db.project_storage
            .move_to_team(&project_id, Some(team_id))
            .await?
            .ok_or(AppError::NotFound)?;
    }

    let project = db
        .project_storage
        .update_project(&project_id, request.fields)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok((StatusCode::OK, ResponseJson(ApiResponse::success(project))))
}

pub async fn delete_project(
    State(db): State<DbState>,
    Path(project_id): Path<EntityId>,
) -> Result<impl IntoResponse, AppError> {
    info!("Deleting project: {}", project_id);

    if !db.project_storage.delete_project(&project_id).await? {
        return Err(AppError::NotFound);
    }

    Ok((
        StatusCode::OK,
        ResponseJson(ApiResponse::success(serde_json::json!({
            "message": "Project deleted successfully"
        }))),
    ))
}

/// Percent complete: the stored override when set, else derived from tasks
pub async fn project_progress(
    State(db): State<DbState>,
    Path(project_id): Path<EntityId>,
) -> Result<impl IntoResponse, AppError> {
    let project = db
        .project_storage
        .get_project(&project_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let progress = db.stats_engine.project_progress(&project).await?;

    Ok((
        StatusCode::OK,
        ResponseJson(ApiResponse::success(serde_json::json!({
            "progress": progress
        }))),
    ))
}

pub async fn list_project_members(
    State(db): State<DbState>,
    Path(project_id): Path<EntityId>,
) -> Result<impl IntoResponse, AppError> {
    db.project_storage
        .get_project(&project_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let members = db.project_storage.list_project_members(&project_id).await?;

    Ok((StatusCode::OK, ResponseJson(ApiResponse::success(members))))
}

#[derive(Deserialize)]
pub struct ProjectMemberRequest {
    pub user_id: EntityId,
}

pub async fn add_project_member(
    State(db): State<DbState>,
    Path(project_id): Path<EntityId>,
    Json(request): Json<ProjectMemberRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!("Adding {} to project {}", request.user_id, project_id);

    db.project_storage
        .get_project(&project_id)
        .await?
        .ok_or(AppError::NotFound)?;
    db.user_storage
        .get_user(&request.user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    db.project_storage
        .add_project_member(&project_id, &request.user_id)
        .await?;
    let members = db.project_storage.list_project_members(&project_id).await?;

    Ok((StatusCode::OK, ResponseJson(ApiResponse::success(members))))
}

pub async fn remove_project_member(
    State(db): State<DbState>,
    Path(project_id): Path<EntityId>,
    Json(request): Json<ProjectMemberRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!("Removing {} from project {}", request.user_id, project_id);

    db.project_storage
        .remove_project_member(&project_id, &request.user_id)
        .await?;
    let members = db.project_storage.list_project_members(&project_id).await?;

    Ok((StatusCode::OK, ResponseJson(ApiResponse::success(members))))
}
