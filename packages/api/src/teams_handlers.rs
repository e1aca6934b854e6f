// ABOUTME: HTTP request handlers for team operations
// ABOUTME: Team CRUD, lead-driven roster changes, and the dashboard numbers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
    Json,
};
use serde::Deserialize;
use tracing::info;

use cadence_core::EntityId;
use cadence_teams::{TeamCreateInput, TeamUpdateInput};

use crate::error::AppError;
use crate::identity::Identity;
use crate::response::ApiResponse;
use crate::state::DbState;

pub async fn create_team(
    State(db): State<DbState>,
    Json(input): Json<TeamCreateInput>,
) -> Result<impl IntoResponse, AppError> {
    info!("Creating team: {}", input.name);

    let team = db.team_storage.create_team(input).await?;
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(team))))
}

pub async fn list_teams(State(db): State<DbState>) -> Result<impl IntoResponse, AppError> {
    let teams = db.team_storage.list_teams().await?;
    Ok((StatusCode::OK, ResponseJson(ApiResponse::success(teams))))
}

pub async fn get_team(
    State(db): State<DbState>,
    Path(team_id): Path<EntityId>,
) -> Result<impl IntoResponse, AppError> {
    let team = db
        .team_storage
        .get_team(&team_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok((StatusCode::OK, ResponseJson(ApiResponse::success(team))))
}

pub async fn update_team(
    State(db): State<DbState>,
    Path(team_id): Path<EntityId>,
    Json(input): Json<TeamUpdateInput>,
) -> Result<impl IntoResponse, AppError> {
    info!("Updating team: {}", team_id);

    let team = db
        .team_storage
        .update_team(&team_id, input)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok((StatusCode::OK, ResponseJson(ApiResponse::success(team))))
}

pub async fn delete_team(
    State(db): State<DbState>,
    Path(team_id): Path<EntityId>,
) -> Result<impl IntoResponse, AppError> {
    info!("Deleting team: {}", team_id);

    if !db.team_storage.delete_team(&team_id).await? {
        return Err(AppError::NotFound);
    }

    Ok((
        StatusCode::OK,
        ResponseJson(ApiResponse::success(serde_json::json!({
            "message": "Team deleted successfully"
        }))),
    ))
}

pub async fn list_members(
    State(db): State<DbState>,
    Path(team_id): Path<EntityId>,
) -> Result<impl IntoResponse, AppError> {
    let members = db.membership_manager.list_members(&team_id).await?;
    Ok((StatusCode::OK, ResponseJson(ApiResponse::success(members))))
}

/// Request body for roster changes. Candidate ids arrive as raw strings and
/// are sanitized by the membership manager, not here.
#[derive(Deserialize)]
pub struct MemberIdsRequest {
    pub user_ids: Vec<String>,
}

pub async fn add_members(
    State(db): State<DbState>,
    Identity(acting_lead): Identity,
    Path(team_id): Path<EntityId>,
    Json(request): Json<MemberIdsRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!(
        "Adding {} candidate(s) to team {}",
        request.user_ids.len(),
        team_id
    );

    let members = db
        .membership_manager
        .add_members(&team_id, &acting_lead, &request.user_ids)
        .await?;

    Ok((StatusCode::OK, ResponseJson(ApiResponse::success(members))))
}

pub async fn remove_members(
    State(db): State<DbState>,
    Identity(acting_lead): Identity,
    Path(team_id): Path<EntityId>,
    Json(request): Json<MemberIdsRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!(
        "Removing {} member(s) from team {}",
        request.user_ids.len(),
        team_id
    );

    let members = db
        .membership_manager
        .remove_members(&team_id, &acting_lead, &request.user_ids)
        .await?;

    Ok((StatusCode::OK, ResponseJson(ApiResponse::success(members))))
}

pub async fn list_team_projects(
    State(db): State<DbState>,
    Path(team_id): Path<EntityId>,
) -> Result<impl IntoResponse, AppError> {
    db.team_storage
        .get_team(&team_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let projects = db.project_storage.list_for_team(&team_id).await?;

    Ok((StatusCode::OK, ResponseJson(ApiResponse::success(projects))))
}

/// Dashboard statistics. Degrades to zeroed numbers rather than failing.
pub async fn team_statistics(
    State(db): State<DbState>,
    Path(team_id): Path<EntityId>,
) -> Result<impl IntoResponse, AppError> {
    let stats = db
        .stats_engine
        .compute_team_statistics(Some(&team_id))
        .await;

    Ok((StatusCode::OK, ResponseJson(ApiResponse::success(stats))))
}
