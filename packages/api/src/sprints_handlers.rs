// ABOUTME: HTTP request handlers for sprint operations
// ABOUTME: CRUD plus the sprint board and on-demand summary recompute

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
    Json,
};
use tracing::info;

use cadence_core::EntityId;
use cadence_sprints::{SprintCreateInput, SprintFilter, SprintUpdateInput};

use crate::error::AppError;
use crate::identity::Identity;
use crate::response::ApiResponse;
use crate::state::DbState;

pub async fn create_sprint(
    State(db): State<DbState>,
    Json(input): Json<SprintCreateInput>,
) -> Result<impl IntoResponse, AppError> {
    info!("Creating sprint: {}", input.name);

    if input.end_date <= input.start_date {
        return Err(AppError::Validation(
            "sprint end date must fall after its start date".to_string(),
        ));
    }
    db.project_storage
        .get_project(&input.project_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let sprint = db.sprint_storage.create_sprint(input).await?;
    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success(sprint)),
    ))
}

/// Sprints of the projects the caller can reach
pub async fn list_sprints(
    State(db): State<DbState>,
    Identity(user_id): Identity,
    Query(filter): Query<SprintFilter>,
) -> Result<impl IntoResponse, AppError> {
    let sprints = db
        .scope_resolver
        .list_scoped_sprints(&user_id, &filter)
        .await?;

    Ok((StatusCode::OK, ResponseJson(ApiResponse::success(sprints))))
}

pub async fn get_sprint(
    State(db): State<DbState>,
    Path(sprint_id): Path<EntityId>,
) -> Result<impl IntoResponse, AppError> {
    let sprint = db
        .sprint_storage
        .get_sprint(&sprint_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok((StatusCode::OK, ResponseJson(ApiResponse::success(sprint))))
}

pub async fn update_sprint(
    State(db): State<DbState>,
    Path(sprint_id): Path<EntityId>,
    Json(input): Json<SprintUpdateInput>,
) -> Result<impl IntoResponse, AppError> {
    info!("Updating sprint: {}", sprint_id);

    // Date edits are checked against the merged window, not in isolation.
    let current = db
        .sprint_storage
        .get_sprint(&sprint_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let start = input.start_date.unwrap_or(current.start_date);
    let end = input.end_date.unwrap_or(current.end_date);
    if end <= start {
        return Err(AppError::Validation(
            "sprint end date must fall after its start date".to_string(),
        ));
    }

    let sprint = db
        .sprint_storage
        .update_sprint(&sprint_id, input)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok((StatusCode::OK, ResponseJson(ApiResponse::success(sprint))))
}

pub async fn delete_sprint(
    State(db): State<DbState>,
    Path(sprint_id): Path<EntityId>,
) -> Result<impl IntoResponse, AppError> {
    info!("Deleting sprint: {}", sprint_id);

    if !db.sprint_storage.delete_sprint(&sprint_id).await? {
        return Err(AppError::NotFound);
    }

    Ok((
        StatusCode::OK,
        ResponseJson(ApiResponse::success(serde_json::json!({
            "message": "Sprint deleted successfully"
        }))),
    ))
}

/// Board view: every task currently placed in the sprint
pub async fn list_sprint_tasks(
    State(db): State<DbState>,
    Path(sprint_id): Path<EntityId>,
) -> Result<impl IntoResponse, AppError> {
    db.sprint_storage
        .get_sprint(&sprint_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let tasks = db.task_storage.list_for_sprint(&sprint_id).await?;

    Ok((StatusCode::OK, ResponseJson(ApiResponse::success(tasks))))
}

/// Rebuilds the persisted summary from the tasks table. Task writes keep the
/// summary current on their own; this exists for repair after manual edits.
pub async fn recompute_sprint_stats(
    State(db): State<DbState>,
    Path(sprint_id): Path<EntityId>,
) -> Result<impl IntoResponse, AppError> {
    info!("Recomputing stats for sprint: {}", sprint_id);

    if !db.sprint_storage.recompute_stats(&sprint_id).await? {
        return Err(AppError::NotFound);
    }
    let sprint = db
        .sprint_storage
        .get_sprint(&sprint_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok((StatusCode::OK, ResponseJson(ApiResponse::success(sprint))))
}
