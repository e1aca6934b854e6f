// ABOUTME: HTTP request handlers for task operations
// ABOUTME: Every mutation runs through the lifecycle engine under the caller's identity

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
    Json,
};
use serde::Deserialize;
use tracing::info;

use cadence_core::EntityId;
use cadence_tasks::{TaskCreateInput, TaskFilter, TaskUpdateInput};

use crate::error::AppError;
use crate::identity::Identity;
use crate::response::ApiResponse;
use crate::state::DbState;

pub async fn create_task(
    State(db): State<DbState>,
    Identity(user_id): Identity,
    Json(input): Json<TaskCreateInput>,
) -> Result<impl IntoResponse, AppError> {
    info!("Creating task: {}", input.title);

    let task = db.task_engine.create_task(&user_id, input).await?;
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(task))))
}

/// Tasks across every project the caller can reach
pub async fn list_tasks(
    State(db): State<DbState>,
    Identity(user_id): Identity,
    Query(filter): Query<TaskFilter>,
) -> Result<impl IntoResponse, AppError> {
    let tasks = db.task_engine.list_scoped_tasks(&user_id, &filter).await?;

    Ok((StatusCode::OK, ResponseJson(ApiResponse::success(tasks))))
}

pub async fn get_task(
    State(db): State<DbState>,
    Path(task_id): Path<EntityId>,
) -> Result<impl IntoResponse, AppError> {
    let task = db
        .task_storage
        .get_task(&task_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok((StatusCode::OK, ResponseJson(ApiResponse::success(task))))
}

pub async fn update_task(
    State(db): State<DbState>,
    Identity(user_id): Identity,
    Path(task_id): Path<EntityId>,
    Json(input): Json<TaskUpdateInput>,
) -> Result<impl IntoResponse, AppError> {
    info!("Updating task: {}", task_id);

    let task = db.task_engine.update_task(&user_id, &task_id, input).await?;
    Ok((StatusCode::OK, ResponseJson(ApiResponse::success(task))))
}

pub async fn delete_task(
    State(db): State<DbState>,
    Identity(user_id): Identity,
    Path(task_id): Path<EntityId>,
) -> Result<impl IntoResponse, AppError> {
    info!("Deleting task: {}", task_id);

    db.task_engine.delete_task(&user_id, &task_id).await?;
    Ok((
        StatusCode::OK,
        ResponseJson(ApiResponse::success(serde_json::json!({
            "message": "Task deleted successfully"
        }))),
    ))
}

/// Assignee acknowledges the task and starts work
pub async fn mark_task_read(
    State(db): State<DbState>,
    Identity(user_id): Identity,
    Path(task_id): Path<EntityId>,
) -> Result<impl IntoResponse, AppError> {
    info!("Marking task read: {}", task_id);

    let task = db.task_engine.mark_read(&user_id, &task_id).await?;
    Ok((StatusCode::OK, ResponseJson(ApiResponse::success(task))))
}

#[derive(Deserialize)]
pub struct ReviewRequest {
    /// Evidence files handed over with the submission
    #[serde(default)]
    pub completion_attachments: Vec<String>,
}

pub async fn submit_task_for_review(
    State(db): State<DbState>,
    Identity(user_id): Identity,
    Path(task_id): Path<EntityId>,
    Json(request): Json<ReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!("Submitting task for review: {}", task_id);

    let task = db
        .task_engine
        .move_to_review(&user_id, &task_id, request.completion_attachments)
        .await?;
    Ok((StatusCode::OK, ResponseJson(ApiResponse::success(task))))
}

#[derive(Deserialize)]
pub struct AcceptRequest {
    pub notes: Option<String>,
}

pub async fn accept_task(
    State(db): State<DbState>,
    Identity(user_id): Identity,
    Path(task_id): Path<EntityId>,
    Json(request): Json<AcceptRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!("Accepting task: {}", task_id);

    let task = db
        .task_engine
        .accept(&user_id, &task_id, request.notes)
        .await?;
    Ok((StatusCode::OK, ResponseJson(ApiResponse::success(task))))
}

#[derive(Deserialize)]
pub struct RejectRequest {
    pub notes: String,
}

pub async fn reject_task(
    State(db): State<DbState>,
    Identity(user_id): Identity,
    Path(task_id): Path<EntityId>,
    Json(request): Json<RejectRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!("Rejecting task: {}", task_id);

    let task = db
        .task_engine
        .reject(&user_id, &task_id, request.notes)
        .await?;
    Ok((StatusCode::OK, ResponseJson(ApiResponse::success(task))))
}

/// Lead shortcut that closes the task from any state
pub async fn complete_task(
    State(db): State<DbState>,
    Identity(user_id): Identity,
    Path(task_id): Path<EntityId>,
) -> Result<impl IntoResponse, AppError> {
    info!("Completing task: {}", task_id);

    let task = db.task_engine.mark_completed(&user_id, &task_id).await?;
    Ok((StatusCode::OK, ResponseJson(ApiResponse::success(task))))
}
