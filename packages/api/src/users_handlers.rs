// ABOUTME: HTTP request handlers for user operations
// ABOUTME: Thin CRUD over user storage plus the caller's own record

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
    Json,
};
use tracing::info;

use cadence_core::EntityId;
use cadence_users::{UserCreateInput, UserUpdateInput};

use crate::error::AppError;
use crate::identity::Identity;
use crate::response::ApiResponse;
use crate::state::DbState;

/// Get the record behind the caller's identity header
pub async fn get_current_user(
    State(db): State<DbState>,
    Identity(user_id): Identity,
) -> Result<impl IntoResponse, AppError> {
    let user = db
        .user_storage
        .get_user(&user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok((StatusCode::OK, ResponseJson(ApiResponse::success(user))))
}

pub async fn list_users(State(db): State<DbState>) -> Result<impl IntoResponse, AppError> {
    let users = db.user_storage.list_users().await?;
    Ok((StatusCode::OK, ResponseJson(ApiResponse::success(users))))
}

pub async fn create_user(
    State(db): State<DbState>,
    Json(input): Json<UserCreateInput>,
) -> Result<impl IntoResponse, AppError> {
    info!("Creating user: {}", input.name);

    let user = db.user_storage.create_user(input).await?;
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(user))))
}

pub async fn get_user(
    State(db): State<DbState>,
    Path(user_id): Path<EntityId>,
) -> Result<impl IntoResponse, AppError> {
    let user = db
        .user_storage
        .get_user(&user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok((StatusCode::OK, ResponseJson(ApiResponse::success(user))))
}

pub async fn update_user(
    State(db): State<DbState>,
    Path(user_id): Path<EntityId>,
    Json(input): Json<UserUpdateInput>,
) -> Result<impl IntoResponse, AppError> {
    info!("Updating user: {}", user_id);

    let user = db
        .user_storage
        .update_user(&user_id, input)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok((StatusCode::OK, ResponseJson(ApiResponse::success(user))))
}

pub async fn delete_user(
    State(db): State<DbState>,
    Path(user_id): Path<EntityId>,
) -> Result<impl IntoResponse, AppError> {
    info!("Deleting user: {}", user_id);

    if !db.user_storage.delete_user(&user_id).await? {
        return Err(AppError::NotFound);
    }

    Ok((
        StatusCode::OK,
        ResponseJson(ApiResponse::success(serde_json::json!({
            "message": "User deleted successfully"
        }))),
    ))
}
