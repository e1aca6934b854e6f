// ABOUTME: HTTP request handler for the caller's visibility scope
// ABOUTME: Returns the project and sprint ids the identified lead may touch

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
};

use crate::error::AppError;
use crate::identity::Identity;
use crate::response::ApiResponse;
use crate::state::DbState;

pub async fn get_scope(
    State(db): State<DbState>,
    Identity(user_id): Identity,
) -> Result<impl IntoResponse, AppError> {
    let scope = db.scope_resolver.resolve_lead_scope(&user_id).await?;

    Ok((StatusCode::OK, ResponseJson(ApiResponse::success(scope))))
}
