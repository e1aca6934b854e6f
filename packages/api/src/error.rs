// ABOUTME: Application error type returned by every API handler
// ABOUTME: Maps domain errors onto HTTP statuses and machine-readable codes

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use cadence_scope::ScopeError;
use cadence_storage::StorageError;
use cadence_tasks::TaskError;
use cadence_teams::MembershipError;

/// Main application error type that all handlers return
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("The requested resource was not found")]
    NotFound,

    #[error(transparent)]
    Scope(#[from] ScopeError),

    #[error(transparent)]
    Membership(#[from] MembershipError),

    #[error(transparent)]
    Task(#[from] TaskError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Structured error response format for API consistency
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: ErrorDetail,
    request_id: String,
}

/// Error detail structure with machine-readable codes
#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl AppError {
    /// Convert AppError to appropriate HTTP status code and error code
    fn to_status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT"),
            AppError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Scope(err) => match err {
                ScopeError::UserNotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                ScopeError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            },
            AppError::Membership(err) => match err {
                MembershipError::TeamNotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                MembershipError::NotTeamLead => (StatusCode::FORBIDDEN, "FORBIDDEN"),
                MembershipError::NoValidCandidates => {
                    (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT")
                }
                MembershipError::Storage(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR")
                }
            },
            AppError::Task(err) => match err {
                TaskError::TaskNotFound(_)
                | TaskError::ProjectNotFound(_)
                | TaskError::SprintNotFound(_)
                | TaskError::UserNotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                TaskError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
                TaskError::InvalidTransition { .. } => (StatusCode::CONFLICT, "INVALID_STATE"),
                TaskError::BlankReviewNotes | TaskError::AssigneeNotOnLeadTeam { .. } => {
                    (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT")
                }
                TaskError::SprintProjectMismatch { .. } => (StatusCode::CONFLICT, "CONFLICT"),
                TaskError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            },
            AppError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
        }
    }

    /// Storage failures carry internal detail that must not reach clients
    fn is_internal(&self) -> bool {
        matches!(
            self,
            AppError::Storage(_)
                | AppError::Scope(ScopeError::Storage(_))
                | AppError::Membership(MembershipError::Storage(_))
                | AppError::Task(TaskError::Storage(_))
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let request_id = Uuid::new_v4().to_string();
        let (status_code, error_code) = self.to_status_and_code();

        let message = if self.is_internal() {
            error!(
                request_id = %request_id,
                error = %self,
                "Storage failure while handling request"
            );
            "Data storage error".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            success: false,
            error: ErrorDetail {
                code: error_code.to_string(),
                message,
            },
            request_id,
        };

        (status_code, Json(body)).into_response()
    }
}
