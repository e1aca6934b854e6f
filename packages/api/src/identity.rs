// ABOUTME: Caller identity extracted from the x-user-id request header
// ABOUTME: The upstream credential service sets it; it is trusted as-is

use axum::{extract::FromRequestParts, http::request::Parts};

use cadence_core::EntityId;

use crate::error::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The acting user on a request. Handlers pass this into the engines
/// explicitly; nothing downstream reads ambient request state.
#[derive(Debug, Clone)]
pub struct Identity(pub EntityId);

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Validation(format!("missing {} header", USER_ID_HEADER)))?;

        let id = EntityId::parse(raw)
            .map_err(|_| AppError::Validation(format!("malformed {} header", USER_ID_HEADER)))?;

        Ok(Identity(id))
    }
}
