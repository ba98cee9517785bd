//! Principal lookup handlers.

use axum::Json;
use axum::extract::{Path, State};

use blogdesk_core::error::AppError;

use crate::dto::response::{ApiResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::{CurrentPrincipal, parse_uuid};
use crate::state::AppState;

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    CurrentPrincipal(caller): CurrentPrincipal,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let id = parse_uuid(&id)?;
    tracing::debug!(caller = %caller.id, target_id = %id, "Looking up principal");

    let principal = state
        .credentials
        .find(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;

    Ok(Json(ApiResponse::ok(principal.into())))
}
