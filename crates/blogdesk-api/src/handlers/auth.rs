//! Auth handlers: register, login, me.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use blogdesk_auth::Registration;

use crate::dto::request::{LoginRequest, RegisterRequest};
use crate::dto::response::{ApiResponse, AuthResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::{CurrentPrincipal, ValidatedJson};
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), ApiError> {
    let session = state
        .credentials
        .register(Registration {
            username: req.username,
            email: req.email,
            password: req.password,
            role: None,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(session.into()))))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    let session = state
        .credentials
        .login(&req.username_or_email, &req.password)
        .await?;

    Ok(Json(ApiResponse::ok(session.into())))
}

/// GET /api/auth/me
pub async fn me(CurrentPrincipal(principal): CurrentPrincipal) -> Json<ApiResponse<UserResponse>> {
    Json(ApiResponse::ok(principal.into()))
}
