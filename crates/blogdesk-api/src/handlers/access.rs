//! Role-gated probe routes.
//!
//! The guards in the router do all the checking; these handlers only run
//! for admitted callers.

use axum::Json;

use crate::dto::response::{AccessResponse, ApiResponse};
use crate::extractors::{CurrentPrincipal, MaybePrincipal};

/// GET /api/access/editorial (admin or editor)
pub async fn editorial(CurrentPrincipal(principal): CurrentPrincipal) -> Json<ApiResponse<AccessResponse>> {
    Json(ApiResponse::ok(AccessResponse {
        message: "Editorial access granted".to_string(),
        user: Some(principal.into()),
    }))
}

/// GET /api/access/admin (admin only)
pub async fn admin(CurrentPrincipal(principal): CurrentPrincipal) -> Json<ApiResponse<AccessResponse>> {
    Json(ApiResponse::ok(AccessResponse {
        message: "Admin access granted".to_string(),
        user: Some(principal.into()),
    }))
}

/// GET /api/access/public
pub async fn public(MaybePrincipal(principal): MaybePrincipal) -> Json<ApiResponse<AccessResponse>> {
    Json(ApiResponse::ok(AccessResponse {
        message: "Public content".to_string(),
        user: principal.map(Into::into),
    }))
}
