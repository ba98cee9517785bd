//! Principal extractors.
//!
//! Route guards put the admitted principal into request extensions; these
//! extractors read it back in handlers.

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};

use blogdesk_auth::AuthError;
use blogdesk_entity::user::Principal;

use crate::error::ApiError;
use crate::state::AppState;

/// Bearer token from the `Authorization` header, if one is present and well-formed.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().to_string())
}

/// The principal admitted by a protected route's guard.
#[derive(Debug, Clone)]
pub struct CurrentPrincipal(pub Principal);

impl std::ops::Deref for CurrentPrincipal {
    type Target = Principal;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for CurrentPrincipal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentPrincipal>()
            .cloned()
            .ok_or_else(|| AuthError::Unauthenticated.into())
    }
}

/// The caller's principal on a public route, when a valid token was presented.
#[derive(Debug, Clone, Default)]
pub struct MaybePrincipal(pub Option<Principal>);

impl FromRequestParts<AppState> for MaybePrincipal {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(found) = parts.extensions.get::<MaybePrincipal>() {
            return Ok(found.clone());
        }
        if let Some(CurrentPrincipal(principal)) = parts.extensions.get::<CurrentPrincipal>() {
            return Ok(Self(Some(principal.clone())));
        }

        let token = bearer_token(&parts.headers);
        let principal = state
            .pipeline
            .resolver()
            .resolve_optional(token.as_deref())
            .await;
        Ok(Self(principal))
    }
}
