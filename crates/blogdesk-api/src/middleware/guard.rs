//! Role guard: runs the access pipeline before a route's handler.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;

use blogdesk_auth::{AccessPipeline, Admission, RoleSet};

use crate::error::ApiError;
use crate::extractors::auth::{CurrentPrincipal, MaybePrincipal, bearer_token};
use crate::state::AppState;

#[derive(Clone)]
struct Guard {
    pipeline: Arc<AccessPipeline>,
    required: RoleSet,
}

/// Protect every route in `routes` with the role requirement `required`.
///
/// Authentication and authorization failures are answered here; the
/// handler only runs once the pipeline has admitted the request, and it
/// finds the principal in [`CurrentPrincipal`] (or [`MaybePrincipal`] for
/// public routes).
pub fn protect(routes: Router<AppState>, state: &AppState, required: RoleSet) -> Router<AppState> {
    let guard = Guard {
        pipeline: Arc::clone(&state.pipeline),
        required,
    };
    routes.route_layer(middleware::from_fn_with_state(guard, admit))
}

async fn admit(
    State(guard): State<Guard>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers());
    let admission = guard.pipeline.admit(token.as_deref(), guard.required).await?;

    match admission {
        Admission::Authorized(principal) => {
            request.extensions_mut().insert(CurrentPrincipal(principal));
        }
        Admission::Public(principal) => {
            request.extensions_mut().insert(MaybePrincipal(principal));
        }
    }

    Ok(next.run(request).await)
}
