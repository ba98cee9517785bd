//! Route definitions for the BlogDesk HTTP API.
//!
//! All routes are mounted under `/api`. Each route group declares its role
//! requirement through [`protect`]; handlers never check roles themselves.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use blogdesk_auth::RoleSet;
use blogdesk_entity::user::Role;

use crate::handlers;
use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::middleware::protect;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(health_routes())
        .merge(auth_routes(&state))
        .merge(user_routes(&state))
        .merge(access_routes(&state));

    let cors = build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(request_logging))
        .with_state(state)
}

/// Liveness
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Register, login, me
fn auth_routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login));

    let authenticated = Router::new().route("/auth/me", get(handlers::auth::me));

    public.merge(protect(authenticated, state, RoleSet::any_role()))
}

/// Principal lookup, any authenticated caller
fn user_routes(state: &AppState) -> Router<AppState> {
    protect(
        Router::new().route("/users/{id}", get(handlers::user::get_user)),
        state,
        RoleSet::any_role(),
    )
}

/// Role-gated probes
fn access_routes(state: &AppState) -> Router<AppState> {
    let editorial = protect(
        Router::new().route("/access/editorial", get(handlers::access::editorial)),
        state,
        RoleSet::of(&[Role::Admin, Role::Editor]),
    );
    let admin = protect(
        Router::new().route("/access/admin", get(handlers::access::admin)),
        state,
        RoleSet::of(&[Role::Admin]),
    );
    let public = protect(
        Router::new().route("/access/public", get(handlers::access::public)),
        state,
        RoleSet::public(),
    );

    editorial.merge(admin).merge(public)
}
