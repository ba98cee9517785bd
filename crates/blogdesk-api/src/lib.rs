//! # blogdesk-api
//!
//! HTTP API layer for BlogDesk built on Axum.
//!
//! Provides the auth endpoints, role-gated routes wired through the access
//! pipeline, extractors for the resolved principal, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use state::AppState;
