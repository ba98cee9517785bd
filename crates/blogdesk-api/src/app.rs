//! Application builder: wires state and router into an Axum app and serves it.

use std::sync::Arc;

use axum::Router;

use blogdesk_auth::{AuthAuditSink, TracingAuditSink};
use blogdesk_core::config::AppConfig;
use blogdesk_core::error::AppError;
use blogdesk_database::CredentialStore;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Runs the BlogDesk server until Ctrl+C or SIGTERM.
///
/// Seeds the default accounts first when `auth.seed_default_accounts` is set.
pub async fn run_server(config: AppConfig, store: Arc<dyn CredentialStore>) -> Result<(), AppError> {
    tracing::info!("Starting BlogDesk server...");

    let audit: Arc<dyn AuthAuditSink> = Arc::new(TracingAuditSink);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let seed = config
        .auth
        .seed_default_accounts
        .then(|| config.auth.seed_password.clone());

    let state = AppState::new(config, store, audit)?;

    if let Some(password) = seed {
        let created = state.credentials.seed_default_accounts(&password).await?;
        tracing::info!(created = created.len(), "Default accounts seeded");
    }

    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("BlogDesk server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("BlogDesk server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
