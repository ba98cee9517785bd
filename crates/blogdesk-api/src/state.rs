//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use blogdesk_auth::{
    AccessPipeline, AuthAuditSink, CredentialService, PasswordPolicy, PrincipalResolver,
    TokenIssuer, TokenVerifier,
};
use blogdesk_core::config::AppConfig;
use blogdesk_core::result::AppResult;
use blogdesk_database::CredentialStore;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Credential store
    pub store: Arc<dyn CredentialStore>,
    /// Registration, login and credential administration
    pub credentials: Arc<CredentialService>,
    /// Authentication and authorization for protected routes
    pub pipeline: Arc<AccessPipeline>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("credentials", &self.credentials)
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Wire the auth components over `store`.
    ///
    /// Fails when the signing secret or token lifetime in `config` is unusable.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn CredentialStore>,
        audit: Arc<dyn AuthAuditSink>,
    ) -> AppResult<Self> {
        let issuer = Arc::new(TokenIssuer::new(&config.auth)?);
        let verifier = Arc::new(TokenVerifier::new(&config.auth)?);

        let resolver = PrincipalResolver::new(verifier, Arc::clone(&store), Arc::clone(&audit));
        let pipeline = AccessPipeline::new(resolver, Arc::clone(&audit));
        let credentials = CredentialService::new(
            Arc::clone(&store),
            issuer,
            PasswordPolicy::new(&config.auth),
            audit,
        );

        Ok(Self {
            config: Arc::new(config),
            store,
            credentials: Arc::new(credentials),
            pipeline: Arc::new(pipeline),
        })
    }
}
