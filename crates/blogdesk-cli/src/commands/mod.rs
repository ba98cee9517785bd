//! CLI command definitions and dispatch.

pub mod migrate;
pub mod seed;
pub mod serve;
pub mod user;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use blogdesk_auth::{CredentialService, PasswordPolicy, TokenIssuer, TracingAuditSink};
use blogdesk_core::config::{AppConfig, StoreBackend};
use blogdesk_core::error::AppError;
use blogdesk_database::{CredentialStore, open_store};

use crate::output::OutputFormat;

/// BlogDesk: content API with token authentication and role-based access
#[derive(Debug, Parser)]
#[command(name = "blogdesk", version, about, long_about = None)]
pub struct Cli {
    /// Base configuration file, extension optional
    #[arg(short, long, default_value = "config/default")]
    pub config: String,

    /// Environment overlay loaded from `config/{env}.toml`
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the BlogDesk server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// User management
    User(user::UserArgs),
    /// Create the default admin and editor accounts
    Seed(seed::SeedArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = self.load_config()?;
        match &self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Migrate(args) => migrate::execute(args, &config).await,
            Commands::User(args) => user::execute(args, &config, self.format).await,
            Commands::Seed(args) => seed::execute(args, &config, self.format).await,
        }
    }

    fn load_config(&self) -> Result<AppConfig, AppError> {
        AppConfig::load_from(&self.config, &self.env)
    }
}

/// Helper: open the configured credential store
pub async fn open_credential_store(config: &AppConfig) -> Result<Arc<dyn CredentialStore>, AppError> {
    open_store(&config.database).await
}

/// Helper: build the credential service over the configured store
///
/// Refuses the memory backend: changes made by a one-shot command would be
/// discarded when the process exits.
pub async fn credential_service(config: &AppConfig) -> Result<CredentialService, AppError> {
    require_persistent_store(config)?;
    let store = open_credential_store(config).await?;
    let issuer = Arc::new(TokenIssuer::new(&config.auth)?);
    Ok(CredentialService::new(
        store,
        issuer,
        PasswordPolicy::new(&config.auth),
        Arc::new(TracingAuditSink),
    ))
}

fn require_persistent_store(config: &AppConfig) -> Result<(), AppError> {
    if config.database.backend == StoreBackend::Memory {
        return Err(AppError::configuration(
            "Account commands need a persistent store; the memory backend discards \
             changes on exit. Select database.backend = \"postgres\" or another --env",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogdesk_core::error::ErrorKind;

    #[test]
    fn test_memory_backend_refused_for_account_commands() {
        let mut config = AppConfig::default();
        config.database.backend = StoreBackend::Memory;
        let err = require_persistent_store(&config).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_postgres_backend_accepted() {
        let mut config = AppConfig::default();
        config.database.backend = StoreBackend::Postgres;
        assert!(require_persistent_store(&config).is_ok());
    }

    #[tokio::test]
    async fn test_credential_service_rejects_memory_backend() {
        let mut config = AppConfig::default();
        config.database.backend = StoreBackend::Memory;
        config.auth.jwt_secret = Some("secret".to_string());
        let err = credential_service(&config).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
