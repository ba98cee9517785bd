//! Default account seeding.

use clap::Args;

use blogdesk_core::config::AppConfig;
use blogdesk_core::error::AppError;

use super::user::UserRow;
use crate::output::{self, OutputFormat};

/// Arguments for the seed command
#[derive(Debug, Args)]
pub struct SeedArgs {
    /// Password for the seeded accounts; defaults to `auth.seed_password`
    #[arg(long)]
    pub password: Option<String>,
}

/// Execute the seed command
pub async fn execute(args: &SeedArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let service = super::credential_service(config).await?;
    let password = args
        .password
        .clone()
        .unwrap_or_else(|| config.auth.seed_password.clone());

    let created = service.seed_default_accounts(&password).await?;
    if created.is_empty() {
        output::print_success("Default accounts already present.");
        return Ok(());
    }

    let rows: Vec<UserRow> = created.into_iter().map(UserRow::from).collect();
    output::print_list(&rows, format);
    output::print_success(&format!("Seeded {} account(s).", rows.len()));
    Ok(())
}
