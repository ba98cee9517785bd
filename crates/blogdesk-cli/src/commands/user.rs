//! User management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use blogdesk_auth::{CredentialService, Registration};
use blogdesk_core::config::AppConfig;
use blogdesk_core::error::AppError;
use blogdesk_entity::user::{Principal, Role};

use crate::output::{self, OutputFormat};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Create a user with any role
    Create {
        /// Username
        #[arg(short, long)]
        username: String,
        /// Email
        #[arg(short, long)]
        email: String,
        /// Role: user, editor or admin
        #[arg(short, long, default_value = "user", value_parser = parse_role)]
        role: Role,
        /// Password; prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Show a user by username or email
    Show {
        /// Username or email
        key: String,
    },
    /// Change a user's role
    SetRole {
        /// Username or email
        key: String,
        /// New role: user, editor or admin
        #[arg(value_parser = parse_role)]
        role: Role,
    },
    /// Change a user's password
    SetPassword {
        /// Username or email
        key: String,
        /// New password; prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
pub struct UserRow {
    /// User ID
    id: String,
    /// Username
    username: String,
    /// Email
    email: String,
    /// Role
    role: String,
    /// Created at
    created_at: String,
}

impl From<Principal> for UserRow {
    fn from(p: Principal) -> Self {
        Self {
            id: p.id.to_string(),
            username: p.username,
            email: p.email,
            role: p.role.to_string(),
            created_at: p.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let service = super::credential_service(config).await?;

    match &args.command {
        UserCommand::Create {
            username,
            email,
            role,
            password,
        } => {
            let password = match password {
                Some(p) => p.clone(),
                None => prompt_password(true)?,
            };
            let principal = service
                .create(Registration {
                    username: username.clone(),
                    email: email.clone(),
                    password,
                    role: Some(*role),
                })
                .await?;

            output::print_item(&UserRow::from(principal), format);
            output::print_success(&format!("User '{username}' created"));
        }
        UserCommand::Show { key } => {
            let principal = find(&service, key).await?;
            output::print_item(&UserRow::from(principal), format);
        }
        UserCommand::SetRole { key, role } => {
            let principal = find(&service, key).await?;
            let updated = service.change_role(principal.id, *role).await?;
            output::print_success(&format!(
                "User '{}' is now {}",
                updated.username, updated.role
            ));
        }
        UserCommand::SetPassword { key, password } => {
            let principal = find(&service, key).await?;
            let password = match password {
                Some(p) => p.clone(),
                None => prompt_password(true)?,
            };
            service.change_password(principal.id, password).await?;
            output::print_success(&format!("Password changed for '{}'", principal.username));
        }
    }

    Ok(())
}

fn parse_role(s: &str) -> Result<Role, String> {
    s.parse::<Role>().map_err(|e| e.message)
}

async fn find(service: &CredentialService, key: &str) -> Result<Principal, AppError> {
    service
        .find_by_username_or_email(key)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User '{key}' not found")))
}

fn prompt_password(confirm: bool) -> Result<String, AppError> {
    let mut prompt = dialoguer::Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords do not match");
    }
    prompt
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {e}")))
}
