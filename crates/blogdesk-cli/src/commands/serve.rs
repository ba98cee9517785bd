//! Start the BlogDesk server.

use clap::Args;

use blogdesk_core::config::AppConfig;
use blogdesk_core::error::AppError;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the server host
    #[arg(long)]
    pub host: Option<String>,

    /// Create the default admin and editor accounts on startup
    #[arg(long)]
    pub seed: bool,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, mut config: AppConfig) -> Result<(), AppError> {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    if args.seed {
        config.auth.seed_default_accounts = true;
    }

    println!("Starting BlogDesk server...");
    println!("  Host:  {}", config.server.host);
    println!("  Port:  {}", config.server.port);
    println!("  Store: {:?}", config.database.backend);

    let store = super::open_credential_store(&config).await?;
    blogdesk_api::run_server(config, store).await
}
