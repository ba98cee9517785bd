//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod auth;
pub mod database;
pub mod logging;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::{AuthConfig, LifetimeSetting, TokenLifetime};
pub use self::database::{DatabaseConfig, StoreBackend};
pub use self::logging::LoggingConfig;

use crate::error::AppError;

/// Prefix for environment variable overrides, e.g. `BLOGDESK__AUTH__JWT_SECRET`.
pub const ENV_PREFIX: &str = "BLOGDESK";

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from `config/default.toml`, the `config/{env}.toml`
    /// overlay, and `BLOGDESK__*` environment variables.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config/default", env)
    }

    /// Load configuration using `base` as the default file (extension optional).
    pub fn load_from(base: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(base).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Checks the settings the process cannot start without.
    pub fn validate(&self) -> Result<(), AppError> {
        self.auth.signing_secret()?;
        self.auth.token_lifetime()?;

        if self.database.backend == StoreBackend::Postgres && self.database.url.is_empty() {
            return Err(AppError::configuration(
                "database.url is required when database.backend = \"postgres\"",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = Some("test-secret".to_string());
        config.database.backend = StoreBackend::Memory;
        config
    }

    #[test]
    fn test_validate_accepts_minimal_memory_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validate_fails_fast_without_secret() {
        let mut config = valid_config();
        config.auth.jwt_secret = None;
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Configuration);
    }

    #[test]
    fn test_validate_rejects_bad_lifetime() {
        let mut config = valid_config();
        config.auth.jwt_lifetime = Some(LifetimeSetting::Text("soon".to_string()));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_requires_url_for_postgres() {
        let mut config = valid_config();
        config.database.backend = StoreBackend::Postgres;
        assert!(config.validate().is_err());

        config.database.url = "postgres://blogdesk@localhost/blogdesk".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_lifetime_setting_deserializes_both_forms() {
        let seconds: LifetimeSetting = serde_json::from_str("7200").unwrap();
        assert_eq!(seconds, LifetimeSetting::Seconds(7200));

        let text: LifetimeSetting = serde_json::from_str("\"2h\"").unwrap();
        assert_eq!(text, LifetimeSetting::Text("2h".to_string()));
    }

    #[test]
    fn test_load_from_file_then_env_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("base.toml");
        std::fs::write(
            &base,
            "[database]\nbackend = \"memory\"\n\n\
             [auth]\njwt_secret = \"file-secret\"\njwt_lifetime = \"90m\"\n",
        )
        .unwrap();
        let base = base.to_str().unwrap();

        let from_file = AppConfig::load_from(base, "no-such-overlay").unwrap();
        assert_eq!(from_file.database.backend, StoreBackend::Memory);
        assert_eq!(from_file.auth.signing_secret().unwrap(), "file-secret");
        assert_eq!(from_file.auth.token_lifetime().unwrap().as_seconds(), 5400);

        // SAFETY: no other test in this crate reads these variables.
        unsafe {
            std::env::set_var("BLOGDESK__AUTH__JWT_SECRET", "env-secret");
            std::env::set_var("BLOGDESK__AUTH__JWT_LIFETIME", "7200");
        }
        let overridden = AppConfig::load_from(base, "no-such-overlay");
        unsafe {
            std::env::remove_var("BLOGDESK__AUTH__JWT_SECRET");
            std::env::remove_var("BLOGDESK__AUTH__JWT_LIFETIME");
        }

        let overridden = overridden.unwrap();
        assert_eq!(overridden.auth.signing_secret().unwrap(), "env-secret");
        assert_eq!(
            overridden.auth.jwt_lifetime,
            Some(LifetimeSetting::Seconds(7200))
        );
        assert_eq!(overridden.auth.token_lifetime().unwrap().as_seconds(), 7200);
    }
}
