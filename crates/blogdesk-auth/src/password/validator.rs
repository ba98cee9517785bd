//! Password policy enforcement for new passwords.

use blogdesk_core::config::AuthConfig;

use crate::error::AuthError;

/// Validates candidate passwords against the configured policy.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    /// Minimum password length, counted in characters.
    min_length: usize,
}

impl PasswordPolicy {
    /// Creates a policy from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self::with_min_length(config.password_min_length)
    }

    /// Creates a policy with an explicit minimum length.
    pub fn with_min_length(min_length: usize) -> Self {
        Self { min_length }
    }

    /// The configured minimum length.
    pub fn min_length(&self) -> usize {
        self.min_length
    }

    /// Validates a password, returning the first violation found.
    pub fn validate(&self, password: &str) -> Result<(), AuthError> {
        if password.trim().is_empty() {
            return Err(AuthError::Validation("Password must not be empty".to_string()));
        }

        if password.chars().count() < self.min_length {
            return Err(AuthError::Validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        Ok(())
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::new(&AuthConfig::default())
    }
}
