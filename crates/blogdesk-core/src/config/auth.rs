//! Authentication configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Lifetime applied when `jwt_lifetime` is not configured.
pub const DEFAULT_TOKEN_LIFETIME_SECONDS: i64 = 3600;

/// Longest accepted token lifetime: ten years.
pub const MAX_TOKEN_LIFETIME_SECONDS: i64 = 10 * 365 * 24 * 3600;

/// Authentication and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256). Required.
    #[serde(default)]
    pub jwt_secret: Option<String>,
    /// Access token lifetime: integer seconds or a duration such as `"90m"`.
    #[serde(default)]
    pub jwt_lifetime: Option<LifetimeSetting>,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Create the default `admin` and `editor` accounts at startup.
    #[serde(default)]
    pub seed_default_accounts: bool,
    /// Password given to seeded accounts.
    #[serde(default = "default_seed_password")]
    pub seed_password: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            jwt_lifetime: None,
            password_min_length: default_password_min(),
            seed_default_accounts: false,
            seed_password: default_seed_password(),
        }
    }
}

impl AuthConfig {
    /// Returns the configured signing secret, failing if it is absent or blank.
    pub fn signing_secret(&self) -> Result<&str, AppError> {
        match self.jwt_secret.as_deref().map(str::trim) {
            Some(secret) if !secret.is_empty() => Ok(secret),
            _ => Err(AppError::configuration(
                "auth.jwt_secret must be set to a non-empty value",
            )),
        }
    }

    /// Resolves the configured token lifetime, defaulting to one hour.
    pub fn token_lifetime(&self) -> Result<TokenLifetime, AppError> {
        match &self.jwt_lifetime {
            None => Ok(TokenLifetime::default()),
            Some(LifetimeSetting::Seconds(seconds)) => TokenLifetime::from_seconds(*seconds),
            Some(LifetimeSetting::Text(text)) => TokenLifetime::parse(text),
        }
    }
}

/// Raw lifetime value as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LifetimeSetting {
    /// Integer seconds, e.g. `3600`.
    Seconds(i64),
    /// Duration with unit, e.g. `"1h"` or `"2 days"`. Numeric strings are seconds.
    Text(String),
}

/// A validated, strictly positive token lifetime with second resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetime {
    seconds: i64,
}

impl Default for TokenLifetime {
    fn default() -> Self {
        Self {
            seconds: DEFAULT_TOKEN_LIFETIME_SECONDS,
        }
    }
}

impl TokenLifetime {
    /// Builds a lifetime from whole seconds.
    pub fn from_seconds(seconds: i64) -> Result<Self, AppError> {
        if seconds <= 0 {
            return Err(AppError::configuration(format!(
                "Token lifetime must be positive, got {seconds} seconds"
            )));
        }
        if seconds > MAX_TOKEN_LIFETIME_SECONDS {
            return Err(AppError::configuration(format!(
                "Token lifetime of {seconds} seconds exceeds the maximum of \
                 {MAX_TOKEN_LIFETIME_SECONDS} seconds"
            )));
        }
        Ok(Self { seconds })
    }

    /// Parses `"3600"`, `"45s"`, `"90m"`, `"1h"`, `"1.5h"`, `"2 days"`, `"1w"`, ...
    pub fn parse(input: &str) -> Result<Self, AppError> {
        let text = input.trim().to_ascii_lowercase();
        if let Ok(seconds) = text.parse::<i64>() {
            return Self::from_seconds(seconds);
        }

        let split = text
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(|| invalid_lifetime(input))?;
        let (number, unit) = text.split_at(split);
        let amount: f64 = number.parse().map_err(|_| invalid_lifetime(input))?;
        let unit_millis = unit_in_millis(unit.trim()).ok_or_else(|| invalid_lifetime(input))?;

        let seconds = (amount * unit_millis / 1000.0).floor();
        if !seconds.is_finite() || seconds > i64::MAX as f64 {
            return Err(invalid_lifetime(input));
        }
        Self::from_seconds(seconds as i64)
    }

    /// Lifetime in whole seconds.
    pub fn as_seconds(&self) -> i64 {
        self.seconds
    }

    /// Lifetime as a `chrono` duration.
    pub fn as_duration(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.seconds)
    }
}

impl fmt::Display for TokenLifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.seconds)
    }
}

fn unit_in_millis(unit: &str) -> Option<f64> {
    const SECOND: f64 = 1000.0;
    const MINUTE: f64 = SECOND * 60.0;
    const HOUR: f64 = MINUTE * 60.0;
    const DAY: f64 = HOUR * 24.0;
    const WEEK: f64 = DAY * 7.0;

    let millis = match unit {
        "ms" | "msec" | "msecs" | "millisecond" | "milliseconds" => 1.0,
        "s" | "sec" | "secs" | "second" | "seconds" => SECOND,
        "m" | "min" | "mins" | "minute" | "minutes" => MINUTE,
        "h" | "hr" | "hrs" | "hour" | "hours" => HOUR,
        "d" | "day" | "days" => DAY,
        "w" | "week" | "weeks" => WEEK,
        _ => return None,
    };
    Some(millis)
}

fn invalid_lifetime(input: &str) -> AppError {
    AppError::configuration(format!(
        "Invalid token lifetime '{input}'. Use seconds (3600) or a duration like '1h', '30m', '7d'"
    ))
}

fn default_password_min() -> usize {
    8
}

fn default_seed_password() -> String {
    "password123".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lifetime_is_one_hour() {
        let config = AuthConfig::default();
        assert_eq!(config.token_lifetime().unwrap().as_seconds(), 3600);
    }

    #[test]
    fn test_integer_seconds() {
        let config = AuthConfig {
            jwt_lifetime: Some(LifetimeSetting::Seconds(900)),
            ..AuthConfig::default()
        };
        assert_eq!(config.token_lifetime().unwrap().as_seconds(), 900);
    }

    #[test]
    fn test_duration_strings() {
        assert_eq!(TokenLifetime::parse("3600").unwrap().as_seconds(), 3600);
        assert_eq!(TokenLifetime::parse("45s").unwrap().as_seconds(), 45);
        assert_eq!(TokenLifetime::parse("90m").unwrap().as_seconds(), 5400);
        assert_eq!(TokenLifetime::parse("1h").unwrap().as_seconds(), 3600);
        assert_eq!(TokenLifetime::parse("1.5h").unwrap().as_seconds(), 5400);
        assert_eq!(TokenLifetime::parse("2 days").unwrap().as_seconds(), 172_800);
        assert_eq!(TokenLifetime::parse(" 1W ").unwrap().as_seconds(), 604_800);
    }

    #[test]
    fn test_rejects_garbage_and_non_positive() {
        assert!(TokenLifetime::parse("abc").is_err());
        assert!(TokenLifetime::parse("10 fortnights").is_err());
        assert!(TokenLifetime::parse("0").is_err());
        assert!(TokenLifetime::parse("-5").is_err());
        assert!(TokenLifetime::parse("500ms").is_err());
        assert!(TokenLifetime::parse("h").is_err());
    }

    #[test]
    fn test_rejects_lifetimes_beyond_maximum() {
        assert!(TokenLifetime::parse("9223372036854775807").is_err());
        assert!(TokenLifetime::parse("100000000000000").is_err());
        assert!(TokenLifetime::parse("1000000000 weeks").is_err());
        assert!(TokenLifetime::from_seconds(MAX_TOKEN_LIFETIME_SECONDS + 1).is_err());

        let config = AuthConfig {
            jwt_lifetime: Some(LifetimeSetting::Seconds(i64::MAX)),
            ..AuthConfig::default()
        };
        assert!(config.token_lifetime().is_err());

        let longest = TokenLifetime::from_seconds(MAX_TOKEN_LIFETIME_SECONDS).unwrap();
        assert_eq!(longest.as_duration().num_seconds(), MAX_TOKEN_LIFETIME_SECONDS);
    }

    #[test]
    fn test_signing_secret_required() {
        let mut config = AuthConfig::default();
        assert!(config.signing_secret().is_err());

        config.jwt_secret = Some("   ".to_string());
        assert!(config.signing_secret().is_err());

        config.jwt_secret = Some("s3cret".to_string());
        assert_eq!(config.signing_secret().unwrap(), "s3cret");
    }
}
