//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, errors::ErrorKind};

use blogdesk_core::config::AuthConfig;
use blogdesk_core::result::AppResult;

use super::claims::Claims;
use crate::error::{AuthError, TokenRejection};

/// Validates HS256 access tokens.
///
/// Only HS256 is accepted and expiry is enforced with no leeway.
#[derive(Clone)]
pub struct TokenVerifier {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenVerifier {
    /// Creates a verifier from auth configuration.
    pub fn new(config: &AuthConfig) -> AppResult<Self> {
        let secret = config.signing_secret()?;
        Ok(Self::from_secret(secret.as_bytes()))
    }

    /// Creates a verifier from a raw secret.
    pub fn from_secret(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Checks signature and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                let rejection = match e.kind() {
                    ErrorKind::ExpiredSignature => TokenRejection::Expired,
                    ErrorKind::InvalidSignature => TokenRejection::BadSignature,
                    _ => TokenRejection::Malformed,
                };
                AuthError::InvalidToken(rejection)
            })
    }
}
