//! JWT token creation with configurable signing and lifetime.

use chrono::{DateTime, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

use blogdesk_core::config::{AuthConfig, TokenLifetime};
use blogdesk_core::result::AppResult;
use blogdesk_entity::user::Principal;

use super::claims::Claims;
use crate::error::AuthError;

/// A signed access token and the instant it stops being accepted.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Compact JWS serialization.
    pub token: String,
    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

/// Creates HS256-signed access tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Validity period of each token.
    lifetime: TokenLifetime,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

impl TokenIssuer {
    /// Creates an issuer from auth configuration.
    ///
    /// Fails when the signing secret is absent or the lifetime does not parse.
    pub fn new(config: &AuthConfig) -> AppResult<Self> {
        let secret = config.signing_secret()?;
        let lifetime = config.token_lifetime()?;
        Ok(Self::from_secret(secret.as_bytes(), lifetime))
    }

    /// Creates an issuer from a raw secret.
    pub fn from_secret(secret: &[u8], lifetime: TokenLifetime) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            lifetime,
        }
    }

    /// The configured token lifetime.
    pub fn lifetime(&self) -> TokenLifetime {
        self.lifetime
    }

    /// Issues a token for `principal` starting now.
    pub fn issue(&self, principal: &Principal) -> Result<IssuedToken, AuthError> {
        self.issue_at(principal, Utc::now())
    }

    /// Issues a token for `principal` as if the current time were `issued_at`.
    pub fn issue_at(
        &self,
        principal: &Principal,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, AuthError> {
        let expires_at = issued_at
            .checked_add_signed(self.lifetime.as_duration())
            .ok_or_else(|| AuthError::Signing("token expiry is out of range".to_string()))?;
        let claims = Claims::for_principal(principal, issued_at, expires_at);

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }
}
