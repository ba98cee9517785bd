//! JWT claims structure embedded in every access token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use blogdesk_entity::user::{Principal, Role};

use crate::error::{AuthError, TokenRejection};

/// JWT claims payload.
///
/// Identity fields default when absent so that a token signed with our
/// key but missing a subject surfaces as a rejection rather than a
/// decoding error with a different shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject, the principal ID.
    #[serde(default)]
    pub sub: String,
    /// Username at issuance.
    #[serde(default)]
    pub username: String,
    /// Email at issuance.
    #[serde(default)]
    pub email: String,
    /// Role at issuance. Informational only; authorization reads the live record.
    #[serde(default)]
    pub role: Option<Role>,
    /// Issued-at timestamp (seconds since epoch).
    #[serde(default)]
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Build claims for `principal`, valid from `issued_at` until `expires_at`.
    pub fn for_principal(
        principal: &Principal,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sub: principal.id.to_string(),
            username: principal.username.clone(),
            email: principal.email.clone(),
            role: Some(principal.role),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// The principal ID named by the subject.
    pub fn principal_id(&self) -> Result<Uuid, AuthError> {
        let sub = self.sub.trim();
        if sub.is_empty() {
            return Err(AuthError::InvalidToken(TokenRejection::MissingSubject));
        }
        Uuid::parse_str(sub).map_err(|_| AuthError::InvalidToken(TokenRejection::MalformedSubject))
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_id() {
        let id = Uuid::new_v4();
        let mut claims = Claims {
            sub: id.to_string(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            role: Some(Role::Editor),
            iat: 0,
            exp: 60,
        };
        assert_eq!(claims.principal_id().unwrap(), id);

        claims.sub = String::new();
        assert!(matches!(
            claims.principal_id(),
            Err(AuthError::InvalidToken(TokenRejection::MissingSubject))
        ));

        claims.sub = "42".into();
        assert!(matches!(
            claims.principal_id(),
            Err(AuthError::InvalidToken(TokenRejection::MalformedSubject))
        ));
    }

    #[test]
    fn test_missing_identity_fields_default() {
        let claims: Claims = serde_json::from_str(r#"{"exp": 1700000000}"#).unwrap();
        assert!(claims.sub.is_empty());
        assert_eq!(claims.role, None);
        assert_eq!(claims.iat, 0);
    }
}
