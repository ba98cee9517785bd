//! Principal entity model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::role::Role;

/// A salted, self-describing password hash in PHC string format.
///
/// Only the password hasher produces new digests, and the credential store
/// only accepts digests, so a plaintext password can never reach storage
/// and an existing digest is never hashed a second time.
#[derive(Clone, PartialEq, Eq, sqlx::Type)]
#[sqlx(transparent)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Wraps an already-computed PHC hash string.
    pub fn from_phc(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// The PHC string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(<redacted>)")
    }
}

/// A principal row exactly as the store holds it.
///
/// The role column is read as optional so that a corrupted record surfaces
/// as a typed error at the [`Principal`] conversion instead of a decode
/// failure deep in the driver.
#[derive(Debug, Clone, FromRow)]
pub struct PrincipalRecord {
    /// Unique principal identifier.
    pub id: Uuid,
    /// Unique login name.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Argon2 password hash.
    pub password_hash: PasswordDigest,
    /// Assigned role.
    pub role: Option<Role>,
    /// When the principal was created.
    pub created_at: DateTime<Utc>,
    /// When the principal was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A stored identity with a guaranteed role.
#[derive(Debug, Clone, Serialize)]
pub struct Principal {
    /// Unique principal identifier.
    pub id: Uuid,
    /// Unique login name.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Argon2 password hash. Never serialized.
    #[serde(skip)]
    pub password_hash: PasswordDigest,
    /// Assigned role.
    pub role: Role,
    /// When the principal was created.
    pub created_at: DateTime<Utc>,
    /// When the principal was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Principal {
    /// Check if this principal holds the admin role.
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

/// A record lacked the role every principal must carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingRole {
    /// The offending principal.
    pub id: Uuid,
}

impl fmt::Display for MissingRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "principal {} has no role assigned", self.id)
    }
}

impl std::error::Error for MissingRole {}

impl TryFrom<PrincipalRecord> for Principal {
    type Error = MissingRole;

    fn try_from(record: PrincipalRecord) -> Result<Self, Self::Error> {
        let role = record.role.ok_or(MissingRole { id: record.id })?;
        Ok(Self {
            id: record.id,
            username: record.username,
            email: record.email,
            password_hash: record.password_hash,
            role,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

/// Data required to create a new principal.
#[derive(Debug, Clone)]
pub struct NewPrincipal {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Freshly computed password hash.
    pub password_hash: PasswordDigest,
    /// Assigned role.
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(role: Option<Role>) -> PrincipalRecord {
        let now = Utc::now();
        PrincipalRecord {
            id: Uuid::new_v4(),
            username: "editor".to_string(),
            email: "editor@example.com".to_string(),
            password_hash: PasswordDigest::from_phc("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA"),
            role,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_conversion_requires_role() {
        let rec = record(None);
        let id = rec.id;
        assert_eq!(Principal::try_from(rec).unwrap_err(), MissingRole { id });

        let principal = Principal::try_from(record(Some(Role::Editor))).unwrap();
        assert_eq!(principal.role, Role::Editor);
        assert!(!principal.is_admin());
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let principal = Principal::try_from(record(Some(Role::User))).unwrap();
        let json = serde_json::to_value(&principal).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "editor");
        assert_eq!(json["role"], "user");
    }

    #[test]
    fn test_digest_debug_is_redacted() {
        let digest = PasswordDigest::from_phc("$argon2id$secret");
        assert_eq!(format!("{digest:?}"), "PasswordDigest(<redacted>)");
    }
}
