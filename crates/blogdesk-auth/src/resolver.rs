//! Bearer token to live principal.

use std::sync::Arc;

use blogdesk_database::CredentialStore;
use blogdesk_entity::user::Principal;

use crate::audit::{AuthAuditSink, AuthEvent};
use crate::error::AuthError;
use crate::jwt::TokenVerifier;

/// Turns a presented bearer token into the principal it names.
///
/// The principal is always re-read from the store, so role changes and
/// deletions take effect on the next request even while old tokens remain
/// cryptographically valid.
#[derive(Clone)]
pub struct PrincipalResolver {
    verifier: Arc<TokenVerifier>,
    store: Arc<dyn CredentialStore>,
    audit: Arc<dyn AuthAuditSink>,
}

impl std::fmt::Debug for PrincipalResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrincipalResolver")
            .field("verifier", &self.verifier)
            .finish_non_exhaustive()
    }
}

impl PrincipalResolver {
    /// Creates a resolver over `store`.
    pub fn new(
        verifier: Arc<TokenVerifier>,
        store: Arc<dyn CredentialStore>,
        audit: Arc<dyn AuthAuditSink>,
    ) -> Self {
        Self {
            verifier,
            store,
            audit,
        }
    }

    /// Resolve `token` to a principal.
    ///
    /// 1. No token, or a blank one: [`AuthError::Unauthenticated`]
    /// 2. Bad signature, expired, malformed or no usable subject: [`AuthError::InvalidToken`]
    /// 3. Subject not in the store: [`AuthError::PrincipalNotFound`]
    /// 4. Stored record has no role: [`AuthError::InvalidPrincipalState`]
    pub async fn resolve(&self, token: Option<&str>) -> Result<Principal, AuthError> {
        let result = self.resolve_inner(token).await;
        match &result {
            Ok(principal) => self.audit.record(AuthEvent::PrincipalResolved {
                principal_id: principal.id,
                role: principal.role,
            }),
            Err(AuthError::Unauthenticated) => {}
            Err(error) => self.audit.record(AuthEvent::ResolutionFailed { error }),
        }
        result
    }

    /// Like [`resolve`](Self::resolve) but any failure yields `None`.
    ///
    /// For operations that personalize output without requiring identity.
    pub async fn resolve_optional(&self, token: Option<&str>) -> Option<Principal> {
        self.resolve(token).await.ok()
    }

    async fn resolve_inner(&self, token: Option<&str>) -> Result<Principal, AuthError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::Unauthenticated)?;

        let claims = self.verifier.verify(token)?;
        let id = claims.principal_id()?;

        let record = self
            .store
            .find_by_id(id)
            .await
            .map_err(AuthError::Store)?
            .ok_or(AuthError::PrincipalNotFound(id))?;

        Principal::try_from(record).map_err(|missing| AuthError::InvalidPrincipalState(missing.id))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use blogdesk_core::config::TokenLifetime;
    use blogdesk_database::MemoryCredentialStore;
    use blogdesk_entity::user::{NewPrincipal, PasswordDigest, PrincipalRecord, Role};

    use super::*;
    use crate::audit::TracingAuditSink;
    use crate::jwt::TokenIssuer;

    const SECRET: &[u8] = b"resolver-test-secret";

    fn issuer() -> TokenIssuer {
        TokenIssuer::from_secret(SECRET, TokenLifetime::default())
    }

    fn resolver(store: Arc<dyn CredentialStore>) -> PrincipalResolver {
        PrincipalResolver::new(
            Arc::new(TokenVerifier::from_secret(SECRET)),
            store,
            Arc::new(TracingAuditSink),
        )
    }

    async fn stored(store: &MemoryCredentialStore, role: Role) -> Principal {
        let record = store
            .insert(NewPrincipal {
                username: "dana".into(),
                email: "dana@example.com".into(),
                password_hash: PasswordDigest::from_phc("$argon2id$unused"),
                role,
            })
            .await
            .unwrap();
        Principal::try_from(record).unwrap()
    }

    #[tokio::test]
    async fn test_resolves_live_principal() {
        let store = Arc::new(MemoryCredentialStore::new());
        let principal = stored(&store, Role::Editor).await;
        let token = issuer().issue(&principal).unwrap().token;

        let resolver = resolver(store.clone());
        let resolved = resolver.resolve(Some(&token)).await.unwrap();
        assert_eq!(resolved.id, principal.id);
        assert_eq!(resolved.role, Role::Editor);

        store.update_role(principal.id, Role::User).await.unwrap();
        let resolved = resolver.resolve(Some(&token)).await.unwrap();
        assert_eq!(resolved.role, Role::User);
    }

    #[tokio::test]
    async fn test_missing_token() {
        let resolver = resolver(Arc::new(MemoryCredentialStore::new()));
        assert!(matches!(resolver.resolve(None).await, Err(AuthError::Unauthenticated)));
        assert!(matches!(resolver.resolve(Some("  ")).await, Err(AuthError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_invalid_and_expired_tokens() {
        let store = Arc::new(MemoryCredentialStore::new());
        let principal = stored(&store, Role::Admin).await;
        let resolver = resolver(store);

        let expired = issuer()
            .issue_at(&principal, Utc::now() - Duration::hours(3))
            .unwrap();
        assert!(matches!(
            resolver.resolve(Some(&expired.token)).await,
            Err(AuthError::InvalidToken(_))
        ));
        assert!(matches!(
            resolver.resolve(Some("garbage")).await,
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_subject() {
        let store = Arc::new(MemoryCredentialStore::new());
        let ghost = stored(&MemoryCredentialStore::new(), Role::User).await;
        let token = issuer().issue(&ghost).unwrap().token;

        let err = resolver(store).resolve(Some(&token)).await.unwrap_err();
        assert!(matches!(err, AuthError::PrincipalNotFound(id) if id == ghost.id));
    }

    #[tokio::test]
    async fn test_record_without_role() {
        let now = Utc::now();
        let record = PrincipalRecord {
            id: Uuid::new_v4(),
            username: "orphan".into(),
            email: "orphan@example.com".into(),
            password_hash: PasswordDigest::from_phc("$argon2id$unused"),
            role: None,
            created_at: now,
            updated_at: now,
        };
        let id = record.id;
        let store = Arc::new(MemoryCredentialStore::with_records([record.clone()]));

        let as_principal = Principal {
            id,
            username: record.username,
            email: record.email,
            password_hash: record.password_hash,
            role: Role::User,
            created_at: now,
            updated_at: now,
        };
        let token = issuer().issue(&as_principal).unwrap().token;

        let err = resolver(store).resolve(Some(&token)).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidPrincipalState(found) if found == id));
    }

    #[tokio::test]
    async fn test_optional_swallows_failures() {
        let store = Arc::new(MemoryCredentialStore::new());
        let principal = stored(&store, Role::User).await;
        let token = issuer().issue(&principal).unwrap().token;
        let resolver = resolver(store);

        assert!(resolver.resolve_optional(None).await.is_none());
        assert!(resolver.resolve_optional(Some("nope")).await.is_none());
        assert_eq!(
            resolver.resolve_optional(Some(&token)).await.map(|p| p.id),
            Some(principal.id)
        );
    }
}
