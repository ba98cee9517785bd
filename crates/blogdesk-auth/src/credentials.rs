//! Registration, login and administrative credential changes.

use std::sync::Arc;

use uuid::Uuid;

use blogdesk_database::CredentialStore;
use blogdesk_entity::user::{NewPrincipal, Principal, Role};

use crate::audit::{AuthAuditSink, AuthEvent};
use crate::error::AuthError;
use crate::jwt::{IssuedToken, TokenIssuer};
use crate::password::{PasswordHasher, PasswordPolicy};

/// Accounts created by [`CredentialService::seed_default_accounts`].
const DEFAULT_ACCOUNTS: [(&str, &str, Role); 2] = [
    ("admin", "admin@example.com", Role::Admin),
    ("editor", "editor@example.com", Role::Editor),
];

/// Input for creating a principal.
#[derive(Clone)]
pub struct Registration {
    /// Unique login name.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Plaintext password; hashed before it reaches the store.
    pub password: String,
    /// Requested role. `None` means [`Role::User`].
    pub role: Option<Role>,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// A principal together with a freshly issued token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// The signed access token.
    pub token: IssuedToken,
    /// The principal the token was issued for.
    pub principal: Principal,
}

/// Credential use-cases over the store, hasher and issuer.
#[derive(Clone)]
pub struct CredentialService {
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    policy: PasswordPolicy,
    issuer: Arc<TokenIssuer>,
    audit: Arc<dyn AuthAuditSink>,
}

impl std::fmt::Debug for CredentialService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialService")
            .field("policy", &self.policy)
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}

impl CredentialService {
    /// Creates a credential service.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        issuer: Arc<TokenIssuer>,
        policy: PasswordPolicy,
        audit: Arc<dyn AuthAuditSink>,
    ) -> Self {
        Self {
            store,
            hasher: PasswordHasher::new(),
            policy,
            issuer,
            audit,
        }
    }

    /// Create a principal from a plaintext password.
    ///
    /// The password is checked against the policy and hashed; the store
    /// rejects colliding usernames or emails with
    /// [`AuthError::DuplicateIdentity`] and keeps the existing principal.
    pub async fn create(&self, registration: Registration) -> Result<Principal, AuthError> {
        let username = registration.username.trim().to_string();
        let result = self.create_inner(&username, registration).await;

        match &result {
            Ok(principal) => self.audit.record(AuthEvent::Registered {
                principal_id: principal.id,
                username: &principal.username,
                role: principal.role,
            }),
            Err(error) => self.audit.record(AuthEvent::RegistrationRejected {
                username: &username,
                error,
            }),
        }
        result
    }

    async fn create_inner(
        &self,
        username: &str,
        registration: Registration,
    ) -> Result<Principal, AuthError> {
        let email = registration.email.trim().to_string();
        if username.is_empty() {
            return Err(AuthError::Validation("Username must not be empty".to_string()));
        }
        if email.is_empty() {
            return Err(AuthError::Validation("Email must not be empty".to_string()));
        }
        self.policy.validate(&registration.password)?;

        let password_hash = self.hasher.hash_async(registration.password).await?;
        let record = self
            .store
            .insert(NewPrincipal {
                username: username.to_string(),
                email,
                password_hash,
                role: registration.role.unwrap_or_default(),
            })
            .await
            .map_err(AuthError::from_store)?;

        Principal::try_from(record).map_err(|missing| AuthError::InvalidPrincipalState(missing.id))
    }

    /// Register a principal and issue its first token.
    pub async fn register(&self, registration: Registration) -> Result<AuthSession, AuthError> {
        let principal = self.create(registration).await?;
        self.session_for(principal)
    }

    /// Authenticate by username or email and password, issuing a token.
    ///
    /// Unknown keys and wrong passwords fail identically, with the same
    /// amount of hashing work.
    pub async fn login(&self, key: &str, password: &str) -> Result<AuthSession, AuthError> {
        let key = key.trim();
        let record = self
            .store
            .find_by_username_or_email(key)
            .await
            .map_err(AuthError::Store)?;

        let digest = record.as_ref().map(|r| r.password_hash.clone());
        let matched = self
            .hasher
            .verify_async(password.to_string(), digest)
            .await;

        let record = match record {
            Some(record) if matched => record,
            _ => {
                self.audit.record(AuthEvent::LoginFailed { key });
                return Err(AuthError::InvalidCredentials);
            }
        };

        // A roleless record fails like a wrong password so the response
        // does not confirm the password.
        let principal = match Principal::try_from(record) {
            Ok(principal) => principal,
            Err(missing) => {
                tracing::warn!(principal_id = %missing.id, "Login matched a principal with no role");
                self.audit.record(AuthEvent::LoginFailed { key });
                return Err(AuthError::InvalidCredentials);
            }
        };
        self.audit.record(AuthEvent::LoginSucceeded {
            principal_id: principal.id,
            username: &principal.username,
        });
        self.session_for(principal)
    }

    /// Replace a principal's password. The new password must satisfy the policy.
    pub async fn change_password(
        &self,
        id: Uuid,
        new_password: String,
    ) -> Result<Principal, AuthError> {
        self.policy.validate(&new_password)?;
        let digest = self.hasher.hash_async(new_password).await?;
        let record = self
            .store
            .update_password(id, digest)
            .await
            .map_err(AuthError::from_store)?;

        self.audit.record(AuthEvent::PasswordChanged { principal_id: id });
        Principal::try_from(record).map_err(|missing| AuthError::InvalidPrincipalState(missing.id))
    }

    /// Replace a principal's role. Takes effect on that principal's next request.
    pub async fn change_role(&self, id: Uuid, role: Role) -> Result<Principal, AuthError> {
        let record = self
            .store
            .update_role(id, role)
            .await
            .map_err(AuthError::from_store)?;

        self.audit.record(AuthEvent::RoleChanged {
            principal_id: id,
            role,
        });
        Principal::try_from(record).map_err(|missing| AuthError::InvalidPrincipalState(missing.id))
    }

    /// Look up a principal by id.
    pub async fn find(&self, id: Uuid) -> Result<Option<Principal>, AuthError> {
        let record = self.store.find_by_id(id).await.map_err(AuthError::Store)?;
        record
            .map(|r| {
                Principal::try_from(r).map_err(|missing| AuthError::InvalidPrincipalState(missing.id))
            })
            .transpose()
    }

    /// Look up a principal by username or email.
    pub async fn find_by_username_or_email(
        &self,
        key: &str,
    ) -> Result<Option<Principal>, AuthError> {
        let record = self
            .store
            .find_by_username_or_email(key.trim())
            .await
            .map_err(AuthError::Store)?;
        record
            .map(|r| {
                Principal::try_from(r).map_err(|missing| AuthError::InvalidPrincipalState(missing.id))
            })
            .transpose()
    }

    /// Create the default `admin` and `editor` accounts when absent.
    ///
    /// Existing usernames are left untouched. Returns the accounts created.
    pub async fn seed_default_accounts(&self, password: &str) -> Result<Vec<Principal>, AuthError> {
        let mut created = Vec::new();
        for (username, email, role) in DEFAULT_ACCOUNTS {
            if self.find_by_username_or_email(username).await?.is_some() {
                tracing::debug!(username, "Seed account already present");
                continue;
            }

            let principal = self
                .create(Registration {
                    username: username.to_string(),
                    email: email.to_string(),
                    password: password.to_string(),
                    role: Some(role),
                })
                .await?;
            created.push(principal);
        }
        Ok(created)
    }

    fn session_for(&self, principal: Principal) -> Result<AuthSession, AuthError> {
        let token = self.issuer.issue(&principal)?;
        self.audit.record(AuthEvent::TokenIssued {
            principal_id: principal.id,
            expires_at: token.expires_at,
        });
        Ok(AuthSession { token, principal })
    }
}
