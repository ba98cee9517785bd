//! Process-local credential store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use blogdesk_core::error::AppError;
use blogdesk_core::result::AppResult;
use blogdesk_entity::user::{NewPrincipal, PasswordDigest, PrincipalRecord, Role};

use super::CredentialStore;

/// In-memory store keyed by principal id.
///
/// A single lock guards the whole map so the username/email collision
/// check and the insert happen as one step.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    records: RwLock<HashMap<Uuid, PrincipalRecord>>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with existing records, keeping them verbatim.
    pub fn with_records(records: impl IntoIterator<Item = PrincipalRecord>) -> Self {
        let records = records.into_iter().map(|r| (r.id, r)).collect();
        Self {
            records: RwLock::new(records),
        }
    }

    /// Number of stored principals.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store holds no principals.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn insert(&self, principal: NewPrincipal) -> AppResult<PrincipalRecord> {
        let mut records = self.records.write().await;

        let collides = records
            .values()
            .any(|r| r.username == principal.username || r.email == principal.email);
        if collides {
            return Err(AppError::conflict("Username or email already exists"));
        }

        let now = Utc::now();
        let record = PrincipalRecord {
            id: Uuid::new_v4(),
            username: principal.username,
            email: principal.email,
            password_hash: principal.password_hash,
            role: Some(principal.role),
            created_at: now,
            updated_at: now,
        };
        records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<PrincipalRecord>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn find_by_username_or_email(&self, key: &str) -> AppResult<Option<PrincipalRecord>> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .find(|r| r.username == key || r.email == key)
            .cloned())
    }

    async fn update_password(
        &self,
        id: Uuid,
        password_hash: PasswordDigest,
    ) -> AppResult<PrincipalRecord> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Principal {id} not found")))?;
        record.password_hash = password_hash;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn update_role(&self, id: Uuid, role: Role) -> AppResult<PrincipalRecord> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Principal {id} not found")))?;
        record.role = Some(role);
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogdesk_core::error::ErrorKind;

    fn new_principal(username: &str, email: &str, role: Role) -> NewPrincipal {
        NewPrincipal {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: PasswordDigest::from_phc("$argon2id$v=19$placeholder"),
            role,
        }
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let store = MemoryCredentialStore::new();
        let created = store
            .insert(new_principal("alice", "alice@example.com", Role::Editor))
            .await
            .unwrap();

        let by_id = store.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.username, "alice");
        assert_eq!(by_id.role, Some(Role::Editor));

        let by_name = store.find_by_username_or_email("alice").await.unwrap();
        let by_email = store
            .find_by_username_or_email("alice@example.com")
            .await
            .unwrap();
        assert_eq!(by_name.unwrap().id, created.id);
        assert_eq!(by_email.unwrap().id, created.id);

        assert!(store.find_by_username_or_email("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_leaves_store_unchanged() {
        let store = MemoryCredentialStore::new();
        let first = store
            .insert(new_principal("alice", "alice@example.com", Role::User))
            .await
            .unwrap();

        let err = store
            .insert(new_principal("alice", "other@example.com", Role::Admin))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(store.len().await, 1);
        assert!(
            store
                .find_by_username_or_email("other@example.com")
                .await
                .unwrap()
                .is_none()
        );
        assert_eq!(
            store.find_by_id(first.id).await.unwrap().unwrap().role,
            Some(Role::User)
        );
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryCredentialStore::new();
        store
            .insert(new_principal("alice", "shared@example.com", Role::User))
            .await
            .unwrap();
        let err = store
            .insert(new_principal("bob", "shared@example.com", Role::User))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_updates() {
        let store = MemoryCredentialStore::new();
        let created = store
            .insert(new_principal("carol", "carol@example.com", Role::User))
            .await
            .unwrap();

        let promoted = store.update_role(created.id, Role::Admin).await.unwrap();
        assert_eq!(promoted.role, Some(Role::Admin));

        let rehashed = store
            .update_password(created.id, PasswordDigest::from_phc("$argon2id$v=19$new"))
            .await
            .unwrap();
        assert_eq!(rehashed.password_hash.as_str(), "$argon2id$v=19$new");

        let missing = store.update_role(Uuid::new_v4(), Role::Admin).await;
        assert_eq!(missing.unwrap_err().kind, ErrorKind::NotFound);
    }
}
