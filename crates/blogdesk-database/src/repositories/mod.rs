//! Credential store: the durable owner of principal records.
//!
//! Two implementations share the [`CredentialStore`] contract:
//! [`PgCredentialStore`] for PostgreSQL and [`MemoryCredentialStore`] for
//! tests and throwaway development instances.

pub mod memory;
pub mod principal;

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use blogdesk_core::config::{DatabaseConfig, StoreBackend};
use blogdesk_core::result::AppResult;
use blogdesk_entity::user::{NewPrincipal, PasswordDigest, PrincipalRecord, Role};

pub use memory::MemoryCredentialStore;
pub use principal::PgCredentialStore;

/// Lookup and creation of principal records.
///
/// Uniqueness of username and email is enforced here: a colliding
/// [`insert`](CredentialStore::insert) fails with an
/// [`ErrorKind::Conflict`](blogdesk_core::error::ErrorKind::Conflict) error
/// and leaves the store unchanged. Every other failure is an opaque
/// infrastructure error.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Persist a new principal and return the stored record.
    async fn insert(&self, principal: NewPrincipal) -> AppResult<PrincipalRecord>;

    /// Find a principal by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<PrincipalRecord>>;

    /// Find the principal whose username or email equals `key`.
    async fn find_by_username_or_email(&self, key: &str) -> AppResult<Option<PrincipalRecord>>;

    /// Replace a principal's password hash.
    async fn update_password(
        &self,
        id: Uuid,
        password_hash: PasswordDigest,
    ) -> AppResult<PrincipalRecord>;

    /// Replace a principal's role.
    async fn update_role(&self, id: Uuid, role: Role) -> AppResult<PrincipalRecord>;

    /// Check that the backing store is reachable.
    async fn ping(&self) -> AppResult<()>;
}

/// Open the store selected by `config.backend`, running migrations for PostgreSQL.
pub async fn open_store(config: &DatabaseConfig) -> AppResult<Arc<dyn CredentialStore>> {
    match config.backend {
        StoreBackend::Postgres => {
            let pool = crate::connection::DatabasePool::connect(config).await?;
            crate::migration::run_migrations(pool.pool()).await?;
            Ok(Arc::new(PgCredentialStore::new(pool.into_pool())))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory credential store; principals are not persisted");
            Ok(Arc::new(MemoryCredentialStore::new()))
        }
    }
}
