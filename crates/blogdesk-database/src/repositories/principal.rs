//! PostgreSQL credential store.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use blogdesk_core::error::{AppError, ErrorKind};
use blogdesk_core::result::AppResult;
use blogdesk_entity::user::{NewPrincipal, PasswordDigest, PrincipalRecord, Role};

use super::CredentialStore;

/// Repository over the `principals` table.
#[derive(Debug, Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    /// Create a new store on top of an open pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn insert(&self, principal: NewPrincipal) -> AppResult<PrincipalRecord> {
        let now = Utc::now();
        sqlx::query_as::<_, PrincipalRecord>(
            "INSERT INTO principals (id, username, email, password_hash, role, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $6) \
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&principal.username)
        .bind(&principal.email)
        .bind(&principal.password_hash)
        .bind(principal.role)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                tracing::debug!(
                    constraint = db_err.constraint().unwrap_or("unknown"),
                    "Principal insert hit a uniqueness constraint"
                );
                AppError::conflict("Username or email already exists")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create principal", e),
        })
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<PrincipalRecord>> {
        sqlx::query_as::<_, PrincipalRecord>("SELECT * FROM principals WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find principal by id", e)
            })
    }

    async fn find_by_username_or_email(&self, key: &str) -> AppResult<Option<PrincipalRecord>> {
        sqlx::query_as::<_, PrincipalRecord>(
            "SELECT * FROM principals WHERE username = $1 OR email = $1 LIMIT 1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                "Failed to find principal by username or email",
                e,
            )
        })
    }

    async fn update_password(
        &self,
        id: Uuid,
        password_hash: PasswordDigest,
    ) -> AppResult<PrincipalRecord> {
        sqlx::query_as::<_, PrincipalRecord>(
            "UPDATE principals SET password_hash = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update password", e))?
        .ok_or_else(|| AppError::not_found(format!("Principal {id} not found")))
    }

    async fn update_role(&self, id: Uuid, role: Role) -> AppResult<PrincipalRecord> {
        sqlx::query_as::<_, PrincipalRecord>(
            "UPDATE principals SET role = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update role", e))?
        .ok_or_else(|| AppError::not_found(format!("Principal {id} not found")))
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}
