//! Argon2id password hashing and verification.

use std::sync::OnceLock;

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use blogdesk_entity::user::PasswordDigest;

use crate::error::AuthError;

/// Digest verified against when there is no real digest to check, so a
/// miss costs the same as a mismatch.
static DUMMY_DIGEST: OnceLock<Option<String>> = OnceLock::new();

/// Handles password hashing and verification using Argon2id.
///
/// Every digest carries its own random salt, so hashing the same password
/// twice yields different digests that both verify.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Creates a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hashes a plaintext password using Argon2id with a random salt.
    pub fn hash(&self, password: &str) -> Result<PasswordDigest, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;

        Ok(PasswordDigest::from_phc(hash.to_string()))
    }

    /// Verifies a plaintext password against a stored digest.
    ///
    /// An unparseable digest never matches; the check still runs a full
    /// Argon2 verification so it takes as long as a wrong password.
    pub fn verify(&self, password: &str, digest: &PasswordDigest) -> bool {
        match PasswordHash::new(digest.as_str()) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => self.verify_missing(password),
        }
    }

    /// Burns one verification for a principal that does not exist. Always `false`.
    pub fn verify_missing(&self, password: &str) -> bool {
        let dummy = DUMMY_DIGEST.get_or_init(|| {
            let salt = SaltString::generate(&mut OsRng);
            Argon2::default()
                .hash_password(b"blogdesk-unmatched", &salt)
                .ok()
                .map(|h| h.to_string())
        });

        if let Some(parsed) = dummy.as_deref().and_then(|d| PasswordHash::new(d).ok()) {
            let _ = Argon2::default().verify_password(password.as_bytes(), &parsed);
        }
        false
    }

    /// Hashes on the blocking pool.
    pub async fn hash_async(&self, password: String) -> Result<PasswordDigest, AuthError> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Hashing(format!("hashing task failed: {e}")))?
    }

    /// Verifies on the blocking pool. `None` behaves like [`verify_missing`](Self::verify_missing).
    pub async fn verify_async(&self, password: String, digest: Option<PasswordDigest>) -> bool {
        let hasher = *self;
        tokio::task::spawn_blocking(move || match digest {
            Some(digest) => hasher.verify(&password, &digest),
            None => hasher.verify_missing(&password),
        })
        .await
        .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();
        let digest = hasher.hash("correct horse").unwrap();

        assert!(digest.as_str().starts_with("$argon2id$"));
        assert!(hasher.verify("correct horse", &digest));
        assert!(!hasher.verify("correct horsE", &digest));
    }

    #[test]
    fn test_salts_differ() {
        let hasher = PasswordHasher::new();
        let a = hasher.hash("password123").unwrap();
        let b = hasher.hash("password123").unwrap();

        assert_ne!(a.as_str(), b.as_str());
        assert!(hasher.verify("password123", &a));
        assert!(hasher.verify("password123", &b));
    }

    #[test]
    fn test_unparseable_digest_never_matches() {
        let hasher = PasswordHasher::new();
        assert!(!hasher.verify("anything", &PasswordDigest::from_phc("not-a-phc-string")));
        assert!(!hasher.verify("", &PasswordDigest::from_phc("")));
        assert!(!hasher.verify_missing("anything"));
    }

    #[tokio::test]
    async fn test_async_wrappers() {
        let hasher = PasswordHasher::new();
        let digest = hasher.hash_async("s3cret-pass".to_string()).await.unwrap();

        assert!(
            hasher
                .verify_async("s3cret-pass".to_string(), Some(digest.clone()))
                .await
        );
        assert!(!hasher.verify_async("wrong".to_string(), Some(digest)).await);
        assert!(!hasher.verify_async("s3cret-pass".to_string(), None).await);
    }
}
