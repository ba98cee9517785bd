//! Authentication and authorization failures.

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

use blogdesk_core::error::{AppError, ErrorKind};
use blogdesk_entity::user::Role;

/// Message returned to clients for every authentication failure.
pub const AUTHENTICATION_FAILED: &str = "Authentication required. Please provide a valid token.";

/// Message returned to clients when login credentials do not match.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Message returned to clients when the role check fails.
pub const INSUFFICIENT_ROLE: &str = "Insufficient permissions to access this resource.";

/// Message returned to clients on a registration collision.
pub const DUPLICATE_IDENTITY: &str = "Username or email already exists";

/// Why a presented token was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    /// The expiry has passed.
    Expired,
    /// The signature does not match the header and claims.
    BadSignature,
    /// Not a well-formed token for the accepted algorithm.
    Malformed,
    /// The claims carry no subject.
    MissingSubject,
    /// The subject is not a principal identifier.
    MalformedSubject,
}

impl fmt::Display for TokenRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::Expired => "expired",
            Self::BadSignature => "signature mismatch",
            Self::Malformed => "malformed",
            Self::MissingSubject => "missing subject",
            Self::MalformedSubject => "malformed subject",
        };
        f.write_str(reason)
    }
}

/// Errors produced by the authentication and authorization core.
///
/// All variants are terminal for the current request.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No credentials were presented.
    #[error("missing credentials")]
    Unauthenticated,

    /// The token failed structural, signature or expiry validation.
    #[error("invalid token: {0}")]
    InvalidToken(TokenRejection),

    /// The token is valid but its subject no longer exists.
    #[error("principal {0} not found")]
    PrincipalNotFound(Uuid),

    /// The resolved principal is missing data every principal must carry.
    #[error("principal {0} has no role assigned")]
    InvalidPrincipalState(Uuid),

    /// The principal is authenticated but its role is not permitted.
    #[error("role '{role}' is not permitted")]
    Forbidden {
        /// The role the principal holds.
        role: Role,
    },

    /// Registration collided on username or email.
    #[error("username or email already exists")]
    DuplicateIdentity,

    /// Login key or password did not match.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Input rejected by the password policy.
    #[error("{0}")]
    Validation(String),

    /// Password hashing could not complete.
    #[error("password hashing failed: {0}")]
    Hashing(String),

    /// Token signing could not complete.
    #[error("token signing failed: {0}")]
    Signing(String),

    /// The credential store failed for a reason other than uniqueness.
    #[error("credential store failure: {0}")]
    Store(#[source] AppError),
}

impl AuthError {
    /// Whether this failure belongs to the authentication category.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            Self::Unauthenticated
                | Self::InvalidToken(_)
                | Self::PrincipalNotFound(_)
                | Self::InvalidPrincipalState(_)
                | Self::InvalidCredentials
        )
    }

    /// Classify a store error; uniqueness conflicts become `DuplicateIdentity`.
    pub fn from_store(err: AppError) -> Self {
        match err.kind {
            ErrorKind::Conflict => Self::DuplicateIdentity,
            _ => Self::Store(err),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthenticated
            | AuthError::InvalidToken(_)
            | AuthError::PrincipalNotFound(_)
            | AuthError::InvalidPrincipalState(_) => AppError::authentication(AUTHENTICATION_FAILED),
            AuthError::InvalidCredentials => AppError::authentication(INVALID_CREDENTIALS),
            AuthError::Forbidden { .. } => AppError::authorization(INSUFFICIENT_ROLE),
            AuthError::DuplicateIdentity => AppError::conflict(DUPLICATE_IDENTITY),
            AuthError::Validation(message) => AppError::validation(message),
            AuthError::Hashing(message) | AuthError::Signing(message) => {
                AppError::internal(message)
            }
            AuthError::Store(err) => err,
        }
    }
}
