//! # blogdesk-auth
//!
//! Authentication and authorization for the BlogDesk content API.
//!
//! ## Modules
//!
//! - `password`: Argon2id hashing and password policy
//! - `jwt`: token claims, issuance and verification
//! - `resolver`: bearer token to live, store-backed principal
//! - `rbac`: role sets and the authorization decision
//! - `pipeline`: authentication-then-authorization for one operation
//! - `credentials`: registration, login and administrative credential changes
//! - `audit`: injected sink for authentication events

pub mod audit;
pub mod credentials;
pub mod error;
pub mod jwt;
pub mod password;
pub mod pipeline;
pub mod rbac;
pub mod resolver;

pub use audit::{AuthAuditSink, AuthEvent, TracingAuditSink};
pub use credentials::{AuthSession, CredentialService, Registration};
pub use error::{AuthError, TokenRejection};
pub use jwt::{Claims, IssuedToken, TokenIssuer, TokenVerifier};
pub use password::{PasswordHasher, PasswordPolicy};
pub use pipeline::{AccessPipeline, Admission};
pub use rbac::{RoleSet, authorize};
pub use resolver::PrincipalResolver;
