//! Authentication audit events.
//!
//! The core never writes to a global logger directly; it reports what
//! happened to an [`AuthAuditSink`] supplied by the caller.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use blogdesk_entity::user::Role;

use crate::error::AuthError;
use crate::rbac::RoleSet;

/// Something worth recording about an authentication decision.
///
/// Events never carry passwords, digests or token strings.
#[derive(Debug)]
pub enum AuthEvent<'a> {
    /// A principal was created.
    Registered {
        principal_id: Uuid,
        username: &'a str,
        role: Role,
    },
    /// Registration was refused.
    RegistrationRejected {
        username: &'a str,
        error: &'a AuthError,
    },
    /// Login succeeded.
    LoginSucceeded { principal_id: Uuid, username: &'a str },
    /// Login failed. `key` is the username or email presented.
    LoginFailed { key: &'a str },
    /// A token was issued.
    TokenIssued {
        principal_id: Uuid,
        expires_at: DateTime<Utc>,
    },
    /// A bearer token resolved to a live principal.
    PrincipalResolved { principal_id: Uuid, role: Role },
    /// A bearer token could not be resolved.
    ResolutionFailed { error: &'a AuthError },
    /// An operation was admitted.
    AccessGranted {
        principal_id: Option<Uuid>,
        required: RoleSet,
    },
    /// An operation was refused.
    AccessDenied {
        principal_id: Option<Uuid>,
        required: RoleSet,
        error: &'a AuthError,
    },
    /// A principal's password was replaced.
    PasswordChanged { principal_id: Uuid },
    /// A principal's role was replaced.
    RoleChanged { principal_id: Uuid, role: Role },
}

/// Receiver for [`AuthEvent`]s.
pub trait AuthAuditSink: Send + Sync + 'static {
    /// Record one event.
    fn record(&self, event: AuthEvent<'_>);
}

/// Sink that forwards events to `tracing` under the `blogdesk::auth` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuthAuditSink for TracingAuditSink {
    fn record(&self, event: AuthEvent<'_>) {
        match event {
            AuthEvent::Registered {
                principal_id,
                username,
                role,
            } => {
                tracing::info!(target: "blogdesk::auth", %principal_id, username, %role, "Principal registered");
            }
            AuthEvent::RegistrationRejected { username, error } => {
                tracing::warn!(target: "blogdesk::auth", username, %error, "Registration rejected");
            }
            AuthEvent::LoginSucceeded {
                principal_id,
                username,
            } => {
                tracing::info!(target: "blogdesk::auth", %principal_id, username, "Login succeeded");
            }
            AuthEvent::LoginFailed { key } => {
                tracing::warn!(target: "blogdesk::auth", key, "Login failed");
            }
            AuthEvent::TokenIssued {
                principal_id,
                expires_at,
            } => {
                tracing::debug!(target: "blogdesk::auth", %principal_id, %expires_at, "Token issued");
            }
            AuthEvent::PrincipalResolved { principal_id, role } => {
                tracing::debug!(target: "blogdesk::auth", %principal_id, %role, "Principal resolved");
            }
            AuthEvent::ResolutionFailed { error } => {
                tracing::warn!(target: "blogdesk::auth", %error, "Token resolution failed");
            }
            AuthEvent::AccessGranted {
                principal_id,
                required,
            } => {
                tracing::debug!(target: "blogdesk::auth", principal_id = ?principal_id, %required, "Access granted");
            }
            AuthEvent::AccessDenied {
                principal_id,
                required,
                error,
            } => {
                tracing::warn!(target: "blogdesk::auth", principal_id = ?principal_id, %required, %error, "Access denied");
            }
            AuthEvent::PasswordChanged { principal_id } => {
                tracing::info!(target: "blogdesk::auth", %principal_id, "Password changed");
            }
            AuthEvent::RoleChanged { principal_id, role } => {
                tracing::info!(target: "blogdesk::auth", %principal_id, %role, "Role changed");
            }
        }
    }
}
