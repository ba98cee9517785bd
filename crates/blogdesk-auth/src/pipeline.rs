//! Authentication followed by authorization for a single operation.

use std::sync::Arc;

use blogdesk_entity::user::Principal;

use crate::audit::{AuthAuditSink, AuthEvent};
use crate::error::AuthError;
use crate::rbac::{RoleSet, authorize};
use crate::resolver::PrincipalResolver;

/// Outcome of admitting a request to an operation.
#[derive(Debug, Clone)]
pub enum Admission {
    /// Public operation. Carries the caller's principal when a valid token was presented.
    Public(Option<Principal>),
    /// Protected operation; the principal holds one of the required roles.
    Authorized(Principal),
}

impl Admission {
    /// The admitted principal, if any.
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Self::Public(principal) => principal.as_ref(),
            Self::Authorized(principal) => Some(principal),
        }
    }

    /// Take the admitted principal, if any.
    pub fn into_principal(self) -> Option<Principal> {
        match self {
            Self::Public(principal) => principal,
            Self::Authorized(principal) => Some(principal),
        }
    }
}

/// Composes the resolver and the authorization decision.
///
/// The first failing stage ends the pipeline; the protected operation
/// never runs after a failure.
#[derive(Clone)]
pub struct AccessPipeline {
    resolver: PrincipalResolver,
    audit: Arc<dyn AuthAuditSink>,
}

impl std::fmt::Debug for AccessPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessPipeline")
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

impl AccessPipeline {
    /// Creates a pipeline.
    pub fn new(resolver: PrincipalResolver, audit: Arc<dyn AuthAuditSink>) -> Self {
        Self { resolver, audit }
    }

    /// The resolver this pipeline authenticates with.
    pub fn resolver(&self) -> &PrincipalResolver {
        &self.resolver
    }

    /// Admit a request presenting `token` to an operation requiring `required`.
    ///
    /// Public operations never fail; a bad token there is treated as no token.
    pub async fn admit(
        &self,
        token: Option<&str>,
        required: RoleSet,
    ) -> Result<Admission, AuthError> {
        if required.is_public() {
            return Ok(Admission::Public(self.resolver.resolve_optional(token).await));
        }

        let principal = match self.resolver.resolve(token).await {
            Ok(principal) => principal,
            Err(error) => return Err(self.deny(None, required, error)),
        };

        if let Err(error) = authorize(&required, Some(&principal)) {
            return Err(self.deny(Some(&principal), required, error));
        }

        self.audit.record(AuthEvent::AccessGranted {
            principal_id: Some(principal.id),
            required,
        });
        Ok(Admission::Authorized(principal))
    }

    fn deny(&self, principal: Option<&Principal>, required: RoleSet, error: AuthError) -> AuthError {
        self.audit.record(AuthEvent::AccessDenied {
            principal_id: principal.map(|p| p.id),
            required,
            error: &error,
        });
        error
    }
}
