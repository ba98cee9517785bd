//! The authorization decision.

use blogdesk_entity::user::Principal;

use super::RoleSet;
use crate::error::AuthError;

/// Decide whether `principal` may invoke an operation requiring `required`.
///
/// Public operations admit everyone, including no principal at all. For
/// any other set, a missing principal fails with
/// [`AuthError::Unauthenticated`] and a role outside the set fails with
/// [`AuthError::Forbidden`]. Membership is exact: roles imply nothing
/// about one another.
pub fn authorize(required: &RoleSet, principal: Option<&Principal>) -> Result<(), AuthError> {
    if required.is_public() {
        return Ok(());
    }

    let principal = principal.ok_or(AuthError::Unauthenticated)?;
    if required.contains(principal.role) {
        Ok(())
    } else {
        Err(AuthError::Forbidden {
            role: principal.role,
        })
    }
}
