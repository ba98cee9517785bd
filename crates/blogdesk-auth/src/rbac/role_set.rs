//! The set of roles an operation admits.

use std::fmt;

use blogdesk_entity::user::Role;

/// Roles permitted to invoke an operation.
///
/// An empty set marks a public operation that needs no authentication.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RoleSet {
    bits: u8,
}

const fn bit(role: Role) -> u8 {
    match role {
        Role::User => 1,
        Role::Editor => 1 << 1,
        Role::Admin => 1 << 2,
    }
}

impl RoleSet {
    /// Public operation: no role required, no authentication required.
    pub const fn public() -> Self {
        Self { bits: 0 }
    }

    /// Any authenticated principal, whatever its role.
    pub const fn any_role() -> Self {
        Self {
            bits: bit(Role::User) | bit(Role::Editor) | bit(Role::Admin),
        }
    }

    /// Exactly the given roles.
    pub fn of(roles: &[Role]) -> Self {
        roles.iter().copied().collect()
    }

    /// Whether `role` is in the set.
    pub const fn contains(&self, role: Role) -> bool {
        self.bits & bit(role) != 0
    }

    /// Whether the operation is public.
    pub const fn is_public(&self) -> bool {
        self.bits == 0
    }

    /// The member roles, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        Role::ALL.into_iter().filter(|r| self.contains(*r))
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        let bits = iter.into_iter().fold(0, |acc, role| acc | bit(role));
        Self { bits }
    }
}

impl fmt::Debug for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_public() {
            return f.write_str("public");
        }
        let names: Vec<&str> = self.iter().map(|r| r.as_str()).collect();
        f.write_str(&names.join("|"))
    }
}
