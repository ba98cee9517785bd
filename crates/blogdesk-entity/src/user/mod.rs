//! Principal (user account) domain entities.

pub mod model;
pub mod role;

pub use model::{MissingRole, NewPrincipal, PasswordDigest, Principal, PrincipalRecord};
pub use role::Role;
