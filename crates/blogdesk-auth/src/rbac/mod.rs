//! Role-based access control.
//!
//! Each protected operation declares a [`RoleSet`]; [`authorize`] decides
//! whether a resolved principal may proceed.

pub mod enforcer;
pub mod role_set;

pub use enforcer::authorize;
pub use role_set::RoleSet;
