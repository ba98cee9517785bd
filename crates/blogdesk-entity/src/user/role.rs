//! Principal role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles available to principals.
///
/// The set is closed and carries no hierarchy: `Admin` does not imply
/// `Editor`. Authorization checks compare by exact membership only.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "principal_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular account; the role assigned when none is requested.
    #[default]
    User,
    /// May author and edit content.
    Editor,
    /// Full administrative access.
    Admin,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Role; 3] = [Role::User, Role::Editor, Role::Admin];

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Editor => "editor",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = blogdesk_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" => Ok(Self::User),
            "editor" => Ok(Self::Editor),
            "admin" => Ok(Self::Admin),
            _ => Err(blogdesk_core::AppError::validation(format!(
                "Invalid role: '{s}'. Expected one of: user, editor, admin"
            ))),
        }
    }
}
