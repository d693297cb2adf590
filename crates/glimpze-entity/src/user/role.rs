//! Role definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Name of the role assigned at registration.
pub const DEFAULT_ROLE: &str = "user";
/// Name of the role allowed to edit others' content and manage tags.
pub const MODERATOR_ROLE: &str = "moderator";
/// Name of the role allowed to delete others' content and change roles.
pub const ADMIN_ROLE: &str = "admin";

/// A role row.
///
/// Roles are ordered by `level` only. Gates compare levels and never role
/// names, so a new role can be slotted into the hierarchy by inserting a
/// row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Role {
    /// Role identifier.
    pub id: i64,
    /// Unique role name.
    pub name: String,
    /// Privilege level (higher = more privileged).
    pub level: i32,
    /// Human-readable description.
    pub description: String,
    /// When the role was created.
    pub created_at: DateTime<Utc>,
}

impl Role {
    /// Check if this role has at least the given role's privileges.
    pub fn has_at_least(&self, required: &Role) -> bool {
        self.level >= required.level
    }
}
