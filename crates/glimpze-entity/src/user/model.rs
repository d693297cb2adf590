//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::limit::UserLimit;
use super::role::Role;

/// A registered user together with its role and quota ledger row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: i64,
    /// Unique handle.
    pub name: String,
    /// Human-readable display name.
    pub display_name: String,
    /// Unique email address.
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// When the account was activated, if it has been.
    pub activated_at: Option<DateTime<Utc>>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
    /// Assigned role.
    pub role: Role,
    /// Remaining daily quota.
    pub limits: UserLimit,
}

impl User {
    /// Whether the account has been activated.
    pub fn is_activated(&self) -> bool {
        self.activated_at.is_some()
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Desired handle.
    pub name: String,
    /// Display name.
    pub display_name: String,
    /// Email address.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Role name to assign.
    pub role_name: String,
}
