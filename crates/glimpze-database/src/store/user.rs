//! Accounts, roles and profiles.

use async_trait::async_trait;

use glimpze_core::config::QuotaGrant;
use glimpze_core::result::AppResult;
use glimpze_entity::token::UserToken;
use glimpze_entity::user::{NewUser, Role, User, UserProfile};

/// User accounts, loaded together with their role and quota row.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug {
    /// Find a user by primary key.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    /// Find a user by email address.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find a user by unique name.
    async fn find_by_name(&self, name: &str) -> AppResult<Option<User>>;

    /// Create the user, its quota row seeded with `initial`, and the
    /// activation token, all in one transaction.
    ///
    /// Fails with `Conflict` when the name or email is taken and with
    /// `NotFound` when `user.role_name` does not exist.
    async fn register(
        &self,
        user: &NewUser,
        initial: &QuotaGrant,
        activation: &UserToken,
    ) -> AppResult<User>;

    /// Mark the owner of a live activation token as activated and drop its
    /// activation tokens. Unknown or expired tokens yield `NotFound`.
    async fn activate(&self, token_hash: &[u8]) -> AppResult<User>;

    /// Assign the named role to the named user.
    async fn update_role(&self, user_name: &str, role_name: &str) -> AppResult<User>;

    /// Remove a user and everything it owns.
    async fn delete(&self, id: i64) -> AppResult<()>;
}

/// Role lookup.
#[async_trait]
pub trait RoleStore: Send + Sync + std::fmt::Debug {
    /// Find a role by name.
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>>;
}

/// Free-form user profiles.
#[async_trait]
pub trait ProfileStore: Send + Sync + std::fmt::Debug {
    /// The profile of a user, if one was ever written.
    async fn find(&self, user_id: i64) -> AppResult<Option<UserProfile>>;

    /// Create or replace a user's profile.
    async fn upsert(&self, user_id: i64, biodata: &str) -> AppResult<UserProfile>;
}
