//! User-facing account operations.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use glimpze_auth::RoleGuard;
use glimpze_core::error::AppError;
use glimpze_core::result::AppResult;
use glimpze_database::store::{ProfileStore, UserStore};
use glimpze_entity::user::{ADMIN_ROLE, User, UserProfile};

/// Maximum biography length in characters.
const MAX_BIODATA_LEN: usize = 1024;

/// A user together with their profile, if they wrote one.
#[derive(Debug, Clone, Serialize)]
pub struct UserDetails {
    #[serde(flatten)]
    pub user: User,
    pub profile: Option<UserProfile>,
}

/// Reads users and manages profiles and roles.
#[derive(Debug, Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    profiles: Arc<dyn ProfileStore>,
    guard: RoleGuard,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        users: Arc<dyn UserStore>,
        profiles: Arc<dyn ProfileStore>,
        guard: RoleGuard,
    ) -> Self {
        Self {
            users,
            profiles,
            guard,
        }
    }

    /// A user and their profile.
    pub async fn get(&self, id: i64) -> AppResult<UserDetails> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        self.details(user).await
    }

    /// Attaches the profile to an already loaded user.
    pub async fn details(&self, user: User) -> AppResult<UserDetails> {
        let profile = self.profiles.find(user.id).await?;
        Ok(UserDetails { user, profile })
    }

    /// Creates or replaces the caller's profile.
    pub async fn update_profile(&self, user: &User, biodata: &str) -> AppResult<UserProfile> {
        let biodata = biodata.trim();
        if biodata.chars().count() > MAX_BIODATA_LEN {
            return Err(AppError::validation(format!(
                "Biodata must be at most {MAX_BIODATA_LEN} characters"
            )));
        }
        self.profiles.upsert(user.id, biodata).await
    }

    /// Gives the user named `user_name` the role `role_name`. Admins only.
    pub async fn update_role(
        &self,
        actor: &User,
        user_name: &str,
        role_name: &str,
    ) -> AppResult<User> {
        self.guard.require_role(actor, ADMIN_ROLE).await?;

        let user = self.users.update_role(user_name, role_name.trim()).await?;
        info!(
            user_id = user.id,
            role = %user.role.name,
            actor_id = actor.id,
            "User role changed"
        );
        Ok(user)
    }
}
