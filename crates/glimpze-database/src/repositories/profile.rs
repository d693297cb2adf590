//! User profile repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use glimpze_core::error::AppError;
use glimpze_core::result::AppResult;
use glimpze_entity::user::UserProfile;

use crate::error::{constraint, database};
use crate::store::ProfileStore;

#[derive(Debug, Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    /// Create a new profile repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for ProfileRepository {
    async fn find(&self, user_id: i64) -> AppResult<Option<UserProfile>> {
        sqlx::query_as::<_, UserProfile>("SELECT * FROM user_profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database("Failed to find user profile", e))
    }

    async fn upsert(&self, user_id: i64, biodata: &str) -> AppResult<UserProfile> {
        sqlx::query_as::<_, UserProfile>(
            "INSERT INTO user_profiles (user_id, biodata) VALUES ($1, $2) \
             ON CONFLICT (user_id) DO UPDATE SET \
                biodata = EXCLUDED.biodata, \
                updated_at = NOW() \
             RETURNING *",
        )
        .bind(user_id)
        .bind(biodata)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match constraint(&e) {
            Some("user_profiles_user_id_fkey") => {
                AppError::not_found(format!("User {user_id} not found"))
            }
            _ => database("Failed to upsert user profile", e),
        })
    }
}
