//! Follower repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use glimpze_core::error::AppError;
use glimpze_core::result::AppResult;
use glimpze_entity::social::Follower;
use glimpze_entity::user::QuotaKind;

use super::quota::consume_on;
use crate::error::{constraint, database};
use crate::store::FollowStore;

#[derive(Debug, Clone)]
pub struct FollowRepository {
    pool: PgPool,
}

impl FollowRepository {
    /// Create a new follower repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FollowStore for FollowRepository {
    async fn follow(&self, user_id: i64, follower_id: i64) -> AppResult<Follower> {
        if user_id == follower_id {
            return Err(AppError::validation("Users cannot follow themselves"));
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| database("Failed to begin transaction", e))?;

        consume_on(&mut tx, follower_id, QuotaKind::Follow).await?;

        let follower = sqlx::query_as::<_, Follower>(
            "INSERT INTO followers (user_id, follower_id) VALUES ($1, $2) \
             RETURNING user_id, follower_id, created_at",
        )
        .bind(user_id)
        .bind(follower_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match constraint(&e) {
            Some("followers_pkey") => AppError::conflict("Already following this user"),
            Some("followers_user_id_fkey") => {
                AppError::not_found(format!("User {user_id} not found"))
            }
            _ => database("Failed to follow user", e),
        })?;

        tx.commit()
            .await
            .map_err(|e| database("Failed to commit follow", e))?;

        Ok(follower)
    }

    async fn unfollow(&self, user_id: i64, follower_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM followers WHERE user_id = $1 AND follower_id = $2")
            .bind(user_id)
            .bind(follower_id)
            .execute(&self.pool)
            .await
            .map_err(|e| database("Failed to unfollow user", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Not following this user"));
        }
        Ok(())
    }
}
