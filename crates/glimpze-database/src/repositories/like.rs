//! Post like repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use glimpze_core::error::AppError;
use glimpze_core::result::AppResult;
use glimpze_entity::social::PostLike;
use glimpze_entity::user::QuotaKind;

use super::quota::consume_on;
use crate::error::{constraint, database};
use crate::store::LikeStore;

#[derive(Debug, Clone)]
pub struct LikeRepository {
    pool: PgPool,
}

impl LikeRepository {
    /// Create a new like repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LikeStore for LikeRepository {
    async fn like(&self, user_id: i64, post_id: i64) -> AppResult<PostLike> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| database("Failed to begin transaction", e))?;

        consume_on(&mut tx, user_id, QuotaKind::Like).await?;

        let like = sqlx::query_as::<_, PostLike>(
            "INSERT INTO post_likes (user_id, post_id) VALUES ($1, $2) \
             RETURNING user_id, post_id, created_at",
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match constraint(&e) {
            Some("post_likes_pkey") => AppError::conflict("Post already liked"),
            Some("post_likes_post_id_fkey") => {
                AppError::not_found(format!("Post {post_id} not found"))
            }
            _ => database("Failed to like post", e),
        })?;

        tx.commit()
            .await
            .map_err(|e| database("Failed to commit like", e))?;

        Ok(like)
    }

    async fn unlike(&self, user_id: i64, post_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM post_likes WHERE user_id = $1 AND post_id = $2")
            .bind(user_id)
            .bind(post_id)
            .execute(&self.pool)
            .await
            .map_err(|e| database("Failed to unlike post", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Like not found"));
        }
        Ok(())
    }
}
