//! Comment repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use glimpze_core::error::AppError;
use glimpze_core::result::AppResult;
use glimpze_core::types::PageRequest;
use glimpze_entity::comment::Comment;
use glimpze_entity::user::QuotaKind;

use super::quota::consume_on;
use crate::error::{constraint, database};
use crate::store::CommentStore;

/// Repository for comments.
#[derive(Debug, Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    /// Create a new comment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentStore for CommentRepository {
    async fn create(&self, post_id: i64, user_id: i64, content: &str) -> AppResult<Comment> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| database("Failed to begin transaction", e))?;

        consume_on(&mut tx, user_id, QuotaKind::Comment).await?;

        let comment = sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (post_id, user_id, content) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(post_id)
        .bind(user_id)
        .bind(content)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match constraint(&e) {
            Some("comments_post_id_fkey") => {
                AppError::not_found(format!("Post {post_id} not found"))
            }
            _ => database("Failed to create comment", e),
        })?;

        tx.commit()
            .await
            .map_err(|e| database("Failed to commit comment", e))?;

        Ok(comment)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Comment>> {
        sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database("Failed to find comment", e))
    }

    async fn list_by_post(&self, post_id: i64, page: &PageRequest) -> AppResult<Vec<Comment>> {
        sqlx::query_as::<_, Comment>(
            "SELECT * FROM comments WHERE post_id = $1 \
             ORDER BY created_at ASC, id ASC LIMIT $2 OFFSET $3",
        )
        .bind(post_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database("Failed to list comments", e))
    }

    async fn update(&self, id: i64, content: &str) -> AppResult<Comment> {
        sqlx::query_as::<_, Comment>(
            "UPDATE comments SET content = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(content)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database("Failed to update comment", e))?
        .ok_or_else(|| AppError::not_found(format!("Comment {id} not found")))
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| database("Failed to delete comment", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Comment {id} not found")));
        }
        Ok(())
    }
}
