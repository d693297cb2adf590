//! Tag repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use glimpze_core::error::AppError;
use glimpze_core::result::AppResult;
use glimpze_entity::tag::{PostTag, Tag};

use crate::error::{constraint, database};
use crate::store::TagStore;

/// Repository for `tags` and `post_tags`.
#[derive(Debug, Clone)]
pub struct TagRepository {
    pool: PgPool,
}

impl TagRepository {
    /// Create a new tag repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagStore for TagRepository {
    async fn create(&self, name: &str) -> AppResult<Tag> {
        sqlx::query_as::<_, Tag>("INSERT INTO tags (name) VALUES ($1) RETURNING *")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match constraint(&e) {
                Some("tags_name_key") => AppError::conflict(format!("Tag '{name}' already exists")),
                _ => database("Failed to create tag", e),
            })
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Tag>> {
        sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database("Failed to find tag by id", e))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Tag>> {
        sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database("Failed to find tag by name", e))
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| database("Failed to delete tag", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Tag {id} not found")));
        }
        Ok(())
    }

    async fn attach(&self, post_id: i64, tag: &Tag) -> AppResult<PostTag> {
        sqlx::query_as::<_, PostTag>(
            "INSERT INTO post_tags (post_id, tag_id, tag_name) VALUES ($1, $2, $3) \
             RETURNING post_id, tag_id, tag_name",
        )
        .bind(post_id)
        .bind(tag.id)
        .bind(&tag.name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match constraint(&e) {
            Some("post_tags_pkey") => {
                AppError::conflict(format!("Post already tagged '{}'", tag.name))
            }
            Some("post_tags_post_id_fkey") => {
                AppError::not_found(format!("Post {post_id} not found"))
            }
            Some("post_tags_tag_id_fkey") => {
                AppError::not_found(format!("Tag {} not found", tag.id))
            }
            _ => database("Failed to tag post", e),
        })
    }

    async fn detach(&self, post_id: i64, tag_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM post_tags WHERE post_id = $1 AND tag_id = $2")
            .bind(post_id)
            .bind(tag_id)
            .execute(&self.pool)
            .await
            .map_err(|e| database("Failed to untag post", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Tag is not attached to this post"));
        }
        Ok(())
    }

    async fn list_for_post(&self, post_id: i64) -> AppResult<Vec<PostTag>> {
        sqlx::query_as::<_, PostTag>(
            "SELECT post_id, tag_id, tag_name FROM post_tags WHERE post_id = $1 ORDER BY tag_name",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database("Failed to list post tags", e))
    }
}
