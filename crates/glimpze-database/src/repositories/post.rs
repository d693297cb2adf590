//! Post repository implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool};

use glimpze_core::error::AppError;
use glimpze_core::result::AppResult;
use glimpze_core::types::PageRequest;
use glimpze_entity::post::{FeedItem, NewPost, NewPostFile, Post, PostFile};
use glimpze_entity::user::QuotaKind;

use super::quota::consume_on;
use crate::error::database;
use crate::store::{PostStore, PostUpdate, UpdatedPost};

/// Posts with author name and aggregate counts. Aggregates use correlated
/// subqueries so joins never multiply the counts.
const SELECT_POST: &str = "\
    SELECT p.id, p.title, p.content, p.user_id, u.name AS username, \
           p.created_at, p.updated_at, \
           (SELECT COUNT(*) FROM post_likes pl WHERE pl.post_id = p.id) AS likes, \
           (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count, \
           COALESCE( \
               (SELECT ARRAY_AGG(pt.tag_name ORDER BY pt.tag_name) \
                FROM post_tags pt WHERE pt.post_id = p.id), \
               ARRAY[]::VARCHAR[]) AS tags \
    FROM posts p \
    JOIN users u ON u.id = p.user_id";

#[derive(Debug, FromRow)]
struct PostRow {
    id: i64,
    title: String,
    content: String,
    user_id: i64,
    username: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    likes: i64,
    comment_count: i64,
    tags: Vec<String>,
}

impl PostRow {
    fn into_post(self, files: Vec<PostFile>) -> (Post, i64) {
        let post = Post {
            id: self.id,
            title: self.title,
            content: self.content,
            user_id: self.user_id,
            username: self.username,
            likes: self.likes,
            files,
            tags: self.tags,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        (post, self.comment_count)
    }
}

/// Repository for posts and their attachment rows.
#[derive(Debug, Clone)]
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    /// Create a new post repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load the attachments of every listed post in one query.
    async fn files_for(
        conn: &mut PgConnection,
        post_ids: &[i64],
    ) -> AppResult<HashMap<i64, Vec<PostFile>>> {
        let mut by_post: HashMap<i64, Vec<PostFile>> = HashMap::new();
        if post_ids.is_empty() {
            return Ok(by_post);
        }

        let files = sqlx::query_as::<_, PostFile>(
            "SELECT file_id, post_id, file_extension, original_filename, created_at \
             FROM post_files WHERE post_id = ANY($1) \
             ORDER BY created_at, file_id",
        )
        .bind(post_ids)
        .fetch_all(conn)
        .await
        .map_err(|e| database("Failed to load post files", e))?;

        for file in files {
            by_post.entry(file.post_id).or_default().push(file);
        }
        Ok(by_post)
    }

    async fn assemble(conn: &mut PgConnection, rows: Vec<PostRow>) -> AppResult<Vec<(Post, i64)>> {
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut files = Self::files_for(conn, &ids).await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let attached = files.remove(&row.id).unwrap_or_default();
                row.into_post(attached)
            })
            .collect())
    }

    async fn load(conn: &mut PgConnection, id: i64) -> AppResult<Option<Post>> {
        let row = sqlx::query_as::<_, PostRow>(&format!("{SELECT_POST} WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| database("Failed to find post", e))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut posts = Self::assemble(conn, vec![row]).await?;
        Ok(posts.pop().map(|(post, _)| post))
    }

    async fn insert_files(
        conn: &mut PgConnection,
        post_id: i64,
        files: &[NewPostFile],
    ) -> AppResult<()> {
        for file in files {
            sqlx::query(
                "INSERT INTO post_files (file_id, post_id, file_extension, original_filename) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(file.file_id)
            .bind(post_id)
            .bind(&file.file_extension)
            .bind(&file.original_filename)
            .execute(&mut *conn)
            .await
            .map_err(|e| database("Failed to create post file", e))?;
        }
        Ok(())
    }

    async fn list(&self, sql: String, binder: ListBind<'_>) -> AppResult<Vec<(Post, i64)>> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| database("Failed to acquire connection", e))?;

        let query = sqlx::query_as::<_, PostRow>(&sql);
        let query = match binder {
            ListBind::None => query,
            ListBind::Id(id) => query.bind(id),
            ListBind::Name(name) => query.bind(name),
        };

        let rows = query
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| database("Failed to list posts", e))?;

        Self::assemble(&mut conn, rows).await
    }
}

/// The single filter parameter of a listing query, bound as `$1`.
enum ListBind<'a> {
    None,
    Id(i64),
    Name(&'a str),
}

fn page_clause(page: &PageRequest) -> String {
    format!("LIMIT {} OFFSET {}", page.limit(), page.offset())
}

fn feed_items(posts: Vec<(Post, i64)>) -> Vec<FeedItem> {
    posts
        .into_iter()
        .map(|(post, comment_count)| FeedItem {
            post,
            comment_count,
            image_links: Vec::new(),
        })
        .collect()
}

#[async_trait]
impl PostStore for PostRepository {
    async fn create(&self, post: &NewPost) -> AppResult<Post> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| database("Failed to begin transaction", e))?;

        consume_on(&mut tx, post.user_id, QuotaKind::CreatePost).await?;

        let post_id: i64 = sqlx::query_scalar(
            "INSERT INTO posts (title, content, user_id) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.user_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| database("Failed to create post", e))?;

        Self::insert_files(&mut tx, post_id, &post.files).await?;

        let created = Self::load(&mut tx, post_id)
            .await?
            .ok_or_else(|| AppError::internal("Created post vanished before commit"))?;

        tx.commit()
            .await
            .map_err(|e| database("Failed to commit post", e))?;

        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Post>> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| database("Failed to acquire connection", e))?;
        Self::load(&mut conn, id).await
    }

    async fn list_by_user(&self, user_id: i64, page: &PageRequest) -> AppResult<Vec<Post>> {
        let sql = format!(
            "{SELECT_POST} WHERE p.user_id = $1 ORDER BY p.created_at DESC, p.id DESC {}",
            page_clause(page)
        );
        let posts = self.list(sql, ListBind::Id(user_id)).await?;
        Ok(posts.into_iter().map(|(post, _)| post).collect())
    }

    async fn list_by_tag(&self, tag_name: &str, page: &PageRequest) -> AppResult<Vec<Post>> {
        let sql = format!(
            "{SELECT_POST} \
             WHERE EXISTS (SELECT 1 FROM post_tags pt WHERE pt.post_id = p.id AND pt.tag_name = $1) \
             ORDER BY p.created_at DESC, p.id DESC {}",
            page_clause(page)
        );
        let posts = self.list(sql, ListBind::Name(tag_name)).await?;
        Ok(posts.into_iter().map(|(post, _)| post).collect())
    }

    async fn user_feed(&self, user_id: i64, page: &PageRequest) -> AppResult<Vec<FeedItem>> {
        let sql = format!(
            "{SELECT_POST} \
             WHERE p.user_id = $1 \
                OR p.user_id IN (SELECT f.user_id FROM followers f WHERE f.follower_id = $1) \
             ORDER BY p.created_at DESC, p.id DESC {}",
            page_clause(page)
        );
        Ok(feed_items(self.list(sql, ListBind::Id(user_id)).await?))
    }

    async fn public_feed(&self, page: &PageRequest) -> AppResult<Vec<FeedItem>> {
        let sql = format!(
            "{SELECT_POST} ORDER BY likes DESC, p.created_at DESC, p.id DESC {}",
            page_clause(page)
        );
        Ok(feed_items(self.list(sql, ListBind::None).await?))
    }

    async fn update(&self, id: i64, update: &PostUpdate) -> AppResult<UpdatedPost> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| database("Failed to begin transaction", e))?;

        let result = sqlx::query(
            "UPDATE posts SET \
                title = COALESCE($2, title), \
                content = COALESCE($3, content), \
                updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(update.title.as_deref())
        .bind(update.content.as_deref())
        .execute(&mut *tx)
        .await
        .map_err(|e| database("Failed to update post", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Post {id} not found")));
        }

        let mut removed_files = Vec::new();
        if let Some(files) = &update.files {
            removed_files = sqlx::query_as::<_, PostFile>(
                "DELETE FROM post_files WHERE post_id = $1 \
                 RETURNING file_id, post_id, file_extension, original_filename, created_at",
            )
            .bind(id)
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| database("Failed to remove post files", e))?;

            Self::insert_files(&mut tx, id, files).await?;
        }

        let post = Self::load(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Post {id} not found")))?;

        tx.commit()
            .await
            .map_err(|e| database("Failed to commit post update", e))?;

        Ok(UpdatedPost {
            post,
            removed_files,
        })
    }

    async fn delete(&self, id: i64) -> AppResult<Vec<PostFile>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| database("Failed to begin transaction", e))?;

        let files = sqlx::query_as::<_, PostFile>(
            "DELETE FROM post_files WHERE post_id = $1 \
             RETURNING file_id, post_id, file_extension, original_filename, created_at",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| database("Failed to delete post files", e))?;

        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| database("Failed to delete post", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Post {id} not found")));
        }

        tx.commit()
            .await
            .map_err(|e| database("Failed to commit post deletion", e))?;

        Ok(files)
    }
}
