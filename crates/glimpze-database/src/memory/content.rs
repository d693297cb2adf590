//! Content-side stores of the in-memory database.

use async_trait::async_trait;
use chrono::Utc;

use glimpze_core::error::AppError;
use glimpze_core::result::AppResult;
use glimpze_core::types::PageRequest;
use glimpze_entity::comment::Comment;
use glimpze_entity::post::{FeedItem, NewPost, Post, PostFile};
use glimpze_entity::social::{Follower, PostLike};
use glimpze_entity::tag::{PostTag, Tag};
use glimpze_entity::user::QuotaKind;

use super::{MemoryDatabase, PostRecord, Tables, next, paginate};
use crate::store::{
    CommentStore, FollowStore, LikeStore, PostStore, PostUpdate, TagStore, UpdatedPost,
};

fn insert_files(tables: &mut Tables, post_id: i64, post: &[glimpze_entity::post::NewPostFile]) {
    let now = Utc::now();
    tables.files.extend(post.iter().map(|f| PostFile {
        file_id: f.file_id,
        post_id,
        file_extension: f.file_extension.clone(),
        original_filename: f.original_filename.clone(),
        created_at: now,
    }));
}

fn feed_items(tables: &Tables, posts: Vec<Post>) -> Vec<FeedItem> {
    posts
        .into_iter()
        .map(|post| FeedItem {
            comment_count: tables.comment_count(post.id),
            post,
            image_links: Vec::new(),
        })
        .collect()
}

#[async_trait]
impl PostStore for MemoryDatabase {
    async fn create(&self, post: &NewPost) -> AppResult<Post> {
        let mut tables = self.tables.lock().await;
        tables.check_quota(post.user_id, QuotaKind::CreatePost)?;
        if !tables.users.contains_key(&post.user_id) {
            return Err(AppError::not_found(format!("User {} not found", post.user_id)));
        }

        tables.take_quota(post.user_id, QuotaKind::CreatePost);
        let now = Utc::now();
        let id = next(&mut tables.seq.posts);
        tables.posts.insert(
            id,
            PostRecord {
                id,
                title: post.title.clone(),
                content: post.content.clone(),
                user_id: post.user_id,
                created_at: now,
                updated_at: now,
            },
        );
        insert_files(&mut tables, id, &post.files);

        tables
            .post(id)
            .ok_or_else(|| AppError::internal("Created post vanished"))
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Post>> {
        Ok(self.tables.lock().await.post(id))
    }

    async fn list_by_user(&self, user_id: i64, page: &PageRequest) -> AppResult<Vec<Post>> {
        let tables = self.tables.lock().await;
        Ok(paginate(tables.posts_where(|p| p.user_id == user_id), page))
    }

    async fn list_by_tag(&self, tag_name: &str, page: &PageRequest) -> AppResult<Vec<Post>> {
        let tables = self.tables.lock().await;
        let tagged: Vec<i64> = tables
            .post_tags
            .values()
            .filter(|t| t.tag_name == tag_name)
            .map(|t| t.post_id)
            .collect();
        Ok(paginate(tables.posts_where(|p| tagged.contains(&p.id)), page))
    }

    async fn user_feed(&self, user_id: i64, page: &PageRequest) -> AppResult<Vec<FeedItem>> {
        let tables = self.tables.lock().await;
        let followed: Vec<i64> = tables
            .follows
            .values()
            .filter(|f| f.follower_id == user_id)
            .map(|f| f.user_id)
            .collect();
        let posts = tables.posts_where(|p| p.user_id == user_id || followed.contains(&p.user_id));
        Ok(feed_items(&tables, paginate(posts, page)))
    }

    async fn public_feed(&self, page: &PageRequest) -> AppResult<Vec<FeedItem>> {
        let tables = self.tables.lock().await;
        let mut posts = tables.posts_where(|_| true);
        // Stable sort keeps newest-first among equal like counts.
        posts.sort_by(|a, b| b.likes.cmp(&a.likes));
        Ok(feed_items(&tables, paginate(posts, page)))
    }

    async fn update(&self, id: i64, update: &PostUpdate) -> AppResult<UpdatedPost> {
        let mut tables = self.tables.lock().await;
        let record = tables
            .posts
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Post {id} not found")))?;

        if let Some(title) = &update.title {
            record.title = title.clone();
        }
        if let Some(content) = &update.content {
            record.content = content.clone();
        }
        record.updated_at = Utc::now();

        let mut removed_files = Vec::new();
        if let Some(files) = &update.files {
            let (removed, kept): (Vec<_>, Vec<_>) =
                tables.files.drain(..).partition(|f| f.post_id == id);
            tables.files = kept;
            removed_files = removed;
            insert_files(&mut tables, id, files);
        }

        let post = tables
            .post(id)
            .ok_or_else(|| AppError::not_found(format!("Post {id} not found")))?;
        Ok(UpdatedPost {
            post,
            removed_files,
        })
    }

    async fn delete(&self, id: i64) -> AppResult<Vec<PostFile>> {
        self.tables
            .lock()
            .await
            .remove_post(id)
            .ok_or_else(|| AppError::not_found(format!("Post {id} not found")))
    }
}

#[async_trait]
impl CommentStore for MemoryDatabase {
    async fn create(&self, post_id: i64, user_id: i64, content: &str) -> AppResult<Comment> {
        let mut tables = self.tables.lock().await;
        tables.check_quota(user_id, QuotaKind::Comment)?;
        if !tables.posts.contains_key(&post_id) {
            return Err(AppError::not_found(format!("Post {post_id} not found")));
        }

        tables.take_quota(user_id, QuotaKind::Comment);
        let now = Utc::now();
        let id = next(&mut tables.seq.comments);
        let comment = Comment {
            id,
            post_id,
            user_id,
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.comments.insert(id, comment.clone());
        Ok(comment)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Comment>> {
        Ok(self.tables.lock().await.comments.get(&id).cloned())
    }

    async fn list_by_post(&self, post_id: i64, page: &PageRequest) -> AppResult<Vec<Comment>> {
        let tables = self.tables.lock().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        Ok(paginate(comments, page))
    }

    async fn update(&self, id: i64, content: &str) -> AppResult<Comment> {
        let mut tables = self.tables.lock().await;
        let comment = tables
            .comments
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Comment {id} not found")))?;
        comment.content = content.to_string();
        comment.updated_at = Utc::now();
        Ok(comment.clone())
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        self.tables
            .lock()
            .await
            .comments
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(format!("Comment {id} not found")))
    }
}

#[async_trait]
impl LikeStore for MemoryDatabase {
    async fn like(&self, user_id: i64, post_id: i64) -> AppResult<PostLike> {
        let mut tables = self.tables.lock().await;
        tables.check_quota(user_id, QuotaKind::Like)?;
        if !tables.posts.contains_key(&post_id) {
            return Err(AppError::not_found(format!("Post {post_id} not found")));
        }
        if tables.likes.contains_key(&(user_id, post_id)) {
            return Err(AppError::conflict("Post already liked"));
        }

        tables.take_quota(user_id, QuotaKind::Like);
        let like = PostLike {
            user_id,
            post_id,
            created_at: Utc::now(),
        };
        tables.likes.insert((user_id, post_id), like.clone());
        Ok(like)
    }

    async fn unlike(&self, user_id: i64, post_id: i64) -> AppResult<()> {
        self.tables
            .lock()
            .await
            .likes
            .remove(&(user_id, post_id))
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("Like not found"))
    }
}

#[async_trait]
impl FollowStore for MemoryDatabase {
    async fn follow(&self, user_id: i64, follower_id: i64) -> AppResult<Follower> {
        if user_id == follower_id {
            return Err(AppError::validation("Users cannot follow themselves"));
        }
        let mut tables = self.tables.lock().await;
        tables.check_quota(follower_id, QuotaKind::Follow)?;
        if !tables.users.contains_key(&user_id) {
            return Err(AppError::not_found(format!("User {user_id} not found")));
        }
        if tables.follows.contains_key(&(user_id, follower_id)) {
            return Err(AppError::conflict("Already following this user"));
        }

        tables.take_quota(follower_id, QuotaKind::Follow);
        let follower = Follower {
            user_id,
            follower_id,
            created_at: Utc::now(),
        };
        tables.follows.insert((user_id, follower_id), follower.clone());
        Ok(follower)
    }

    async fn unfollow(&self, user_id: i64, follower_id: i64) -> AppResult<()> {
        self.tables
            .lock()
            .await
            .follows
            .remove(&(user_id, follower_id))
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("Not following this user"))
    }
}

#[async_trait]
impl TagStore for MemoryDatabase {
    async fn create(&self, name: &str) -> AppResult<Tag> {
        let mut tables = self.tables.lock().await;
        if tables.tags.values().any(|t| t.name == name) {
            return Err(AppError::conflict(format!("Tag '{name}' already exists")));
        }
        let id = next(&mut tables.seq.tags);
        let tag = Tag {
            id,
            name: name.to_string(),
            created_at: Utc::now(),
        };
        tables.tags.insert(id, tag.clone());
        Ok(tag)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Tag>> {
        Ok(self.tables.lock().await.tags.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Tag>> {
        let tables = self.tables.lock().await;
        Ok(tables.tags.values().find(|t| t.name == name).cloned())
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let mut tables = self.tables.lock().await;
        if tables.tags.remove(&id).is_none() {
            return Err(AppError::not_found(format!("Tag {id} not found")));
        }
        tables.post_tags.retain(|_, t| t.tag_id != id);
        Ok(())
    }

    async fn attach(&self, post_id: i64, tag: &Tag) -> AppResult<PostTag> {
        let mut tables = self.tables.lock().await;
        if !tables.posts.contains_key(&post_id) {
            return Err(AppError::not_found(format!("Post {post_id} not found")));
        }
        if !tables.tags.contains_key(&tag.id) {
            return Err(AppError::not_found(format!("Tag {} not found", tag.id)));
        }
        if tables.post_tags.contains_key(&(post_id, tag.id)) {
            return Err(AppError::conflict(format!(
                "Post already tagged '{}'",
                tag.name
            )));
        }
        let post_tag = PostTag {
            post_id,
            tag_id: tag.id,
            tag_name: tag.name.clone(),
        };
        tables.post_tags.insert((post_id, tag.id), post_tag.clone());
        Ok(post_tag)
    }

    async fn detach(&self, post_id: i64, tag_id: i64) -> AppResult<()> {
        self.tables
            .lock()
            .await
            .post_tags
            .remove(&(post_id, tag_id))
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("Tag is not attached to this post"))
    }

    async fn list_for_post(&self, post_id: i64) -> AppResult<Vec<PostTag>> {
        let tables = self.tables.lock().await;
        let mut tags: Vec<PostTag> = tables
            .post_tags
            .values()
            .filter(|t| t.post_id == post_id)
            .cloned()
            .collect();
        tags.sort_by(|a, b| a.tag_name.cmp(&b.tag_name));
        Ok(tags)
    }
}
