//! Tag vocabulary management and tagging of posts.

use std::sync::Arc;

use tracing::info;

use glimpze_auth::RoleGuard;
use glimpze_core::error::AppError;
use glimpze_core::result::AppResult;
use glimpze_database::store::{PostStore, TagStore};
use glimpze_entity::tag::{PostTag, Tag};
use glimpze_entity::user::{MODERATOR_ROLE, User};

use crate::post::service::check_text;

/// Maximum tag name length in characters.
const MAX_TAG_LEN: usize = 50;

/// Manages tags. Moderators own the vocabulary; a post's author or a
/// moderator may tag the post.
#[derive(Debug, Clone)]
pub struct TagService {
    tags: Arc<dyn TagStore>,
    posts: Arc<dyn PostStore>,
    guard: RoleGuard,
}

impl TagService {
    /// Creates a new tag service.
    pub fn new(tags: Arc<dyn TagStore>, posts: Arc<dyn PostStore>, guard: RoleGuard) -> Self {
        Self { tags, posts, guard }
    }

    /// Adds `name` to the vocabulary.
    pub async fn create(&self, actor: &User, name: &str) -> AppResult<Tag> {
        self.guard.require_role(actor, MODERATOR_ROLE).await?;
        let name = normalize(name)?;
        let tag = self.tags.create(&name).await?;
        info!(tag_id = tag.id, name = %tag.name, user_id = actor.id, "Tag created");
        Ok(tag)
    }

    /// A tag by id.
    pub async fn get(&self, id: i64) -> AppResult<Tag> {
        self.tags
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Tag {id} not found")))
    }

    /// Removes a tag everywhere.
    pub async fn delete(&self, actor: &User, id: i64) -> AppResult<()> {
        self.guard.require_role(actor, MODERATOR_ROLE).await?;
        self.tags.delete(id).await?;
        info!(tag_id = id, user_id = actor.id, "Tag deleted");
        Ok(())
    }

    /// Tags attached to a post.
    pub async fn list_for_post(&self, post_id: i64) -> AppResult<Vec<PostTag>> {
        self.tags.list_for_post(post_id).await
    }

    /// Attaches the existing tag `name` to a post.
    pub async fn attach(&self, actor: &User, post_id: i64, name: &str) -> AppResult<PostTag> {
        self.require_post_editor(actor, post_id).await?;

        let name = normalize(name)?;
        let tag = self
            .tags
            .find_by_name(&name)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Tag '{name}' not found")))?;

        self.tags.attach(post_id, &tag).await
    }

    /// Detaches a tag from a post.
    pub async fn detach(&self, actor: &User, post_id: i64, tag_id: i64) -> AppResult<()> {
        self.require_post_editor(actor, post_id).await?;
        self.tags.detach(post_id, tag_id).await
    }

    async fn require_post_editor(&self, actor: &User, post_id: i64) -> AppResult<()> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Post {post_id} not found")))?;
        self.guard
            .require_owner_or_role(actor, post.user_id, MODERATOR_ROLE)
            .await
    }
}

/// Tags are stored trimmed and lowercased.
fn normalize(name: &str) -> AppResult<String> {
    Ok(check_text("Tag name", name, MAX_TAG_LEN)?.to_lowercase())
}

#[cfg(test)]
mod tests {
    use glimpze_core::error::ErrorKind;
    use glimpze_core::types::PageRequest;

    use crate::post::PostDraft;
    use crate::testing::{Fixture, grant};

    #[tokio::test]
    async fn test_only_moderators_manage_vocabulary() {
        let f = Fixture::new();
        let alice = f.user("alice", grant(0, 0, 0, 0)).await;
        let moderator = f.user_with_role("mod", "moderator").await;

        let err = f.tags.create(&alice, "rust").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);

        let tag = f.tags.create(&moderator, "  Rust ").await.unwrap();
        assert_eq!(tag.name, "rust");
        let err = f.tags.create(&moderator, "rust").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        let err = f.tags.delete(&alice, tag.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
        f.tags.delete(&moderator, tag.id).await.unwrap();
        assert_eq!(f.tags.get(tag.id).await.unwrap_err().kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_tagging_posts() {
        let f = Fixture::new();
        let alice = f.user("alice", grant(1, 0, 0, 0)).await;
        let bob = f.user("bob", grant(0, 0, 0, 0)).await;
        let moderator = f.user_with_role("mod", "moderator").await;
        let tag = f.tags.create(&moderator, "rust").await.unwrap();
        let post = f
            .posts
            .create(
                &alice,
                PostDraft {
                    title: "t".into(),
                    content: "c".into(),
                    files: vec![],
                },
            )
            .await
            .unwrap();

        let err = f.tags.attach(&bob, post.id, "rust").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
        let err = f.tags.attach(&alice, post.id, "go").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        let attached = f.tags.attach(&alice, post.id, "Rust").await.unwrap();
        assert_eq!(attached.tag_name, "rust");
        let err = f.tags.attach(&alice, post.id, "rust").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        let tagged = f
            .posts
            .list_by_tag("rust", &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(tagged.len(), 1);

        f.tags.detach(&moderator, post.id, tag.id).await.unwrap();
        assert!(f.tags.list_for_post(post.id).await.unwrap().is_empty());
    }
}
