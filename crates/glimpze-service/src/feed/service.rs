//! Feeds with presigned image links.

use std::sync::Arc;

use futures::future::try_join_all;

use glimpze_core::result::AppResult;
use glimpze_core::types::PageRequest;
use glimpze_database::store::PostStore;
use glimpze_entity::post::FeedItem;
use glimpze_entity::user::User;
use glimpze_storage::StorageManager;

/// Builds feed pages.
#[derive(Debug, Clone)]
pub struct FeedService {
    posts: Arc<dyn PostStore>,
    storage: StorageManager,
}

impl FeedService {
    /// Creates a new feed service.
    pub fn new(posts: Arc<dyn PostStore>, storage: StorageManager) -> Self {
        Self { posts, storage }
    }

    /// The viewer's own posts and those of everyone they follow, newest
    /// first; anonymous viewers get the public feed.
    pub async fn feed(&self, viewer: Option<&User>, page: &PageRequest) -> AppResult<Vec<FeedItem>> {
        let items = match viewer {
            Some(user) => self.posts.user_feed(user.id, page).await?,
            None => self.posts.public_feed(page).await?,
        };
        self.with_links(items).await
    }

    async fn with_links(&self, mut items: Vec<FeedItem>) -> AppResult<Vec<FeedItem>> {
        for item in &mut items {
            let keys: Vec<String> = item.post.files.iter().map(|f| f.blob_key()).collect();
            item.image_links = try_join_all(keys.iter().map(|k| self.storage.presign(k))).await?;
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use glimpze_core::types::PageRequest;

    use crate::post::PostDraft;
    use crate::testing::{Fixture, grant, png};

    fn draft(title: &str, files: usize) -> PostDraft {
        PostDraft {
            title: title.into(),
            content: "c".into(),
            files: (0..files).map(|i| png(&format!("{i}.png"))).collect(),
        }
    }

    #[tokio::test]
    async fn test_user_feed_includes_followed_authors() {
        let f = Fixture::new();
        let alice = f.user("alice", grant(1, 0, 0, 1)).await;
        let bob = f.user("bob", grant(1, 0, 0, 0)).await;
        let carol = f.user("carol", grant(1, 0, 0, 0)).await;

        f.posts.create(&alice, draft("mine", 0)).await.unwrap();
        f.posts.create(&bob, draft("followed", 2)).await.unwrap();
        f.posts.create(&carol, draft("stranger", 0)).await.unwrap();
        f.social.follow(&alice, bob.id).await.unwrap();

        let items = f.feed.feed(Some(&alice), &PageRequest::default()).await.unwrap();
        let titles: Vec<&str> = items.iter().map(|i| i.post.title.as_str()).collect();
        assert_eq!(titles, vec!["followed", "mine"]);
        assert_eq!(items[0].image_links.len(), 2);
        assert!(items[0].image_links[0].starts_with("memory://"));
    }

    #[tokio::test]
    async fn test_public_feed_orders_by_likes() {
        let f = Fixture::new();
        let alice = f.user("alice", grant(2, 0, 1, 0)).await;
        let bob = f.user("bob", grant(0, 0, 1, 0)).await;

        let liked = f.posts.create(&alice, draft("liked", 0)).await.unwrap();
        f.posts.create(&alice, draft("newer", 0)).await.unwrap();
        f.social.like(&alice, liked.id).await.unwrap();
        f.social.like(&bob, liked.id).await.unwrap();

        let items = f.feed.feed(None, &PageRequest::default()).await.unwrap();
        assert_eq!(items[0].post.title, "liked");
        assert_eq!(items[0].post.likes, 2);
        assert_eq!(items[1].post.title, "newer");
    }

    #[tokio::test]
    async fn test_feed_pages() {
        let f = Fixture::new();
        let alice = f.user("alice", grant(3, 0, 0, 0)).await;
        for i in 0..3 {
            f.posts.create(&alice, draft(&format!("p{i}"), 0)).await.unwrap();
        }

        let second = f
            .feed
            .feed(Some(&alice), &PageRequest::new(2, 2))
            .await
            .unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].post.title, "p0");
    }
}
