//! Shared fixture for service tests, wired over the in-memory backends.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::Duration as ChronoDuration;

use glimpze_auth::RoleGuard;
use glimpze_auth::token::generate_activation;
use glimpze_core::config::{AuthConfig, QuotaGrant, StorageConfig};
use glimpze_database::{MemoryDatabase, Stores};
use glimpze_entity::user::{NewUser, User};
use glimpze_storage::providers::MemoryBlobStore;
use glimpze_storage::{StorageManager, UploadPolicy, UploadedFile};

use crate::{
    AccountService, CommentService, FeedService, OutboxMailer, PostService, SocialService,
    TagService, UserService,
};

pub(crate) struct Fixture {
    pub stores: Stores,
    pub blobs: MemoryBlobStore,
    pub outbox: OutboxMailer,
    pub accounts: AccountService,
    pub users: UserService,
    pub posts: PostService,
    pub comments: CommentService,
    pub social: SocialService,
    pub tags: TagService,
    pub feed: FeedService,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_mailer(OutboxMailer::new())
    }

    pub fn with_mailer(outbox: OutboxMailer) -> Self {
        let stores = Stores::memory(MemoryDatabase::new());
        let blobs = MemoryBlobStore::new();
        let storage = StorageManager::from_store(Arc::new(blobs.clone()), Duration::from_secs(900));
        let guard = RoleGuard::new(stores.roles.clone());
        let auth = AuthConfig::default();

        Self {
            accounts: AccountService::new(
                stores.users.clone(),
                Arc::new(outbox.clone()),
                &auth,
                grant(1, 3, 5, 5),
            ),
            users: UserService::new(stores.users.clone(), stores.profiles.clone(), guard.clone()),
            posts: PostService::new(
                stores.posts.clone(),
                storage.clone(),
                UploadPolicy::from_config(&StorageConfig::default()),
                guard.clone(),
            ),
            comments: CommentService::new(stores.comments.clone(), guard.clone()),
            social: SocialService::new(stores.likes.clone(), stores.follows.clone()),
            tags: TagService::new(stores.tags.clone(), stores.posts.clone(), guard),
            feed: FeedService::new(stores.posts.clone(), storage),
            stores,
            blobs,
            outbox,
        }
    }

    /// Registers a plain user with the given quota.
    pub async fn user(&self, name: &str, quota: QuotaGrant) -> User {
        let new_user = NewUser {
            name: name.to_string(),
            display_name: name.to_string(),
            email: format!("{name}@example.com"),
            password_hash: "unused".to_string(),
            role_name: "user".to_string(),
        };
        self.stores
            .users
            .register(&new_user, &quota, &generate_activation(ChronoDuration::hours(1)))
            .await
            .unwrap()
    }

    /// Registers a user and assigns them `role`.
    pub async fn user_with_role(&self, name: &str, role: &str) -> User {
        self.user(name, grant(0, 0, 0, 0)).await;
        self.stores.users.update_role(name, role).await.unwrap()
    }
}

pub(crate) fn grant(create_post: i32, comment: i32, like: i32, follow: i32) -> QuotaGrant {
    QuotaGrant {
        create_post,
        comment,
        like,
        follow,
    }
}

/// A minimal file that sniffs as PNG.
pub(crate) fn png(name: &str) -> UploadedFile {
    UploadedFile {
        filename: name.to_string(),
        data: Bytes::from_static(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0]),
    }
}
