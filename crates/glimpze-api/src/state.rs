//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use glimpze_auth::{AuthCookies, RoleGuard, SessionManager, SessionRegistry};
use glimpze_cache::CacheManager;
use glimpze_core::config::AppConfig;
use glimpze_core::result::AppResult;
use glimpze_database::Stores;
use glimpze_service::{
    AccountService, CommentService, FeedService, Mailer, PostService, SocialService, TagService,
    UserService,
};
use glimpze_storage::{StorageManager, UploadPolicy};

use crate::middleware::rate_limit::RateLimiter;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. Every field is
/// cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Persistent stores (PostgreSQL or in-memory)
    pub stores: Stores,
    /// Session registry backing store (Redis or in-memory)
    pub cache: CacheManager,
    /// Blob storage
    pub storage: StorageManager,

    // ── Auth ─────────────────────────────────────────────────
    /// Login, authentication, refresh, and logout
    pub sessions: SessionManager,
    /// `Set-Cookie` builder for the auth cookies
    pub cookies: AuthCookies,
    /// Per-client request limiter
    pub rate_limiter: RateLimiter,

    // ── Services ─────────────────────────────────────────────
    pub accounts: AccountService,
    pub users: UserService,
    pub posts: PostService,
    pub comments: CommentService,
    pub social: SocialService,
    pub tags: TagService,
    pub feed: FeedService,
}

impl AppState {
    /// Wires every service over the given infrastructure.
    ///
    /// Fails when the auth configuration is unusable (missing or shared
    /// token secrets).
    pub fn new(
        config: AppConfig,
        stores: Stores,
        cache: CacheManager,
        storage: StorageManager,
        mailer: Arc<dyn Mailer>,
    ) -> AppResult<Self> {
        let registry = SessionRegistry::new(cache.clone());
        let sessions = SessionManager::new(&config.auth, registry, stores.users.clone())?;
        let guard = RoleGuard::new(stores.roles.clone());

        let accounts = AccountService::new(
            stores.users.clone(),
            mailer,
            &config.auth,
            config.quota.initial,
        );
        let users = UserService::new(stores.users.clone(), stores.profiles.clone(), guard.clone());
        let posts = PostService::new(
            stores.posts.clone(),
            storage.clone(),
            UploadPolicy::from_config(&config.storage),
            guard.clone(),
        );
        let comments = CommentService::new(stores.comments.clone(), guard.clone());
        let social = SocialService::new(stores.likes.clone(), stores.follows.clone());
        let tags = TagService::new(stores.tags.clone(), stores.posts.clone(), guard);
        let feed = FeedService::new(stores.posts.clone(), storage.clone());

        let rate_limiter = RateLimiter::from_config(&config.server.rate_limit)?;

        Ok(Self {
            cookies: AuthCookies::new(config.auth.cookie_secure),
            rate_limiter,
            config: Arc::new(config),
            stores,
            cache,
            storage,
            sessions,
            accounts,
            users,
            posts,
            comments,
            social,
            tags,
            feed,
        })
    }
}
