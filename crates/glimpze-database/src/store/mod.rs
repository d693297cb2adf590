//! Store traits and the bundle handed to services.
//!
//! Services depend only on these traits. [`Stores::connect`] picks the
//! PostgreSQL repositories or the in-memory database from configuration.

pub mod comment;
pub mod post;
pub mod quota;
pub mod social;
pub mod tag;
pub mod user;

use std::sync::Arc;

use tracing::info;

use glimpze_core::config::DatabaseConfig;
use glimpze_core::error::AppError;
use glimpze_core::result::AppResult;

pub use comment::CommentStore;
pub use post::{PostStore, PostUpdate, UpdatedPost};
pub use quota::QuotaStore;
pub use social::{FollowStore, LikeStore};
pub use tag::TagStore;
pub use user::{ProfileStore, RoleStore, UserStore};

use crate::connection::DatabasePool;
use crate::memory::MemoryDatabase;
use crate::migration::run_migrations;
use crate::repositories::{
    CommentRepository, FollowRepository, LikeRepository, PostRepository, ProfileRepository,
    QuotaRepository, RoleRepository, TagRepository, UserRepository,
};

/// Every store the application uses, behind shared trait objects.
#[derive(Debug, Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub roles: Arc<dyn RoleStore>,
    pub profiles: Arc<dyn ProfileStore>,
    pub quotas: Arc<dyn QuotaStore>,
    pub posts: Arc<dyn PostStore>,
    pub comments: Arc<dyn CommentStore>,
    pub likes: Arc<dyn LikeStore>,
    pub follows: Arc<dyn FollowStore>,
    pub tags: Arc<dyn TagStore>,
    /// Present only for the PostgreSQL backend.
    pool: Option<DatabasePool>,
}

impl Stores {
    /// Build the stores selected by `config.provider`.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        match config.provider.as_str() {
            "postgres" => {
                let pool = DatabasePool::connect(config).await?;
                if config.run_migrations {
                    run_migrations(pool.pool()).await?;
                }
                Ok(Self::postgres(pool))
            }
            "memory" => {
                info!("Using in-memory database; data is lost on restart");
                Ok(Self::memory(MemoryDatabase::new()))
            }
            other => Err(AppError::configuration(format!(
                "Unknown database provider: '{other}'. Supported: postgres, memory"
            ))),
        }
    }

    /// PostgreSQL repositories sharing one pool.
    pub fn postgres(pool: DatabasePool) -> Self {
        let pg = pool.pool().clone();
        Self {
            users: Arc::new(UserRepository::new(pg.clone())),
            roles: Arc::new(RoleRepository::new(pg.clone())),
            profiles: Arc::new(ProfileRepository::new(pg.clone())),
            quotas: Arc::new(QuotaRepository::new(pg.clone())),
            posts: Arc::new(PostRepository::new(pg.clone())),
            comments: Arc::new(CommentRepository::new(pg.clone())),
            likes: Arc::new(LikeRepository::new(pg.clone())),
            follows: Arc::new(FollowRepository::new(pg.clone())),
            tags: Arc::new(TagRepository::new(pg)),
            pool: Some(pool),
        }
    }

    /// Every store backed by the same in-memory database.
    pub fn memory(db: MemoryDatabase) -> Self {
        let db = Arc::new(db);
        Self {
            users: db.clone(),
            roles: db.clone(),
            profiles: db.clone(),
            quotas: db.clone(),
            posts: db.clone(),
            comments: db.clone(),
            likes: db.clone(),
            follows: db.clone(),
            tags: db,
            pool: None,
        }
    }

    /// Check connectivity of the backing database.
    pub async fn health_check(&self) -> AppResult<bool> {
        match &self.pool {
            Some(pool) => pool.health_check().await,
            None => Ok(true),
        }
    }

    /// Close the connection pool, if any.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
