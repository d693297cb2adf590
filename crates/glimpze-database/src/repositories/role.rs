//! Role repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use glimpze_core::result::AppResult;
use glimpze_entity::user::Role;

use crate::error::database;
use crate::store::RoleStore;

/// Repository for the role table.
#[derive(Debug, Clone)]
pub struct RoleRepository {
    pool: PgPool,
}

impl RoleRepository {
    /// Create a new role repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleStore for RoleRepository {
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, Role>(
            "SELECT id, name, level, description, created_at FROM roles WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database("Failed to find role by name", e))
    }
}
