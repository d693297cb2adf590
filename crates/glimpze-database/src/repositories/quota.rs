//! Quota ledger repository implementation.

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

use glimpze_core::config::QuotaGrant;
use glimpze_core::error::AppError;
use glimpze_core::result::AppResult;
use glimpze_entity::user::{QuotaKind, UserLimit};

use crate::error::database;
use crate::store::QuotaStore;

/// Take one unit of `kind` from a user's ledger row on `conn`.
///
/// The guarded decrement is the whole admission check: concurrent callers
/// serialize on the row lock and at most `remaining` of them match.
pub(crate) async fn consume_on(
    conn: &mut PgConnection,
    user_id: i64,
    kind: QuotaKind,
) -> AppResult<()> {
    let column = kind.column();
    let sql = format!(
        "UPDATE user_limits SET {column} = {column} - 1, updated_at = NOW() \
         WHERE user_id = $1 AND {column} > 0"
    );

    let result = sqlx::query(&sql)
        .bind(user_id)
        .execute(conn)
        .await
        .map_err(|e| database("Failed to consume quota", e))?;

    if result.rows_affected() == 0 {
        return Err(AppError::quota_exhausted(format!(
            "Daily {kind} limit reached"
        )));
    }
    Ok(())
}

/// Repository for the `user_limits` table.
#[derive(Debug, Clone)]
pub struct QuotaRepository {
    pool: PgPool,
}

impl QuotaRepository {
    /// Create a new quota repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuotaStore for QuotaRepository {
    async fn find(&self, user_id: i64) -> AppResult<Option<UserLimit>> {
        sqlx::query_as::<_, UserLimit>("SELECT * FROM user_limits WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database("Failed to find user limits", e))
    }

    async fn consume(&self, user_id: i64, kind: QuotaKind) -> AppResult<()> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| database("Failed to acquire connection", e))?;
        consume_on(&mut conn, user_id, kind).await
    }

    async fn list_user_ids_after(&self, after: i64, limit: i64) -> AppResult<Vec<i64>> {
        sqlx::query_scalar::<_, i64>(
            "SELECT user_id FROM user_limits WHERE user_id > $1 ORDER BY user_id LIMIT $2",
        )
        .bind(after)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database("Failed to list user ids", e))
    }

    async fn replenish(&self, user_ids: &[i64], grant: &QuotaGrant) -> AppResult<u64> {
        if user_ids.is_empty() || grant.is_empty() {
            return Ok(0);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| database("Failed to begin transaction", e))?;

        let result = sqlx::query(
            "UPDATE user_limits SET \
                create_post_limit = create_post_limit + $2, \
                comment_limit = comment_limit + $3, \
                like_limit = like_limit + $4, \
                follow_limit = follow_limit + $5, \
                updated_at = NOW() \
             WHERE user_id = ANY($1)",
        )
        .bind(user_ids)
        .bind(grant.create_post)
        .bind(grant.comment)
        .bind(grant.like)
        .bind(grant.follow)
        .execute(&mut *tx)
        .await
        .map_err(|e| database("Failed to replenish user limits", e))?;

        tx.commit()
            .await
            .map_err(|e| database("Failed to commit replenishment", e))?;

        Ok(result.rows_affected())
    }
}
