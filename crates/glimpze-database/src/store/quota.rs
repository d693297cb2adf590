//! The per-user quota ledger.

use async_trait::async_trait;

use glimpze_core::config::QuotaGrant;
use glimpze_core::result::AppResult;
use glimpze_entity::user::{QuotaKind, UserLimit};

/// Per-user, per-kind action counters.
///
/// Counters never go below zero. Gated mutations consume through their own
/// store method so the decrement shares the mutation's transaction; this
/// trait exposes the standalone operations.
#[async_trait]
pub trait QuotaStore: Send + Sync + std::fmt::Debug {
    /// Current counters of a user.
    async fn find(&self, user_id: i64) -> AppResult<Option<UserLimit>>;

    /// Atomically take one unit of `kind`. Fails with `QuotaExhausted` when
    /// the counter is already zero.
    async fn consume(&self, user_id: i64, kind: QuotaKind) -> AppResult<()>;

    /// Up to `limit` user ids greater than `after`, ascending.
    async fn list_user_ids_after(&self, after: i64, limit: i64) -> AppResult<Vec<i64>>;

    /// Add `grant` to the counters of every listed user in one transaction.
    /// Returns the number of rows updated.
    async fn replenish(&self, user_ids: &[i64], grant: &QuotaGrant) -> AppResult<u64>;
}
