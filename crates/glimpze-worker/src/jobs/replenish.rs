//! Daily quota replenishment sweep.

use std::sync::Arc;

use glimpze_core::config::{QuotaConfig, QuotaGrant};
use glimpze_database::store::QuotaStore;

/// Outcome of one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplenishReport {
    /// Ledger rows that received the grant.
    pub users_updated: u64,
    /// Batches committed.
    pub batches: u64,
    /// Batches that failed and were skipped.
    pub failed_batches: u64,
    /// Whether paging stopped early because ids could not be listed.
    pub aborted: bool,
}

/// Adds the daily grant to every user's counters.
///
/// User ids are paged by keyset (`id > last`) and each page is committed
/// in batches. A failed batch is logged and skipped; the sweep goes on.
#[derive(Debug, Clone)]
pub struct ReplenishJob {
    quotas: Arc<dyn QuotaStore>,
    grant: QuotaGrant,
    page_size: i64,
    batch_size: usize,
}

impl ReplenishJob {
    /// Create a job from the quota configuration.
    pub fn new(quotas: Arc<dyn QuotaStore>, config: &QuotaConfig) -> Self {
        Self {
            quotas,
            grant: config.daily,
            page_size: config.page_size.max(1),
            batch_size: config.batch_size.max(1),
        }
    }

    /// Run one full sweep.
    pub async fn run(&self) -> ReplenishReport {
        let mut report = ReplenishReport::default();

        if self.grant.is_empty() {
            tracing::info!("Daily quota grant is empty, skipping replenishment");
            return report;
        }

        tracing::info!(
            "Running quota replenishment: grant={:?}, page_size={}, batch_size={}",
            self.grant,
            self.page_size,
            self.batch_size
        );

        let mut after = 0i64;
        loop {
            let ids = match self.quotas.list_user_ids_after(after, self.page_size).await {
                Ok(ids) => ids,
                Err(e) => {
                    tracing::error!("Failed to list users after id {}: {}", after, e);
                    report.aborted = true;
                    break;
                }
            };

            let Some(&last) = ids.last() else {
                break;
            };
            after = last;

            for batch in ids.chunks(self.batch_size) {
                match self.quotas.replenish(batch, &self.grant).await {
                    Ok(updated) => {
                        report.users_updated += updated;
                        report.batches += 1;
                    }
                    Err(e) => {
                        tracing::error!(
                            "Replenish batch of {} users starting at id {} failed: {}",
                            batch.len(),
                            batch[0],
                            e
                        );
                        report.failed_batches += 1;
                    }
                }
            }

            if (ids.len() as i64) < self.page_size {
                break;
            }
        }

        tracing::info!(
            "Quota replenishment finished: {} users in {} batches, {} failed",
            report.users_updated,
            report.batches,
            report.failed_batches
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Duration;

    use glimpze_core::error::AppError;
    use glimpze_core::result::AppResult;
    use glimpze_entity::user::UserLimit;

    use glimpze_auth::token::generate_activation;
    use glimpze_database::{MemoryDatabase, Stores};
    use glimpze_entity::user::{NewUser, QuotaKind};

    /// Fails the replenish call whose first id is `fail_on`.
    #[derive(Debug)]
    struct FlakyQuotas {
        ids: Vec<i64>,
        fail_on: i64,
        replenished: Mutex<Vec<i64>>,
    }

    impl FlakyQuotas {
        fn new(ids: Vec<i64>, fail_on: i64) -> Self {
            Self {
                ids,
                fail_on,
                replenished: Mutex::new(Vec::new()),
            }
        }

        fn replenished(&self) -> Vec<i64> {
            self.replenished.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl QuotaStore for FlakyQuotas {
        async fn find(&self, _user_id: i64) -> AppResult<Option<UserLimit>> {
            Ok(None)
        }

        async fn consume(&self, _user_id: i64, kind: QuotaKind) -> AppResult<()> {
            Err(AppError::quota_exhausted(kind.to_string()))
        }

        async fn list_user_ids_after(&self, after: i64, limit: i64) -> AppResult<Vec<i64>> {
            Ok(self
                .ids
                .iter()
                .copied()
                .filter(|id| *id > after)
                .take(limit as usize)
                .collect())
        }

        async fn replenish(&self, user_ids: &[i64], _grant: &QuotaGrant) -> AppResult<u64> {
            if user_ids.first() == Some(&self.fail_on) {
                return Err(AppError::database("connection reset"));
            }
            self.replenished.lock().unwrap().extend_from_slice(user_ids);
            Ok(user_ids.len() as u64)
        }
    }

    fn grant(n: i32) -> QuotaGrant {
        QuotaGrant {
            create_post: n,
            comment: n,
            like: n,
            follow: 0,
        }
    }

    async fn seed(stores: &Stores, count: usize) -> Vec<i64> {
        let mut ids = Vec::new();
        for i in 0..count {
            let user = stores
                .users
                .register(
                    &NewUser {
                        name: format!("u{i}"),
                        display_name: format!("u{i}"),
                        email: format!("u{i}@example.com"),
                        password_hash: "x".into(),
                        role_name: "user".into(),
                    },
                    &grant(0),
                    &generate_activation(Duration::hours(1)),
                )
                .await
                .unwrap();
            ids.push(user.id);
        }
        ids
    }

    fn config(page_size: i64, batch_size: usize) -> QuotaConfig {
        QuotaConfig {
            daily: grant(1),
            page_size,
            batch_size,
            ..QuotaConfig::default()
        }
    }

    #[tokio::test]
    async fn test_sweep_covers_every_page() {
        let stores = Stores::memory(MemoryDatabase::new());
        let ids = seed(&stores, 7).await;

        let job = ReplenishJob::new(stores.quotas.clone(), &config(3, 2));
        let report = job.run().await;

        assert_eq!(report.users_updated, 7);
        assert_eq!(report.batches, 5);
        assert!(!report.aborted);
        for id in ids {
            let limits = stores.quotas.find(id).await.unwrap().unwrap();
            assert_eq!(limits.remaining(QuotaKind::Comment), 1);
            assert_eq!(limits.remaining(QuotaKind::Follow), 0);
        }
    }

    #[tokio::test]
    async fn test_two_sweeps_grant_twice() {
        let stores = Stores::memory(MemoryDatabase::new());
        let ids = seed(&stores, 2).await;

        let job = ReplenishJob::new(stores.quotas.clone(), &config(1000, 100));
        job.run().await;
        job.run().await;

        let limits = stores.quotas.find(ids[0]).await.unwrap().unwrap();
        assert_eq!(limits.remaining(QuotaKind::CreatePost), 2);
    }

    #[tokio::test]
    async fn test_empty_grant_is_skipped() {
        let stores = Stores::memory(MemoryDatabase::new());
        seed(&stores, 1).await;

        let mut config = config(10, 10);
        config.daily = QuotaGrant {
            create_post: 0,
            comment: 0,
            like: 0,
            follow: 0,
        };
        let report = ReplenishJob::new(stores.quotas.clone(), &config).run().await;
        assert_eq!(report, ReplenishReport::default());
    }

    #[tokio::test]
    async fn test_failed_batch_does_not_stop_sweep() {
        let quotas = Arc::new(FlakyQuotas::new(vec![1, 2, 3, 4], 3));
        let job = ReplenishJob::new(quotas.clone(), &config(10, 1));
        let report = job.run().await;

        assert_eq!(report.failed_batches, 1);
        assert_eq!(report.batches, 3);
        assert_eq!(quotas.replenished(), vec![1, 2, 4]);
    }
}
