//! Periodic driver for the replenishment job.

use std::time::Duration;

use chrono::{DateTime, Local, TimeZone};
use tokio::sync::watch;
use tokio::time::{self, Instant};

use crate::jobs::ReplenishJob;

/// Runs the sweep at the next local midnight, then every `interval`.
///
/// Missed ticks are not made up. A restart near midnight may sweep twice.
#[derive(Debug, Clone)]
pub struct ReplenishRunner {
    job: ReplenishJob,
    interval: Duration,
}

impl ReplenishRunner {
    /// Create a runner.
    pub fn new(job: ReplenishJob, interval_hours: u64) -> Self {
        Self {
            job,
            interval: Duration::from_secs(interval_hours.max(1) * 3600),
        }
    }

    /// Run until `cancel` flips to `true` or its sender is dropped.
    pub async fn run(&self, cancel: watch::Receiver<bool>) {
        let first = until_next_midnight(&Local::now());
        self.run_from(first, cancel).await;
    }

    /// Like [`run`](Self::run) with an explicit delay before the first sweep.
    pub async fn run_from(&self, first: Duration, mut cancel: watch::Receiver<bool>) {
        tracing::info!(
            "Quota replenishment runner started, first sweep in {}s",
            first.as_secs()
        );

        let mut deadline = Instant::now() + first;
        loop {
            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        tracing::info!("Quota replenishment runner shutting down");
                        break;
                    }
                }
                _ = time::sleep_until(deadline) => {
                    self.job.run().await;
                    deadline = Instant::now() + self.interval;
                }
            }
        }
    }
}

/// Time left until the next midnight in `now`'s zone.
pub fn until_next_midnight<Tz: TimeZone>(now: &DateTime<Tz>) -> Duration {
    let fallback = Duration::from_secs(24 * 3600);

    let Some(next_day) = now.date_naive().succ_opt() else {
        return fallback;
    };
    let Some(midnight) = next_day.and_hms_opt(0, 0, 0) else {
        return fallback;
    };
    let Some(next) = now.timezone().from_local_datetime(&midnight).earliest() else {
        return fallback;
    };

    let millis = next.timestamp_millis() - now.timestamp_millis();
    Duration::from_millis(millis.max(0) as u64)
}
