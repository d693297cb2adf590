//! Daily action quota configuration.

use serde::{Deserialize, Serialize};

/// Amounts granted per quota kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaGrant {
    /// Posts.
    #[serde(default)]
    pub create_post: i32,
    /// Comments.
    #[serde(default)]
    pub comment: i32,
    /// Likes.
    #[serde(default)]
    pub like: i32,
    /// Follows.
    #[serde(default)]
    pub follow: i32,
}

impl QuotaGrant {
    /// Whether every amount is zero.
    pub fn is_empty(&self) -> bool {
        self.create_post == 0 && self.comment == 0 && self.like == 0 && self.follow == 0
    }
}

/// Quota ledger settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaConfig {
    /// Balance written into a new user's ledger row.
    #[serde(default = "default_initial")]
    pub initial: QuotaGrant,
    /// Amount added by the daily replenishment sweep.
    #[serde(default = "default_daily")]
    pub daily: QuotaGrant,
    /// User ids fetched per sweep page.
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    /// Users updated per transaction within a page.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            initial: default_initial(),
            daily: default_daily(),
            page_size: default_page_size(),
            batch_size: default_batch_size(),
        }
    }
}

fn default_initial() -> QuotaGrant {
    QuotaGrant {
        create_post: 1,
        comment: 3,
        like: 5,
        follow: 5,
    }
}

fn default_daily() -> QuotaGrant {
    QuotaGrant {
        create_post: 1,
        comment: 3,
        like: 5,
        follow: 0,
    }
}

fn default_page_size() -> i64 {
    1000
}

fn default_batch_size() -> usize {
    100
}
