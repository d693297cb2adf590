//! Per-user daily quota ledger.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An action whose daily count is limited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotaKind {
    /// Creating a post.
    CreatePost,
    /// Writing a comment.
    Comment,
    /// Liking a post.
    Like,
    /// Following a user.
    Follow,
}

impl QuotaKind {
    /// Every quota kind.
    pub const ALL: [QuotaKind; 4] = [
        QuotaKind::CreatePost,
        QuotaKind::Comment,
        QuotaKind::Like,
        QuotaKind::Follow,
    ];

    /// Ledger column holding this kind's remaining count.
    pub fn column(&self) -> &'static str {
        match self {
            Self::CreatePost => "create_post_limit",
            Self::Comment => "comment_limit",
            Self::Like => "like_limit",
            Self::Follow => "follow_limit",
        }
    }

    /// Short name used in messages and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreatePost => "create_post",
            Self::Comment => "comment",
            Self::Like => "like",
            Self::Follow => "follow",
        }
    }
}

impl fmt::Display for QuotaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One ledger row per user. Every count is non-negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserLimit {
    /// Owning user.
    pub user_id: i64,
    /// Posts left today.
    pub create_post_limit: i32,
    /// Comments left today.
    pub comment_limit: i32,
    /// Likes left today.
    pub like_limit: i32,
    /// Follows left today.
    pub follow_limit: i32,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// When the row was last changed.
    pub updated_at: DateTime<Utc>,
}

impl UserLimit {
    /// Remaining count for `kind`.
    pub fn remaining(&self, kind: QuotaKind) -> i32 {
        match kind {
            QuotaKind::CreatePost => self.create_post_limit,
            QuotaKind::Comment => self.comment_limit,
            QuotaKind::Like => self.like_limit,
            QuotaKind::Follow => self.follow_limit,
        }
    }

    /// Mutable access to the counter for `kind`.
    pub fn counter_mut(&mut self, kind: QuotaKind) -> &mut i32 {
        match kind {
            QuotaKind::CreatePost => &mut self.create_post_limit,
            QuotaKind::Comment => &mut self.comment_limit,
            QuotaKind::Like => &mut self.like_limit,
            QuotaKind::Follow => &mut self.follow_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_are_distinct() {
        let mut columns: Vec<_> = QuotaKind::ALL.iter().map(|k| k.column()).collect();
        columns.sort();
        columns.dedup();
        assert_eq!(columns.len(), QuotaKind::ALL.len());
    }

    #[test]
    fn test_counter_mut_matches_remaining() {
        let now = Utc::now();
        let mut limit = UserLimit {
            user_id: 1,
            create_post_limit: 1,
            comment_limit: 3,
            like_limit: 5,
            follow_limit: 0,
            created_at: now,
            updated_at: now,
        };
        *limit.counter_mut(QuotaKind::Like) -= 1;
        assert_eq!(limit.remaining(QuotaKind::Like), 4);
        assert_eq!(limit.remaining(QuotaKind::Follow), 0);
    }
}
