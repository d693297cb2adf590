//! In-memory implementation of every store trait.
//!
//! All tables live behind one async mutex, so each store call is atomic
//! with respect to every other. Gated mutations check the quota and every
//! other precondition before touching any table, which gives them the same
//! all-or-nothing behaviour as the PostgreSQL transactions.

mod accounts;
mod content;

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use glimpze_core::error::AppError;
use glimpze_core::result::AppResult;
use glimpze_entity::comment::Comment;
use glimpze_entity::post::{Post, PostFile};
use glimpze_entity::social::{Follower, PostLike};
use glimpze_entity::tag::{PostTag, Tag};
use glimpze_entity::user::role::{ADMIN_ROLE, DEFAULT_ROLE, MODERATOR_ROLE};
use glimpze_entity::user::{QuotaKind, Role, User, UserLimit, UserProfile};

#[derive(Debug, Clone)]
struct UserRecord {
    id: i64,
    name: String,
    display_name: String,
    email: String,
    password_hash: String,
    role_id: i64,
    activated_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct TokenRecord {
    user_id: i64,
    expiry: DateTime<Utc>,
    scope: String,
}

#[derive(Debug, Clone)]
struct PostRecord {
    id: i64,
    title: String,
    content: String,
    user_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Sequences {
    roles: i64,
    users: i64,
    posts: i64,
    comments: i64,
    tags: i64,
}

#[derive(Debug, Default)]
struct Tables {
    seq: Sequences,
    roles: BTreeMap<i64, Role>,
    users: BTreeMap<i64, UserRecord>,
    limits: HashMap<i64, UserLimit>,
    tokens: HashMap<Vec<u8>, TokenRecord>,
    profiles: HashMap<i64, UserProfile>,
    posts: BTreeMap<i64, PostRecord>,
    files: Vec<PostFile>,
    comments: BTreeMap<i64, Comment>,
    /// Keyed by `(user_id, post_id)`.
    likes: BTreeMap<(i64, i64), PostLike>,
    /// Keyed by `(user_id, follower_id)`.
    follows: BTreeMap<(i64, i64), Follower>,
    tags: BTreeMap<i64, Tag>,
    /// Keyed by `(post_id, tag_id)`.
    post_tags: BTreeMap<(i64, i64), PostTag>,
}

fn next(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

impl Tables {
    fn seeded() -> Self {
        let mut tables = Self::default();
        let now = Utc::now();
        for (name, level, description) in [
            (DEFAULT_ROLE, 1, "A user can create posts, comments, likes and follows"),
            (MODERATOR_ROLE, 2, "A moderator can update other users' posts and manage tags"),
            (ADMIN_ROLE, 3, "An admin can delete posts and change user roles"),
        ] {
            let id = next(&mut tables.seq.roles);
            tables.roles.insert(
                id,
                Role {
                    id,
                    name: name.to_string(),
                    level,
                    description: description.to_string(),
                    created_at: now,
                },
            );
        }
        tables
    }

    fn role_by_name(&self, name: &str) -> Option<&Role> {
        self.roles.values().find(|r| r.name == name)
    }

    fn user(&self, id: i64) -> Option<User> {
        let record = self.users.get(&id)?;
        let role = self.roles.get(&record.role_id)?.clone();
        let limits = self.limits.get(&id)?.clone();
        Some(User {
            id: record.id,
            name: record.name.clone(),
            display_name: record.display_name.clone(),
            email: record.email.clone(),
            password_hash: record.password_hash.clone(),
            activated_at: record.activated_at,
            created_at: record.created_at,
            updated_at: record.updated_at,
            role,
            limits,
        })
    }

    fn user_or_not_found(&self, id: i64) -> AppResult<User> {
        self.user(id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }

    /// Fail with `QuotaExhausted` unless one unit of `kind` is available.
    fn check_quota(&self, user_id: i64, kind: QuotaKind) -> AppResult<()> {
        let remaining = self
            .limits
            .get(&user_id)
            .map(|l| l.remaining(kind))
            .unwrap_or(0);
        if remaining > 0 {
            Ok(())
        } else {
            Err(AppError::quota_exhausted(format!(
                "Daily {kind} limit reached"
            )))
        }
    }

    /// Take one unit of `kind`. Callers run [`Self::check_quota`] first.
    fn take_quota(&mut self, user_id: i64, kind: QuotaKind) {
        if let Some(limit) = self.limits.get_mut(&user_id) {
            let counter = limit.counter_mut(kind);
            *counter = (*counter - 1).max(0);
            limit.updated_at = Utc::now();
        }
    }

    fn files_of(&self, post_id: i64) -> Vec<PostFile> {
        self.files
            .iter()
            .filter(|f| f.post_id == post_id)
            .cloned()
            .collect()
    }

    fn comment_count(&self, post_id: i64) -> i64 {
        self.comments.values().filter(|c| c.post_id == post_id).count() as i64
    }

    fn post(&self, id: i64) -> Option<Post> {
        let record = self.posts.get(&id)?;
        let username = self
            .users
            .get(&record.user_id)
            .map(|u| u.name.clone())
            .unwrap_or_default();
        let likes = self.likes.values().filter(|l| l.post_id == id).count() as i64;
        let mut tags: Vec<String> = self
            .post_tags
            .values()
            .filter(|t| t.post_id == id)
            .map(|t| t.tag_name.clone())
            .collect();
        tags.sort();
        Some(Post {
            id: record.id,
            title: record.title.clone(),
            content: record.content.clone(),
            user_id: record.user_id,
            username,
            likes,
            files: self.files_of(id),
            tags,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }

    /// Posts matching `filter`, newest first.
    fn posts_where(&self, filter: impl Fn(&PostRecord) -> bool) -> Vec<Post> {
        let mut records: Vec<&PostRecord> = self.posts.values().filter(|p| filter(p)).collect();
        records.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        records.iter().filter_map(|p| self.post(p.id)).collect()
    }

    /// Remove a post and everything hanging off it; returns its files.
    fn remove_post(&mut self, id: i64) -> Option<Vec<PostFile>> {
        self.posts.remove(&id)?;
        let (removed, kept): (Vec<_>, Vec<_>) =
            self.files.drain(..).partition(|f| f.post_id == id);
        self.files = kept;
        self.comments.retain(|_, c| c.post_id != id);
        self.likes.retain(|_, l| l.post_id != id);
        self.post_tags.retain(|_, t| t.post_id != id);
        Some(removed)
    }
}

/// In-memory database implementing every store trait.
#[derive(Debug)]
pub struct MemoryDatabase {
    tables: Mutex<Tables>,
}

impl MemoryDatabase {
    /// An empty database with the three standard roles seeded.
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::seeded()),
        }
    }
}

impl Default for MemoryDatabase {
    fn default() -> Self {
        Self::new()
    }
}

fn paginate<T>(items: Vec<T>, page: &glimpze_core::types::PageRequest) -> Vec<T> {
    items
        .into_iter()
        .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
        .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
        .collect()
}
