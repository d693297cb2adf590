//! Account-side stores of the in-memory database.

use async_trait::async_trait;
use chrono::Utc;

use glimpze_core::config::QuotaGrant;
use glimpze_core::error::AppError;
use glimpze_core::result::AppResult;
use glimpze_entity::token::{TokenScope, UserToken};
use glimpze_entity::user::{NewUser, QuotaKind, Role, User, UserLimit, UserProfile};

use super::{MemoryDatabase, TokenRecord, UserRecord, next};
use crate::store::{ProfileStore, QuotaStore, RoleStore, UserStore};

#[async_trait]
impl UserStore for MemoryDatabase {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        Ok(self.tables.lock().await.user(id))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let tables = self.tables.lock().await;
        let id = tables.users.values().find(|u| u.email == email).map(|u| u.id);
        Ok(id.and_then(|id| tables.user(id)))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<User>> {
        let tables = self.tables.lock().await;
        let id = tables.users.values().find(|u| u.name == name).map(|u| u.id);
        Ok(id.and_then(|id| tables.user(id)))
    }

    async fn register(
        &self,
        user: &NewUser,
        initial: &QuotaGrant,
        activation: &UserToken,
    ) -> AppResult<User> {
        let mut tables = self.tables.lock().await;

        let role_id = tables
            .role_by_name(&user.role_name)
            .map(|r| r.id)
            .ok_or_else(|| AppError::not_found(format!("Role '{}' not found", user.role_name)))?;
        if tables.users.values().any(|u| u.name == user.name) {
            return Err(AppError::conflict(format!(
                "Name '{}' is already taken",
                user.name
            )));
        }
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(AppError::conflict(format!(
                "Email '{}' is already registered",
                user.email
            )));
        }

        let now = Utc::now();
        let id = next(&mut tables.seq.users);
        tables.users.insert(
            id,
            UserRecord {
                id,
                name: user.name.clone(),
                display_name: user.display_name.clone(),
                email: user.email.clone(),
                password_hash: user.password_hash.clone(),
                role_id,
                activated_at: None,
                created_at: now,
                updated_at: now,
            },
        );
        tables.limits.insert(
            id,
            UserLimit {
                user_id: id,
                create_post_limit: initial.create_post,
                comment_limit: initial.comment,
                like_limit: initial.like,
                follow_limit: initial.follow,
                created_at: now,
                updated_at: now,
            },
        );
        tables.tokens.insert(
            activation.hash.clone(),
            TokenRecord {
                user_id: id,
                expiry: activation.expiry,
                scope: activation.scope.as_str().to_string(),
            },
        );

        tables.user_or_not_found(id)
    }

    async fn activate(&self, token_hash: &[u8]) -> AppResult<User> {
        let mut tables = self.tables.lock().await;
        let now = Utc::now();
        let scope = TokenScope::Activation.as_str();

        let user_id = tables
            .tokens
            .get(token_hash)
            .filter(|t| t.scope == scope && t.expiry > now)
            .map(|t| t.user_id)
            .ok_or_else(|| AppError::not_found("Invalid or expired activation token"))?;

        if let Some(record) = tables.users.get_mut(&user_id) {
            record.activated_at.get_or_insert(now);
            record.updated_at = now;
        }
        tables
            .tokens
            .retain(|_, t| !(t.user_id == user_id && t.scope == scope));

        tables.user_or_not_found(user_id)
    }

    async fn update_role(&self, user_name: &str, role_name: &str) -> AppResult<User> {
        let mut tables = self.tables.lock().await;
        let not_found =
            || AppError::not_found(format!("User '{user_name}' or role '{role_name}' not found"));

        let role_id = tables.role_by_name(role_name).map(|r| r.id).ok_or_else(not_found)?;
        let record = tables
            .users
            .values_mut()
            .find(|u| u.name == user_name)
            .ok_or_else(not_found)?;
        record.role_id = role_id;
        record.updated_at = Utc::now();
        let id = record.id;

        tables.user_or_not_found(id)
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let mut tables = self.tables.lock().await;
        if tables.users.remove(&id).is_none() {
            return Err(AppError::not_found(format!("User {id} not found")));
        }
        tables.limits.remove(&id);
        tables.profiles.remove(&id);
        tables.tokens.retain(|_, t| t.user_id != id);
        tables.follows.retain(|(user, follower), _| *user != id && *follower != id);
        tables.likes.retain(|(user, _), _| *user != id);
        tables.comments.retain(|_, c| c.user_id != id);
        let owned: Vec<i64> = tables
            .posts
            .values()
            .filter(|p| p.user_id == id)
            .map(|p| p.id)
            .collect();
        for post_id in owned {
            tables.remove_post(post_id);
        }
        Ok(())
    }
}

#[async_trait]
impl RoleStore for MemoryDatabase {
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        Ok(self.tables.lock().await.role_by_name(name).cloned())
    }
}

#[async_trait]
impl ProfileStore for MemoryDatabase {
    async fn find(&self, user_id: i64) -> AppResult<Option<UserProfile>> {
        Ok(self.tables.lock().await.profiles.get(&user_id).cloned())
    }

    async fn upsert(&self, user_id: i64, biodata: &str) -> AppResult<UserProfile> {
        let mut tables = self.tables.lock().await;
        if !tables.users.contains_key(&user_id) {
            return Err(AppError::not_found(format!("User {user_id} not found")));
        }
        let now = Utc::now();
        let profile = tables
            .profiles
            .entry(user_id)
            .and_modify(|p| {
                p.biodata = biodata.to_string();
                p.updated_at = now;
            })
            .or_insert_with(|| UserProfile {
                user_id,
                biodata: biodata.to_string(),
                created_at: now,
                updated_at: now,
            });
        Ok(profile.clone())
    }
}

#[async_trait]
impl QuotaStore for MemoryDatabase {
    async fn find(&self, user_id: i64) -> AppResult<Option<UserLimit>> {
        Ok(self.tables.lock().await.limits.get(&user_id).cloned())
    }

    async fn consume(&self, user_id: i64, kind: QuotaKind) -> AppResult<()> {
        let mut tables = self.tables.lock().await;
        tables.check_quota(user_id, kind)?;
        tables.take_quota(user_id, kind);
        Ok(())
    }

    async fn list_user_ids_after(&self, after: i64, limit: i64) -> AppResult<Vec<i64>> {
        let tables = self.tables.lock().await;
        let mut ids: Vec<i64> = tables.limits.keys().copied().filter(|id| *id > after).collect();
        ids.sort_unstable();
        ids.truncate(limit.max(0) as usize);
        Ok(ids)
    }

    async fn replenish(&self, user_ids: &[i64], grant: &QuotaGrant) -> AppResult<u64> {
        if grant.is_empty() {
            return Ok(0);
        }
        let mut tables = self.tables.lock().await;
        let now = Utc::now();
        let mut updated = 0;
        for id in user_ids {
            if let Some(limit) = tables.limits.get_mut(id) {
                for kind in QuotaKind::ALL {
                    let amount = match kind {
                        QuotaKind::CreatePost => grant.create_post,
                        QuotaKind::Comment => grant.comment,
                        QuotaKind::Like => grant.like,
                        QuotaKind::Follow => grant.follow,
                    };
                    *limit.counter_mut(kind) += amount;
                }
                limit.updated_at = now;
                updated += 1;
            }
        }
        Ok(updated)
    }
}
