//! User repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool};

use glimpze_core::config::QuotaGrant;
use glimpze_core::error::AppError;
use glimpze_core::result::AppResult;
use glimpze_entity::token::{TokenScope, UserToken};
use glimpze_entity::user::{NewUser, Role, User, UserLimit};

use crate::error::{constraint, database};
use crate::store::UserStore;

/// Users joined with their role and quota row.
const SELECT_USER: &str = "\
    SELECT u.id, u.name, u.display_name, u.email, u.password_hash, u.activated_at, \
           u.created_at, u.updated_at, \
           r.id AS role_id, r.name AS role_name, r.level AS role_level, \
           r.description AS role_description, r.created_at AS role_created_at, \
           l.create_post_limit, l.comment_limit, l.like_limit, l.follow_limit, \
           l.created_at AS limits_created_at, l.updated_at AS limits_updated_at \
    FROM users u \
    JOIN roles r ON r.id = u.role_id \
    JOIN user_limits l ON l.user_id = u.id";

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    name: String,
    display_name: String,
    email: String,
    password_hash: String,
    activated_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    role_id: i64,
    role_name: String,
    role_level: i32,
    role_description: String,
    role_created_at: DateTime<Utc>,
    create_post_limit: i32,
    comment_limit: i32,
    like_limit: i32,
    follow_limit: i32,
    limits_created_at: DateTime<Utc>,
    limits_updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            display_name: row.display_name,
            email: row.email,
            password_hash: row.password_hash,
            activated_at: row.activated_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
            role: Role {
                id: row.role_id,
                name: row.role_name,
                level: row.role_level,
                description: row.role_description,
                created_at: row.role_created_at,
            },
            limits: UserLimit {
                user_id: row.id,
                create_post_limit: row.create_post_limit,
                comment_limit: row.comment_limit,
                like_limit: row.like_limit,
                follow_limit: row.follow_limit,
                created_at: row.limits_created_at,
                updated_at: row.limits_updated_at,
            },
        }
    }
}

/// Repository for user accounts.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_by_id(conn: &mut PgConnection, id: i64) -> AppResult<User> {
        sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE u.id = $1"))
            .bind(id)
            .fetch_optional(conn)
            .await
            .map_err(|e| database("Failed to load user", e))?
            .map(User::from)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }

    async fn find_where(&self, clause: &str, value: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE {clause}"))
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map(|row| row.map(User::from))
            .map_err(|e| database("Failed to find user", e))
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE u.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map(|row| row.map(User::from))
            .map_err(|e| database("Failed to find user by id", e))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.find_where("u.email = $1", email).await
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<User>> {
        self.find_where("u.name = $1", name).await
    }

    async fn register(
        &self,
        user: &NewUser,
        initial: &QuotaGrant,
        activation: &UserToken,
    ) -> AppResult<User> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| database("Failed to begin transaction", e))?;

        let role_id: i64 = sqlx::query_scalar("SELECT id FROM roles WHERE name = $1")
            .bind(&user.role_name)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| database("Failed to load role", e))?
            .ok_or_else(|| AppError::not_found(format!("Role '{}' not found", user.role_name)))?;

        let user_id: i64 = sqlx::query_scalar(
            "INSERT INTO users (name, display_name, email, password_hash, role_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id",
        )
        .bind(&user.name)
        .bind(&user.display_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(role_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match constraint(&e) {
            Some("users_name_key") => {
                AppError::conflict(format!("Name '{}' is already taken", user.name))
            }
            Some("users_email_key") => {
                AppError::conflict(format!("Email '{}' is already registered", user.email))
            }
            _ => database("Failed to create user", e),
        })?;

        sqlx::query(
            "INSERT INTO user_limits (user_id, create_post_limit, comment_limit, like_limit, follow_limit) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(user_id)
        .bind(initial.create_post)
        .bind(initial.comment)
        .bind(initial.like)
        .bind(initial.follow)
        .execute(&mut *tx)
        .await
        .map_err(|e| database("Failed to create user limits", e))?;

        sqlx::query("INSERT INTO user_tokens (hash, user_id, expiry, scope) VALUES ($1, $2, $3, $4)")
            .bind(&activation.hash)
            .bind(user_id)
            .bind(activation.expiry)
            .bind(activation.scope.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| database("Failed to store activation token", e))?;

        let created = Self::fetch_one_by_id(&mut tx, user_id).await?;

        tx.commit()
            .await
            .map_err(|e| database("Failed to commit registration", e))?;

        Ok(created)
    }

    async fn activate(&self, token_hash: &[u8]) -> AppResult<User> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| database("Failed to begin transaction", e))?;

        let scope = TokenScope::Activation.as_str();

        let user_id: i64 = sqlx::query_scalar(
            "SELECT user_id FROM user_tokens WHERE hash = $1 AND scope = $2 AND expiry > NOW()",
        )
        .bind(token_hash)
        .bind(scope)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| database("Failed to look up activation token", e))?
        .ok_or_else(|| AppError::not_found("Invalid or expired activation token"))?;

        sqlx::query(
            "UPDATE users SET activated_at = COALESCE(activated_at, NOW()), updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| database("Failed to activate user", e))?;

        sqlx::query("DELETE FROM user_tokens WHERE user_id = $1 AND scope = $2")
            .bind(user_id)
            .bind(scope)
            .execute(&mut *tx)
            .await
            .map_err(|e| database("Failed to delete activation tokens", e))?;

        let activated = Self::fetch_one_by_id(&mut tx, user_id).await?;

        tx.commit()
            .await
            .map_err(|e| database("Failed to commit activation", e))?;

        Ok(activated)
    }

    async fn update_role(&self, user_name: &str, role_name: &str) -> AppResult<User> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| database("Failed to begin transaction", e))?;

        let user_id: i64 = sqlx::query_scalar(
            "UPDATE users SET role_id = r.id, updated_at = NOW() \
             FROM roles r \
             WHERE users.name = $1 AND r.name = $2 \
             RETURNING users.id",
        )
        .bind(user_name)
        .bind(role_name)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| database("Failed to update user role", e))?
        .ok_or_else(|| {
            AppError::not_found(format!("User '{user_name}' or role '{role_name}' not found"))
        })?;

        let updated = Self::fetch_one_by_id(&mut tx, user_id).await?;

        tx.commit()
            .await
            .map_err(|e| database("Failed to commit role update", e))?;

        Ok(updated)
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| database("Failed to delete user", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User {id} not found")));
        }
        Ok(())
    }
}
