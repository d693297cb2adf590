//! Guards placed in front of mutating operations.
//!
//! Roles are compared by level only: a user passes when their role's level
//! is at least that of the required role.

use std::sync::Arc;

use tracing::{debug, error};

use glimpze_core::error::AppError;
use glimpze_core::result::AppResult;
use glimpze_database::store::RoleStore;
use glimpze_entity::user::User;

/// Enforces role precedence and resource ownership.
#[derive(Debug, Clone)]
pub struct RoleGuard {
    roles: Arc<dyn RoleStore>,
}

impl RoleGuard {
    /// Creates a guard that resolves required roles through `roles`.
    pub fn new(roles: Arc<dyn RoleStore>) -> Self {
        Self { roles }
    }

    /// Passes iff `user`'s role level is at least that of `required`.
    ///
    /// Failing to load the required role is an internal error, not a denial.
    pub async fn require_role(&self, user: &User, required: &str) -> AppResult<()> {
        let role = match self.roles.find_by_name(required).await {
            Ok(Some(role)) => role,
            Ok(None) => {
                error!(role = %required, "Required role is not defined");
                return Err(AppError::internal(format!("Role '{required}' is not defined")));
            }
            Err(e) => {
                error!(role = %required, error = %e, "Failed to load required role");
                return Err(AppError::internal("Failed to load role"));
            }
        };

        debug!(
            user_id = user.id,
            user_role = %user.role.name,
            user_level = user.role.level,
            required_role = %role.name,
            required_level = role.level,
            "Checking role precedence"
        );

        if user.role.has_at_least(&role) {
            Ok(())
        } else {
            Err(AppError::forbidden(format!(
                "Role '{}' is insufficient; minimum required: '{required}'",
                user.role.name
            )))
        }
    }

    /// The owner of a resource passes; anyone else needs `required`.
    pub async fn require_owner_or_role(
        &self,
        user: &User,
        owner_id: i64,
        required: &str,
    ) -> AppResult<()> {
        if user.id == owner_id {
            return Ok(());
        }
        self.require_role(user, required).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use chrono::Utc;

    use glimpze_core::error::ErrorKind;
    use glimpze_entity::user::{Role, UserLimit};

    fn role(name: &str, level: i32) -> Role {
        Role {
            id: level as i64,
            name: name.to_string(),
            level,
            description: String::new(),
            created_at: Utc::now(),
        }
    }

    fn user(id: i64, level: i32) -> User {
        let now = Utc::now();
        User {
            id,
            name: format!("u{id}"),
            display_name: String::new(),
            email: format!("u{id}@example.com"),
            password_hash: String::new(),
            activated_at: None,
            created_at: now,
            updated_at: now,
            role: role("custom", level),
            limits: UserLimit {
                user_id: id,
                create_post_limit: 0,
                comment_limit: 0,
                like_limit: 0,
                follow_limit: 0,
                created_at: now,
                updated_at: now,
            },
        }
    }

    #[derive(Debug)]
    struct FixedRoles;

    #[async_trait]
    impl RoleStore for FixedRoles {
        async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
            match name {
                "moderator" => Ok(Some(role("moderator", 3))),
                "broken" => Err(AppError::database("connection reset")),
                _ => Ok(None),
            }
        }
    }

    fn guard() -> RoleGuard {
        RoleGuard::new(Arc::new(FixedRoles))
    }

    #[tokio::test]
    async fn test_level_precedence() {
        assert!(guard().require_role(&user(1, 5), "moderator").await.is_ok());
        assert!(guard().require_role(&user(1, 3), "moderator").await.is_ok());
        let err = guard().require_role(&user(1, 2), "moderator").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_role_load_failure_is_internal() {
        let err = guard().require_role(&user(1, 9), "broken").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Internal);
        let err = guard().require_role(&user(1, 9), "missing").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Internal);
    }

    #[tokio::test]
    async fn test_owner_bypasses_role() {
        assert!(guard().require_owner_or_role(&user(7, 1), 7, "moderator").await.is_ok());
        let err = guard()
            .require_owner_or_role(&user(7, 1), 8, "moderator")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }
}
