//! Account lifecycle: registration with an emailed activation link, and
//! activation by token.

use std::sync::Arc;

use chrono::Duration;
use tracing::{error, info};

use glimpze_auth::token::{generate_activation, hash_token};
use glimpze_auth::{PasswordHasher, PasswordValidator};
use glimpze_core::config::{AuthConfig, QuotaGrant};
use glimpze_core::error::AppError;
use glimpze_core::result::AppResult;
use glimpze_database::store::UserStore;
use glimpze_entity::user::{DEFAULT_ROLE, NewUser, User};

use crate::mail::{Mailer, templates};

/// Input to [`AccountService::register`]. Field shapes are checked by the
/// HTTP layer; the password policy is checked here.
#[derive(Debug, Clone)]
pub struct Registration {
    /// Unique handle.
    pub name: String,
    /// Display name.
    pub display_name: String,
    /// Email address, matched case-insensitively.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Registers and activates accounts.
#[derive(Debug, Clone)]
pub struct AccountService {
    users: Arc<dyn UserStore>,
    mailer: Arc<dyn Mailer>,
    hasher: PasswordHasher,
    validator: PasswordValidator,
    initial_quota: QuotaGrant,
    activation_ttl: Duration,
    activation_url: String,
}

impl AccountService {
    /// Creates a new account service.
    pub fn new(
        users: Arc<dyn UserStore>,
        mailer: Arc<dyn Mailer>,
        auth: &AuthConfig,
        initial_quota: QuotaGrant,
    ) -> Self {
        Self {
            users,
            mailer,
            hasher: PasswordHasher::new(),
            validator: PasswordValidator::new(auth),
            initial_quota,
            activation_ttl: Duration::hours(auth.activation_ttl_hours as i64),
            activation_url: auth.activation_url.clone(),
        }
    }

    /// Creates an unactivated account with the default role and the
    /// initial quota, then mails the activation link.
    ///
    /// If the mail cannot be sent the account is removed again, so the
    /// address can be registered once more.
    pub async fn register(&self, input: Registration) -> AppResult<User> {
        self.validator.validate(&input.password)?;

        let new_user = NewUser {
            name: input.name.trim().to_string(),
            display_name: input.display_name.trim().to_string(),
            email: input.email.trim().to_lowercase(),
            password_hash: self.hasher.hash_password(&input.password)?,
            role_name: DEFAULT_ROLE.to_string(),
        };

        let token = generate_activation(self.activation_ttl);
        let user = self
            .users
            .register(&new_user, &self.initial_quota, &token)
            .await?;

        let link = format!("{}?token={}", self.activation_url, token.plaintext);
        let message = templates::activation(&user.name, &user.email, &link);

        if let Err(e) = self.mailer.send(&message).await {
            error!(user_id = user.id, error = %e, "Activation mail failed; rolling back registration");
            if let Err(cleanup) = self.users.delete(user.id).await {
                error!(user_id = user.id, error = %cleanup, "Failed to remove unconfirmed user");
            }
            return Err(e);
        }

        info!(user_id = user.id, name = %user.name, "User registered");
        Ok(user)
    }

    /// Activates the account owning `token`. Unknown, expired, and already
    /// used tokens are `NotFound`.
    pub async fn activate(&self, token: &str) -> AppResult<User> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::validation("Activation token is required"));
        }

        let user = self.users.activate(&hash_token(token)).await?;
        info!(user_id = user.id, "User activated");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use glimpze_core::error::ErrorKind;

    use crate::mail::OutboxMailer;
    use crate::testing::Fixture;

    fn registration(name: &str, email: &str) -> Registration {
        Registration {
            name: name.into(),
            display_name: name.into(),
            email: email.into(),
            password: "hunter22".into(),
        }
    }

    fn token_from(outbox: &OutboxMailer) -> String {
        let html = &outbox.sent()[0].html;
        let start = html.find("token=").unwrap() + "token=".len();
        let end = start + html[start..].find('"').unwrap();
        html[start..end].to_string()
    }

    #[tokio::test]
    async fn test_register_then_activate() {
        let f = Fixture::new();
        let user = f
            .accounts
            .register(registration("alice", "Alice@Example.COM"))
            .await
            .unwrap();
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.role.name, DEFAULT_ROLE);
        assert!(!user.is_activated());

        let token = token_from(&f.outbox);
        let activated = f.accounts.activate(&token).await.unwrap();
        assert!(activated.is_activated());

        let again = f.accounts.activate(&token).await.unwrap_err();
        assert_eq!(again.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_duplicate_email_ignores_case() {
        let f = Fixture::new();
        f.accounts
            .register(registration("alice", "alice@example.com"))
            .await
            .unwrap();
        let err = f
            .accounts
            .register(registration("alice2", "ALICE@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_short_password_rejected() {
        let f = Fixture::new();
        let mut input = registration("bob", "bob@example.com");
        input.password = "123".into();
        let err = f.accounts.register(input).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_mail_failure_removes_user() {
        let f = Fixture::with_mailer(OutboxMailer::failing());
        let err = f
            .accounts
            .register(registration("carol", "carol@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExternalService);
        assert!(f
            .stores
            .users
            .find_by_email("carol@example.com")
            .await
            .unwrap()
            .is_none());
    }
}
