//! Session lifecycle manager: login, authenticate, refresh, and logout.

use std::sync::Arc;

use tracing::{debug, info, warn};

use glimpze_core::config::AuthConfig;
use glimpze_core::error::AppError;
use glimpze_core::result::AppResult;
use glimpze_database::store::UserStore;
use glimpze_entity::user::User;

use crate::jwt::{TokenClass, TokenIssuer, TokenPair, TokenVerifier};
use crate::password::PasswordHasher;

use super::registry::SessionRegistry;

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginResult {
    /// The authenticated user.
    pub user: User,
    /// Freshly minted and registered tokens.
    pub tokens: TokenPair,
}

/// Manages the complete session lifecycle.
///
/// Every token it hands out has a matching registry entry; every token it
/// accepts must still have one.
#[derive(Clone)]
pub struct SessionManager {
    issuer: Arc<TokenIssuer>,
    verifier: Arc<TokenVerifier>,
    registry: SessionRegistry,
    users: Arc<dyn UserStore>,
    password_hasher: PasswordHasher,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("issuer", &self.issuer)
            .field("registry", &self.registry)
            .finish()
    }
}

impl SessionManager {
    /// Creates a session manager. Fails when the token secrets are unusable.
    pub fn new(
        config: &AuthConfig,
        registry: SessionRegistry,
        users: Arc<dyn UserStore>,
    ) -> AppResult<Self> {
        Ok(Self {
            issuer: Arc::new(TokenIssuer::new(config)?),
            verifier: Arc::new(TokenVerifier::new(config)?),
            registry,
            users,
            password_hasher: PasswordHasher::new(),
        })
    }

    /// The verifier used for both token classes.
    pub fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }

    /// Performs the login flow:
    ///
    /// 1. Find the user by email (case-insensitive)
    /// 2. Verify the password
    /// 3. Issue a token pair
    /// 4. Register both tokens
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginResult> {
        let email = email.trim().to_lowercase();

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::unauthenticated("Invalid email or password"))?;

        if !self
            .password_hasher
            .verify_password(password, &user.password_hash)?
        {
            warn!(user_id = user.id, "Login rejected: wrong password");
            return Err(AppError::unauthenticated("Invalid email or password"));
        }

        let tokens = self.start_session(user.id).await?;
        info!(user_id = user.id, "Login successful");

        Ok(LoginResult { user, tokens })
    }

    /// Issues a pair for `user_id` and registers both halves.
    pub async fn start_session(&self, user_id: i64) -> AppResult<TokenPair> {
        let subject = user_id.to_string();
        let tokens = self.issuer.issue(&subject)?;
        self.persist(&subject, &tokens).await?;
        Ok(tokens)
    }

    async fn persist(&self, subject: &str, tokens: &TokenPair) -> AppResult<()> {
        for class in [TokenClass::Access, TokenClass::Refresh] {
            let issued = tokens.get(class);
            self.registry
                .set(
                    &class.session_key(&issued.token_id),
                    subject,
                    issued.expires_at,
                )
                .await?;
        }
        Ok(())
    }

    /// Resolves an access token to its user.
    ///
    /// The registry value decides which user the request acts as. A
    /// mismatch with the token subject is logged and otherwise ignored.
    pub async fn authenticate(&self, access_token: &str) -> AppResult<User> {
        let claims = self.verifier.verify(access_token, TokenClass::Access)?;

        let registered = self
            .registry
            .get(&TokenClass::Access.session_key(&claims.jti))
            .await?
            .ok_or_else(|| AppError::unauthenticated("Session not found"))?;

        if registered != claims.sub {
            warn!(
                token_id = %claims.jti,
                subject = %claims.sub,
                registered = %registered,
                "Session registry value differs from token subject"
            );
        }

        let user_id: i64 = registered.parse().map_err(|_| {
            AppError::internal(format!("Corrupt session entry for token {}", claims.jti))
        })?;

        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::unauthenticated("User no longer exists"))
    }

    /// Exchanges a refresh token for a new pair.
    ///
    /// The old refresh entry is deleted only after the new entries are
    /// written, so a failure part-way leaves the caller able to retry. A
    /// refresh token whose entry is gone (already used, or logged out) is
    /// rejected.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair> {
        let claims = self.verifier.verify(refresh_token, TokenClass::Refresh)?;
        let old_key = TokenClass::Refresh.session_key(&claims.jti);

        let subject = self
            .registry
            .get(&old_key)
            .await?
            .ok_or_else(|| AppError::unauthenticated("Refresh session not found"))?;

        if subject != claims.sub {
            warn!(
                token_id = %claims.jti,
                subject = %claims.sub,
                registered = %subject,
                "Refresh registry value differs from token subject"
            );
        }

        let tokens = self.issuer.issue(&subject)?;
        self.persist(&subject, &tokens).await?;
        self.registry.delete(&old_key).await?;

        debug!(user_id = %subject, "Session rotated");
        Ok(tokens)
    }

    /// Revokes whatever tokens verify. Never fails.
    pub async fn logout(&self, access_token: Option<&str>, refresh_token: Option<&str>) {
        let presented = [
            (TokenClass::Access, access_token),
            (TokenClass::Refresh, refresh_token),
        ];

        for (class, token) in presented {
            let Some(token) = token.filter(|t| !t.is_empty()) else {
                continue;
            };
            match self.verifier.verify(token, class) {
                Ok(claims) => {
                    if let Err(e) = self.registry.delete(&class.session_key(&claims.jti)).await {
                        warn!(class = %class, error = %e, "Failed to delete session entry");
                    }
                }
                Err(e) => debug!(class = %class, error = %e, "Ignoring unverifiable token on logout"),
            }
        }
    }
}
