//! Token pair minting with per-class secrets and lifetimes.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use uuid::Uuid;

use glimpze_core::config::AuthConfig;
use glimpze_core::error::AppError;

use super::claims::{Claims, TokenClass};

/// One signed token plus the facts needed to persist its session entry.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Compact JWT.
    pub token: String,
    /// The `jti` claim.
    pub token_id: String,
    /// The `exp` claim.
    pub expires_at: DateTime<Utc>,
}

/// Result of a successful token pair generation.
#[derive(Debug, Clone)]
pub struct TokenPair {
    /// Short-lived access token.
    pub access: IssuedToken,
    /// Long-lived refresh token.
    pub refresh: IssuedToken,
}

impl TokenPair {
    /// The half of the pair of the given class.
    pub fn get(&self, class: TokenClass) -> &IssuedToken {
        match class {
            TokenClass::Access => &self.access,
            TokenClass::Refresh => &self.refresh,
        }
    }
}

/// Creates signed access and refresh tokens.
///
/// Minting is pure; persisting the session entries is the caller's job.
#[derive(Clone)]
pub struct TokenIssuer {
    access_key: EncodingKey,
    refresh_key: EncodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
    issuer: String,
    audience: String,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish()
    }
}

impl TokenIssuer {
    /// Creates an issuer from auth configuration.
    ///
    /// Fails with a configuration error when either secret is empty or both
    /// secrets are the same.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        check_secrets(config)?;

        Ok(Self {
            access_key: EncodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_key: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            access_ttl: Duration::minutes(config.access_ttl_minutes as i64),
            refresh_ttl: Duration::days(config.refresh_ttl_days as i64),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        })
    }

    /// Mints a fresh access + refresh pair for `subject`.
    ///
    /// Every token gets its own random id, so no two tokens ever share a
    /// session key.
    pub fn issue(&self, subject: &str) -> Result<TokenPair, AppError> {
        let now = Utc::now();
        Ok(TokenPair {
            access: self.sign(subject, TokenClass::Access, now)?,
            refresh: self.sign(subject, TokenClass::Refresh, now)?,
        })
    }

    fn sign(
        &self,
        subject: &str,
        class: TokenClass,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, AppError> {
        let (key, ttl) = match class {
            TokenClass::Access => (&self.access_key, self.access_ttl),
            TokenClass::Refresh => (&self.refresh_key, self.refresh_ttl),
        };
        let expires_at = now + ttl;

        let claims = Claims {
            sub: subject.to_string(),
            jti: Uuid::new_v4().to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, key)
            .map_err(|e| AppError::internal(format!("Failed to encode {class} token: {e}")))?;

        Ok(IssuedToken {
            token,
            token_id: claims.jti,
            expires_at,
        })
    }
}

pub(crate) fn check_secrets(config: &AuthConfig) -> Result<(), AppError> {
    if config.access_secret.is_empty() || config.refresh_secret.is_empty() {
        return Err(AppError::configuration(
            "auth.access_secret and auth.refresh_secret must both be set",
        ));
    }
    if config.access_secret == config.refresh_secret {
        return Err(AppError::configuration(
            "auth.access_secret and auth.refresh_secret must differ",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glimpze_core::error::ErrorKind;

    #[test]
    fn test_empty_secret_is_configuration_error() {
        let config = AuthConfig {
            access_secret: String::new(),
            refresh_secret: "r".into(),
            ..AuthConfig::default()
        };
        let err = TokenIssuer::new(&config).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_shared_secret_is_rejected() {
        let config = AuthConfig {
            access_secret: "same".into(),
            refresh_secret: "same".into(),
            ..AuthConfig::default()
        };
        assert!(TokenIssuer::new(&config).is_err());
    }

    #[test]
    fn test_lifetimes_follow_config() {
        let config = AuthConfig {
            access_secret: "a".into(),
            refresh_secret: "r".into(),
            ..AuthConfig::default()
        };
        let pair = TokenIssuer::new(&config).unwrap().issue("7").unwrap();
        let access_left = pair.access.expires_at - Utc::now();
        let refresh_left = pair.refresh.expires_at - Utc::now();
        assert!(access_left <= Duration::minutes(15));
        assert!(access_left > Duration::minutes(14));
        assert!(refresh_left > Duration::days(6));
        assert_ne!(pair.access.token_id, pair.refresh.token_id);
    }
}
