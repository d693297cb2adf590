//! JWT claims carried by access and refresh tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use glimpze_cache::keys;

/// Registered claims embedded in every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject, the user id as a decimal string.
    pub sub: String,
    /// Unique token id; keys the session registry entry.
    pub jti: String,
    /// Issuer.
    pub iss: String,
    /// Audience.
    pub aud: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

/// The two token classes. Each is signed with its own secret and has its
/// own lifetime and session key namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    /// Short-lived token presented on every request.
    Access,
    /// Long-lived token exchanged for a new pair.
    Refresh,
}

impl TokenClass {
    /// Session registry key for a token of this class.
    pub fn session_key(&self, token_id: &str) -> String {
        match self {
            Self::Access => keys::access_session(token_id),
            Self::Refresh => keys::refresh_session(token_id),
        }
    }

    /// Name of the cookie carrying a token of this class.
    pub fn cookie_name(&self) -> &'static str {
        match self {
            Self::Access => "access_token",
            Self::Refresh => "refresh_token",
        }
    }
}

impl std::fmt::Display for TokenClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Access => write!(f, "{}", keys::ACCESS_CLASS),
            Self::Refresh => write!(f, "{}", keys::REFRESH_CLASS),
        }
    }
}
