//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Token, cookie, and credential configuration.
///
/// Access and refresh tokens are signed with separate secrets. Both must be
/// non-empty; the token issuer refuses to start otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC-SHA256 secret for access tokens.
    #[serde(default)]
    pub access_secret: String,
    /// HMAC-SHA256 secret for refresh tokens.
    #[serde(default)]
    pub refresh_secret: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: u64,
    /// Refresh token TTL in days.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_days: u64,
    /// `iss` claim written and required.
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// `aud` claim written and required.
    #[serde(default = "default_audience")]
    pub audience: String,
    /// Whether auth cookies carry the `Secure` attribute.
    #[serde(default = "default_true")]
    pub cookie_secure: bool,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Maximum password length.
    #[serde(default = "default_password_max")]
    pub password_max_length: usize,
    /// Minimum zxcvbn score (0 disables the strength check).
    #[serde(default)]
    pub password_min_strength: u8,
    /// Lifetime of account activation tokens in hours.
    #[serde(default = "default_activation_ttl")]
    pub activation_ttl_hours: u64,
    /// Front-end URL the activation token is appended to.
    #[serde(default = "default_activation_url")]
    pub activation_url: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_secret: String::new(),
            refresh_secret: String::new(),
            access_ttl_minutes: default_access_ttl(),
            refresh_ttl_days: default_refresh_ttl(),
            issuer: default_issuer(),
            audience: default_audience(),
            cookie_secure: true,
            password_min_length: default_password_min(),
            password_max_length: default_password_max(),
            password_min_strength: 0,
            activation_ttl_hours: default_activation_ttl(),
            activation_url: default_activation_url(),
        }
    }
}

fn default_access_ttl() -> u64 {
    15
}

fn default_refresh_ttl() -> u64 {
    7
}

fn default_issuer() -> String {
    "glimpze-app".to_string()
}

fn default_audience() -> String {
    "glimpze-client".to_string()
}

fn default_true() -> bool {
    true
}

fn default_password_min() -> usize {
    6
}

fn default_password_max() -> usize {
    72
}

fn default_activation_ttl() -> u64 {
    72
}

fn default_activation_url() -> String {
    "http://localhost:5173/activate".to_string()
}
