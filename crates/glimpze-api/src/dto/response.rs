//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use glimpze_auth::TokenPair;
use glimpze_entity::user::User;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Token pair as returned in response bodies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
}

impl From<&TokenPair> for TokenResponse {
    fn from(pair: &TokenPair) -> Self {
        Self {
            access_token: pair.access.token.clone(),
            refresh_token: pair.refresh.token.clone(),
            access_expires_at: pair.access.expires_at,
            refresh_expires_at: pair.refresh.expires_at,
        }
    }
}

/// Login response.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// The logged-in user.
    pub user: User,
    #[serde(flatten)]
    pub tokens: TokenResponse,
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"` when every dependency answers, otherwise `"degraded"`.
    pub status: String,
    /// Deployment environment.
    pub environment: String,
    /// Crate version.
    pub version: String,
    /// Database status.
    pub database: String,
    /// Session store status.
    pub cache: String,
    /// Blob storage status.
    pub storage: String,
}
