//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Unique handle.
    #[validate(length(min = 2, max = 30, message = "Name must be 2-30 characters"))]
    pub name: String,
    /// Display name.
    #[validate(length(min = 2, max = 30, message = "Display name must be 2-30 characters"))]
    pub display_name: String,
    /// Email address.
    #[validate(
        email(message = "Email is invalid"),
        length(max = 255, message = "Email is too long")
    )]
    pub email: String,
    /// Password. Strength rules are applied by the account service.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Account activation request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ActivateRequest {
    /// Plaintext token from the activation link.
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address.
    #[validate(
        email(message = "Email is invalid"),
        length(max = 255, message = "Email is too long")
    )]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, max = 72, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request body, for clients that cannot keep cookies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Comment create/update body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CommentRequest {
    /// Comment text.
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
}

/// Tag name body, used to create a tag or attach one to a post.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TagRequest {
    /// Tag name.
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
}

/// Profile update body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// Free-form biography.
    pub biodata: String,
}

/// Role change body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateRoleRequest {
    /// Name of the new role.
    #[validate(length(min = 1, message = "Role is required"))]
    pub role: String,
}
