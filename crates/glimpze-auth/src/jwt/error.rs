//! Token verification failures.

use thiserror::Error;

use glimpze_core::error::{AppError, ErrorKind};

/// Why a token was rejected. Callers only ever see `Unauthenticated`; the
/// variant is kept for logs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The signature does not verify with the class secret.
    #[error("invalid token signature")]
    InvalidSignature,
    /// The header names an algorithm other than HS256.
    #[error("unexpected signing algorithm")]
    UnexpectedAlgorithm,
    /// The token is past its expiry.
    #[error("token has expired")]
    Expired,
    /// Anything else: bad encoding, missing or mismatched claims.
    #[error("malformed token: {0}")]
    Malformed(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind as Jwt;

        match err.kind() {
            Jwt::InvalidSignature => Self::InvalidSignature,
            Jwt::InvalidAlgorithm => Self::UnexpectedAlgorithm,
            Jwt::ExpiredSignature => Self::Expired,
            _ => Self::Malformed(err.to_string()),
        }
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        AppError::with_source(ErrorKind::Unauthenticated, "invalid or expired token", err)
    }
}
