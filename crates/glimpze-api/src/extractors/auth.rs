//! `AuthUser` extractors: pull the access token from the cookie or the
//! `Authorization` header and resolve it to a user through the session
//! registry.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;

use glimpze_auth::TokenClass;
use glimpze_core::error::AppError;
use glimpze_entity::user::User;

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated user. Rejects the request with 401 otherwise.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl std::ops::Deref for AuthUser {
    type Target = User;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = access_token(&parts.headers)
            .ok_or_else(|| AppError::unauthenticated("Missing access token"))?;

        let user = state.sessions.authenticate(&token).await?;
        Ok(AuthUser(user))
    }
}

/// The authenticated user if the request carries a live session, else
/// `None`. Never rejects.
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<User>);

impl FromRequestParts<AppState> for OptionalAuthUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = access_token(&parts.headers) else {
            return Ok(OptionalAuthUser(None));
        };

        match state.sessions.authenticate(&token).await {
            Ok(user) => Ok(OptionalAuthUser(Some(user))),
            Err(e) => {
                if e.kind.is_server_error() {
                    tracing::warn!(error = %e, "Treating request as anonymous after session lookup failure");
                } else {
                    tracing::debug!(error = %e, "Treating request as anonymous");
                }
                Ok(OptionalAuthUser(None))
            }
        }
    }
}

/// Access token from the `access_token` cookie, falling back to
/// `Authorization: Bearer`.
pub fn access_token(headers: &HeaderMap) -> Option<String> {
    cookie_token(headers, TokenClass::Access).or_else(|| bearer_token(headers))
}

/// Non-empty value of the cookie for `class`.
pub fn cookie_token(headers: &HeaderMap, class: TokenClass) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(class.cookie_name())
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// Token from an `Authorization: Bearer` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::http::HeaderValue;
    use axum::http::header::COOKIE;

    #[test]
    fn test_cookie_preferred_over_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; access_token=from-cookie"));
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));
        assert_eq!(access_token(&headers).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn test_bearer_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("access_token="));
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(access_token(&headers).as_deref(), Some("abc"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(access_token(&headers), None);
    }

    #[test]
    fn test_refresh_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("refresh_token=r1"));
        assert_eq!(cookie_token(&headers, TokenClass::Refresh).as_deref(), Some("r1"));
        assert_eq!(cookie_token(&headers, TokenClass::Access), None);
    }
}
