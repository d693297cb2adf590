//! `Set-Cookie` header values for the auth cookies.

use chrono::{DateTime, Utc};

use crate::jwt::TokenClass;

/// Builds auth cookies with a fixed attribute set.
#[derive(Debug, Clone, Copy)]
pub struct AuthCookies {
    /// Whether to emit the `Secure` attribute.
    secure: bool,
}

impl AuthCookies {
    /// Creates a builder. `secure` should only be off for plain-HTTP local
    /// development.
    pub fn new(secure: bool) -> Self {
        Self { secure }
    }

    /// Cookie carrying `token` until `expires_at`.
    pub fn set(&self, class: TokenClass, token: &str, expires_at: DateTime<Utc>) -> String {
        let max_age = (expires_at - Utc::now()).num_seconds().max(0);
        self.build(class.cookie_name(), token, max_age)
    }

    /// Cookie that makes the browser drop the cookie for `class`.
    pub fn clear(&self, class: TokenClass) -> String {
        self.build(class.cookie_name(), "", -1)
    }

    fn build(&self, name: &str, value: &str, max_age: i64) -> String {
        let secure = if self.secure { "; Secure" } else { "" };
        format!("{name}={value}; HttpOnly{secure}; SameSite=Lax; Path=/; Max-Age={max_age}")
    }
}

impl Default for AuthCookies {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_set_cookie_attributes() {
        let cookie = AuthCookies::default().set(
            TokenClass::Access,
            "abc",
            Utc::now() + Duration::minutes(15),
        );
        assert!(cookie.starts_with("access_token=abc; HttpOnly; Secure; SameSite=Lax; Path=/"));
        let max_age: i64 = cookie.rsplit("Max-Age=").next().unwrap().parse().unwrap();
        assert!((899..=900).contains(&max_age));
    }

    #[test]
    fn test_clear_cookie() {
        let cookie = AuthCookies::new(false).clear(TokenClass::Refresh);
        assert_eq!(
            cookie,
            "refresh_token=; HttpOnly; SameSite=Lax; Path=/; Max-Age=-1"
        );
    }
}
