//! Cache key builders for every Glimpze cache entry.
//!
//! Keys are unprefixed here; the Redis provider adds its configured prefix.

/// Key class for access-token sessions.
pub const ACCESS_CLASS: &str = "access";
/// Key class for refresh-token sessions.
pub const REFRESH_CLASS: &str = "refresh";

// ── Session keys ───────────────────────────────────────────

/// Session registry key for a token of the given class, `"<class>:<token-id>"`.
pub fn session(class: &str, token_id: &str) -> String {
    format!("{class}:{token_id}")
}

/// Session registry key for an access token.
pub fn access_session(token_id: &str) -> String {
    session(ACCESS_CLASS, token_id)
}

/// Session registry key for a refresh token.
pub fn refresh_session(token_id: &str) -> String {
    session(REFRESH_CLASS, token_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_keys() {
        assert_eq!(access_session("abc"), "access:abc");
        assert_eq!(refresh_session("abc"), "refresh:abc");
    }
}
