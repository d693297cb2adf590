//! HTTP integration tests over the in-memory backends.

mod helpers;

mod auth_test;
mod content_test;
mod feed_test;
mod quota_test;
mod rate_limit_test;
