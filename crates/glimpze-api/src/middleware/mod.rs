//! Tower and Axum middleware.

pub mod cors;
pub mod rate_limit;
