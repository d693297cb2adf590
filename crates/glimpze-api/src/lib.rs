//! # glimpze-api
//!
//! HTTP API layer for Glimpze built on Axum.
//!
//! Provides the `/v1` REST endpoints, the authentication extractors,
//! middleware (CORS, rate limiting, tracing), DTOs, and the mapping from
//! [`AppError`](glimpze_core::error::AppError) to HTTP responses via
//! [`ApiError`](error::ApiError).

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::{ApiError, ApiResult};
pub use state::AppState;
