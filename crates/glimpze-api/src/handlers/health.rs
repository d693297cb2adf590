//! Health check handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use glimpze_core::traits::cache::CacheProvider;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /v1/health
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ApiResponse<HealthResponse>>) {
    let database = status(state.stores.health_check().await);
    let cache = status(state.cache.health_check().await);
    let storage = status(state.storage.health_check().await);

    let healthy = [database, cache, storage].iter().all(|s| *s == "ok");
    let code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        code,
        Json(ApiResponse::ok(HealthResponse {
            status: if healthy { "ok" } else { "degraded" }.to_string(),
            environment: state.config.environment.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: database.to_string(),
            cache: cache.to_string(),
            storage: storage.to_string(),
        })),
    )
}

fn status<E: std::fmt::Display>(result: Result<bool, E>) -> &'static str {
    match result {
        Ok(true) => "ok",
        Ok(false) => "unavailable",
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            "error"
        }
    }
}
