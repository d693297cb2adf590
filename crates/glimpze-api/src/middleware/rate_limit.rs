//! Per-client token bucket rate limiter middleware.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Json;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use moka::future::Cache;
use tokio::sync::Mutex;

use glimpze_core::config::RateLimitConfig;
use glimpze_core::error::AppError;
use glimpze_core::result::AppResult;

use crate::error::ApiErrorResponse;
use crate::state::AppState;

/// Upper bound on tracked clients.
const MAX_CLIENTS: u64 = 100_000;

/// In-memory token bucket rate limiter keyed by client address.
///
/// Buckets idle for longer than a full refill are evicted; a returning
/// client starts with a full bucket, which is what it would have had anyway.
#[derive(Clone)]
pub struct RateLimiter {
    buckets: Cache<IpAddr, Arc<Mutex<TokenBucket>>>,
    /// Maximum tokens per bucket.
    max_tokens: u32,
    /// Token refill rate per second.
    refill_rate: f64,
    /// Peers whose `X-Forwarded-For` header is believed.
    trusted_proxies: Arc<[IpAddr]>,
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("max_tokens", &self.max_tokens)
            .field("refill_rate", &self.refill_rate)
            .field("trusted_proxies", &self.trusted_proxies)
            .field("clients", &self.buckets.entry_count())
            .finish()
    }
}

#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
}

impl RateLimiter {
    /// Creates a limiter with `max_tokens` burst and `refill_rate` tokens
    /// per second.
    pub fn new(max_tokens: u32, refill_rate: f64, trusted_proxies: Vec<IpAddr>) -> Self {
        let max_tokens = max_tokens.max(1);
        let refill_secs = if refill_rate > 0.0 {
            (f64::from(max_tokens) / refill_rate).ceil() as u64
        } else {
            3600
        };
        let idle = Duration::from_secs(refill_secs.clamp(60, 86_400));

        Self {
            buckets: Cache::builder()
                .max_capacity(MAX_CLIENTS)
                .time_to_idle(idle)
                .build(),
            max_tokens,
            refill_rate,
            trusted_proxies: trusted_proxies.into(),
        }
    }

    /// Builds a limiter from configuration. Fails on an unparseable
    /// trusted proxy address.
    pub fn from_config(config: &RateLimitConfig) -> AppResult<Self> {
        let trusted = config
            .trusted_proxies
            .iter()
            .map(|p| {
                p.trim().parse::<IpAddr>().map_err(|_| {
                    AppError::configuration(format!(
                        "server.rate_limit.trusted_proxies: invalid address '{p}'"
                    ))
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Self::new(
            config.burst,
            f64::from(config.requests_per_minute) / 60.0,
            trusted,
        ))
    }

    /// Attempts to consume a token for the given client.
    pub async fn check(&self, client: IpAddr) -> bool {
        let max_tokens = f64::from(self.max_tokens);
        let bucket = self
            .buckets
            .get_with(client, async move {
                Arc::new(Mutex::new(TokenBucket {
                    tokens: max_tokens,
                    last_refill: Instant::now(),
                }))
            })
            .await;

        let mut bucket = bucket.lock().await;
        let now = Instant::now();
        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.refill_rate).min(max_tokens);
        bucket.last_refill = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// The address a request is charged to.
    ///
    /// `X-Forwarded-For` is only read when the peer is a trusted proxy; the
    /// rightmost hop that is not itself a trusted proxy is the client.
    pub fn client_addr(&self, peer: Option<IpAddr>, headers: &HeaderMap) -> Option<IpAddr> {
        let peer = peer?;
        if !self.trusted_proxies.contains(&peer) {
            return Some(peer);
        }

        let forwarded = headers
            .get_all("x-forwarded-for")
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(','))
            .filter_map(|hop| hop.trim().parse::<IpAddr>().ok())
            .collect::<Vec<_>>();

        Some(
            forwarded
                .into_iter()
                .rev()
                .find(|hop| !self.trusted_proxies.contains(hop))
                .unwrap_or(peer),
        )
    }
}

/// Rejects requests from clients whose bucket is empty.
///
/// No-op unless `server.rate_limit.enabled` is set. Requests without a
/// peer address (in-process callers) are not limited.
pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if !state.config.server.rate_limit.enabled {
        return next.run(request).await;
    }

    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    let Some(client) = state.rate_limiter.client_addr(peer, request.headers()) else {
        return next.run(request).await;
    };

    if state.rate_limiter.check(client).await {
        next.run(request).await
    } else {
        tracing::warn!(client = %client, "Rate limit exceeded");
        let body = ApiErrorResponse {
            error: "RATE_LIMITED".to_string(),
            message: "Too many requests".to_string(),
        };
        (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response()
    }
}
