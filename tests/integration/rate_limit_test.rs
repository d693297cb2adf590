//! Integration tests for per-client rate limiting.

use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use crate::helpers::{TestApp, test_config};

fn limited_app(trusted_proxies: Vec<String>) -> TestApp {
    let mut config = test_config();
    config.server.rate_limit.enabled = true;
    config.server.rate_limit.burst = 2;
    config.server.rate_limit.requests_per_minute = 1;
    config.server.rate_limit.trusted_proxies = trusted_proxies;
    TestApp::with_config(config)
}

async fn health_from(app: &TestApp, peer: &str, forwarded_for: Option<&str>) -> StatusCode {
    let mut builder = Request::builder().method("GET").uri("/v1/health");
    if let Some(forwarded_for) = forwarded_for {
        builder = builder.header("X-Forwarded-For", forwarded_for);
    }
    let mut req = builder.body(Body::empty()).unwrap();
    let addr: SocketAddr = peer.parse().unwrap();
    req.extensions_mut().insert(ConnectInfo(addr));

    app.router.clone().oneshot(req).await.unwrap().status()
}

#[tokio::test]
async fn test_spoofed_forwarded_for_does_not_bypass_limit() {
    let app = limited_app(vec![]);

    let mut admitted = 0;
    for i in 0..50 {
        let spoofed = format!("10.0.0.{i}");
        if health_from(&app, "203.0.113.5:40000", Some(&spoofed)).await == StatusCode::OK {
            admitted += 1;
        }
    }
    assert_eq!(admitted, 2);

    // Another peer has its own bucket.
    assert_eq!(health_from(&app, "203.0.113.6:40000", None).await, StatusCode::OK);
}

#[tokio::test]
async fn test_limited_response_body() {
    let app = limited_app(vec![]);
    for _ in 0..2 {
        health_from(&app, "203.0.113.5:40000", None).await;
    }

    let mut req = Request::builder()
        .uri("/v1/health")
        .body(Body::empty())
        .unwrap();
    req.extensions_mut()
        .insert(ConnectInfo("203.0.113.5:40000".parse::<SocketAddr>().unwrap()));
    let response = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "RATE_LIMITED");
}

#[tokio::test]
async fn test_trusted_proxy_limits_each_forwarded_client() {
    let app = limited_app(vec!["10.1.1.1".into()]);

    for _ in 0..2 {
        assert_eq!(
            health_from(&app, "10.1.1.1:5000", Some("198.51.100.1")).await,
            StatusCode::OK
        );
    }
    assert_eq!(
        health_from(&app, "10.1.1.1:5000", Some("198.51.100.1")).await,
        StatusCode::TOO_MANY_REQUESTS
    );
    assert_eq!(
        health_from(&app, "10.1.1.1:5000", Some("198.51.100.2")).await,
        StatusCode::OK
    );
}
