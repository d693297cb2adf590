//! Shared test helpers for integration tests.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use glimpze_api::{AppState, build_app};
use glimpze_cache::CacheManager;
use glimpze_cache::memory::MemoryCacheProvider;
use glimpze_core::config::AppConfig;
use glimpze_database::store::UserStore;
use glimpze_database::{MemoryDatabase, Stores};
use glimpze_service::OutboxMailer;
use glimpze_storage::StorageManager;
use glimpze_storage::providers::MemoryBlobStore;

pub const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

const BOUNDARY: &str = "glimpze-test-boundary";

/// Test application context
pub struct TestApp {
    /// The Axum app for making test requests
    pub router: Router,
    /// Direct access to the stores behind the app
    pub stores: Stores,
    /// Blobs written by the app
    pub blobs: MemoryBlobStore,
    /// Mail sent by the app
    pub outbox: OutboxMailer,
}

/// A logged-in user.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: i64,
    pub access: String,
    pub refresh: String,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// All `Set-Cookie` values.
    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all("set-cookie")
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(String::from)
            .collect()
    }

    /// Value of the cookie `name` as set by this response.
    pub fn cookie(&self, name: &str) -> Option<String> {
        let prefix = format!("{name}=");
        self.set_cookies().into_iter().find_map(|c| {
            c.strip_prefix(&prefix)
                .and_then(|rest| rest.split(';').next())
                .map(String::from)
        })
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.access_secret = "integration-access-secret".into();
    config.auth.refresh_secret = "integration-refresh-secret".into();
    config.database.provider = "memory".into();
    config.cache.provider = "memory".into();
    config.storage.provider = "memory".into();
    config
}

impl TestApp {
    /// Create a new test application with the default test config
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Create a test application with a custom config
    pub fn with_config(config: AppConfig) -> Self {
        let stores = Stores::memory(MemoryDatabase::new());
        let cache = CacheManager::from_provider(Arc::new(MemoryCacheProvider::new(
            &config.cache.memory,
        )));
        let blobs = MemoryBlobStore::new();
        let storage = StorageManager::from_store(
            Arc::new(blobs.clone()),
            Duration::from_secs(config.storage.presign_ttl_seconds),
        );
        let outbox = OutboxMailer::new();

        let state = AppState::new(
            config,
            stores.clone(),
            cache,
            storage,
            Arc::new(outbox.clone()),
        )
        .expect("Failed to build app state");

        Self {
            router: build_app(state),
            stores,
            blobs,
            outbox,
        }
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Make a JSON request authenticated with a bearer token
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut req = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }
        self.send(json_body(req, body)).await
    }

    /// Make a JSON request carrying a raw `Cookie` header
    pub async fn request_with_cookie(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        cookie: &str,
    ) -> TestResponse {
        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Cookie", cookie);
        self.send(json_body(req, body)).await
    }

    /// Make a `multipart/form-data` request
    pub async fn multipart(
        &self,
        method: &str,
        path: &str,
        token: &str,
        fields: &[(&str, &str)],
        files: &[(&str, &[u8])],
    ) -> TestResponse {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        for (filename, data) in files {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Authorization", format!("Bearer {token}"))
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("Failed to build request");
        self.send(req).await
    }

    /// Register a user named `name` with password `hunter22`
    pub async fn register(&self, name: &str) -> TestResponse {
        self.request(
            "POST",
            "/v1/auth/register",
            Some(json!({
                "name": name,
                "display_name": name,
                "email": format!("{name}@example.com"),
                "password": "hunter22",
            })),
            None,
        )
        .await
    }

    /// Log in a registered user
    pub async fn login(&self, name: &str) -> TestResponse {
        self.request(
            "POST",
            "/v1/auth/login",
            Some(json!({
                "email": format!("{name}@example.com"),
                "password": "hunter22",
            })),
            None,
        )
        .await
    }

    /// Register and log in, returning the session
    pub async fn signup(&self, name: &str) -> Session {
        let registered = self.register(name).await;
        assert_eq!(registered.status, StatusCode::CREATED, "{:?}", registered.body);

        let response = self.login(name).await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

        let data = &response.body["data"];
        Session {
            user_id: data["user"]["id"].as_i64().expect("user id"),
            access: data["access_token"].as_str().expect("access token").to_string(),
            refresh: data["refresh_token"].as_str().expect("refresh token").to_string(),
        }
    }

    /// Register, promote to `role`, and log in
    pub async fn signup_with_role(&self, name: &str, role: &str) -> Session {
        let session = self.signup(name).await;
        self.stores
            .users
            .update_role(name, role)
            .await
            .expect("Failed to change role");
        session
    }

    /// Create a post with one PNG attachment, returning its id
    pub async fn create_post(&self, session: &Session, title: &str) -> i64 {
        let response = self
            .multipart(
                "POST",
                "/v1/posts",
                &session.access,
                &[("title", title), ("content", "hello")],
                &[("photo.png", PNG)],
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["data"]["id"].as_i64().expect("post id")
    }
}

fn json_body(req: axum::http::request::Builder, body: Option<Value>) -> Request<Body> {
    match body {
        Some(body) => req
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string())),
        None => req.body(Body::empty()),
    }
    .expect("Failed to build request")
}
