//! Integration tests for the registration and session lifecycle.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_register_sends_activation_mail() {
    let app = TestApp::new();

    let response = app.register("alice").await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["name"], "alice");
    assert!(response.body["data"].get("password_hash").is_none());

    let sent = app.outbox.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to_email, "alice@example.com");
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let app = TestApp::new();
    app.register("alice").await;
    let again = app.register("alice").await;
    assert_eq!(again.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_rejects_bad_input() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            "/v1/auth/register",
            Some(json!({
                "name": "a",
                "display_name": "alice",
                "email": "not-an-email",
                "password": "hunter22",
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_activation_by_mailed_token() {
    let app = TestApp::new();
    app.register("alice").await;

    let html = app.outbox.sent()[0].html.clone();
    let token = html
        .split("token=")
        .nth(1)
        .and_then(|rest| rest.split('"').next())
        .expect("activation link")
        .to_string();

    let response = app
        .request("PATCH", "/v1/auth/activate", Some(json!({ "token": token })), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let reuse = app
        .request("PATCH", "/v1/auth/activate", Some(json!({ "token": token })), None)
        .await;
    assert_eq!(reuse.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_login_sets_cookies() {
    let app = TestApp::new();
    app.register("alice").await;

    let response = app.login("alice").await;
    assert_eq!(response.status, StatusCode::OK);

    let cookies = response.set_cookies();
    assert_eq!(cookies.len(), 2);
    assert!(cookies.iter().all(|c| c.contains("HttpOnly") && c.contains("SameSite=Lax")));
    assert_eq!(
        response.cookie("access_token").as_deref(),
        response.body["data"]["access_token"].as_str()
    );
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let app = TestApp::new();
    app.register("alice").await;

    let response = app
        .request(
            "POST",
            "/v1/auth/login",
            Some(json!({ "email": "alice@example.com", "password": "wrong-password" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_access_cookie_and_bearer_both_authenticate() {
    let app = TestApp::new();
    let session = app.signup("alice").await;

    let bearer = app.request("GET", "/v1/users/me", None, Some(&session.access)).await;
    assert_eq!(bearer.status, StatusCode::OK);
    assert_eq!(bearer.body["data"]["id"], session.user_id);

    let cookie = app
        .request_with_cookie(
            "GET",
            "/v1/users/me",
            None,
            &format!("access_token={}", session.access),
        )
        .await;
    assert_eq!(cookie.status, StatusCode::OK);
}

#[tokio::test]
async fn test_missing_or_invalid_token_is_unauthorized() {
    let app = TestApp::new();
    let session = app.signup("alice").await;

    let missing = app.request("GET", "/v1/users/me", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);

    let garbage = app.request("GET", "/v1/users/me", None, Some("garbage")).await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);

    let refresh_as_access = app
        .request("GET", "/v1/users/me", None, Some(&session.refresh))
        .await;
    assert_eq!(refresh_as_access.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_rotates_and_is_single_use() {
    let app = TestApp::new();
    let session = app.signup("alice").await;
    let cookie = format!("refresh_token={}", session.refresh);

    let rotated = app
        .request_with_cookie("POST", "/v1/auth/token/refresh", None, &cookie)
        .await;
    assert_eq!(rotated.status, StatusCode::CREATED);
    let new_access = rotated.body["data"]["access_token"].as_str().unwrap().to_string();
    assert!(rotated.cookie("refresh_token").is_some());

    let me = app.request("GET", "/v1/users/me", None, Some(&new_access)).await;
    assert_eq!(me.status, StatusCode::OK);

    let replay = app
        .request_with_cookie("POST", "/v1/auth/token/refresh", None, &cookie)
        .await;
    assert_eq!(replay.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_accepts_body_token() {
    let app = TestApp::new();
    let session = app.signup("alice").await;

    let response = app
        .request(
            "POST",
            "/v1/auth/token/refresh",
            Some(json!({ "refresh_token": session.refresh })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let missing = app.request("POST", "/v1/auth/token/refresh", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_revokes_session() {
    let app = TestApp::new();
    let session = app.signup("alice").await;

    let response = app
        .request_with_cookie(
            "POST",
            "/v1/auth/logout",
            None,
            &format!(
                "access_token={}; refresh_token={}",
                session.access, session.refresh
            ),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.set_cookies().iter().all(|c| c.contains("Max-Age=-1")));

    let me = app.request("GET", "/v1/users/me", None, Some(&session.access)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);

    let refresh = app
        .request_with_cookie(
            "POST",
            "/v1/auth/token/refresh",
            None,
            &format!("refresh_token={}", session.refresh),
        )
        .await;
    assert_eq!(refresh.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_without_tokens_succeeds() {
    let app = TestApp::new();
    let response = app.request("POST", "/v1/auth/logout", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.request("GET", "/v1/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
}
