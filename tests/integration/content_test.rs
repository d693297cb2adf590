//! Integration tests for posts, comments, likes, tags, follows, and roles.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{PNG, TestApp};

#[tokio::test]
async fn test_create_and_get_post() {
    let app = TestApp::new();
    let alice = app.signup("alice").await;

    let id = app.create_post(&alice, "First").await;
    assert_eq!(app.blobs.len(), 1);

    let response = app.request("GET", &format!("/v1/posts/{id}"), None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["title"], "First");
    assert_eq!(response.body["data"]["user_id"], alice.user_id);
    assert_eq!(response.body["data"]["files"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_post_rejects_non_image() {
    let app = TestApp::new();
    let alice = app.signup("alice").await;

    let response = app
        .multipart(
            "POST",
            "/v1/posts",
            &alice.access,
            &[("title", "Bad"), ("content", "x")],
            &[("notes.png", b"plain text, not an image")],
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(app.blobs.is_empty());
}

#[tokio::test]
async fn test_create_post_rejects_mislabelled_image() {
    let app = TestApp::new();
    let alice = app.signup("alice").await;

    let response = app
        .multipart(
            "POST",
            "/v1/posts",
            &alice.access,
            &[("title", "Renamed"), ("content", "x")],
            &[("photo.jpg", PNG)],
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
    assert!(app.blobs.is_empty());
}

#[tokio::test]
async fn test_create_post_requires_auth() {
    let app = TestApp::new();
    let response = app
        .multipart("POST", "/v1/posts", "garbage", &[("title", "x")], &[])
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_only_owner_or_moderator_edits() {
    let app = TestApp::new();
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;
    let moderator = app.signup_with_role("mod", "moderator").await;
    let id = app.create_post(&alice, "Original").await;
    let path = format!("/v1/posts/{id}");

    let by_bob = app
        .multipart("PATCH", &path, &bob.access, &[("title", "Hijacked")], &[])
        .await;
    assert_eq!(by_bob.status, StatusCode::FORBIDDEN);

    let by_mod = app
        .multipart("PATCH", &path, &moderator.access, &[("title", "Moderated")], &[])
        .await;
    assert_eq!(by_mod.status, StatusCode::OK);
    assert_eq!(by_mod.body["data"]["title"], "Moderated");
    assert_eq!(by_mod.body["data"]["files"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_edit_replaces_attachments() {
    let app = TestApp::new();
    let alice = app.signup("alice").await;
    let id = app.create_post(&alice, "Photos").await;

    let response = app
        .multipart(
            "PATCH",
            &format!("/v1/posts/{id}"),
            &alice.access,
            &[],
            &[("a.png", PNG), ("b.png", PNG)],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["files"].as_array().unwrap().len(), 2);
    assert_eq!(app.blobs.len(), 2);
}

#[tokio::test]
async fn test_moderator_cannot_delete_but_admin_can() {
    let app = TestApp::new();
    let alice = app.signup("alice").await;
    let moderator = app.signup_with_role("mod", "moderator").await;
    let admin = app.signup_with_role("root", "admin").await;
    let id = app.create_post(&alice, "Doomed").await;
    let path = format!("/v1/posts/{id}");

    let by_mod = app.request("DELETE", &path, None, Some(&moderator.access)).await;
    assert_eq!(by_mod.status, StatusCode::FORBIDDEN);

    let by_admin = app.request("DELETE", &path, None, Some(&admin.access)).await;
    assert_eq!(by_admin.status, StatusCode::NO_CONTENT);
    assert!(app.blobs.is_empty());

    let gone = app.request("GET", &path, None, None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_comment_lifecycle() {
    let app = TestApp::new();
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;
    let post_id = app.create_post(&alice, "Discuss").await;
    let base = format!("/v1/posts/{post_id}/comments");

    let created = app
        .request("POST", &base, Some(json!({ "content": "Nice" })), Some(&bob.access))
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let comment_id = created.body["data"]["id"].as_i64().unwrap();
    let path = format!("{base}/{comment_id}");

    let listed = app.request("GET", &base, None, None).await;
    assert_eq!(listed.body["data"].as_array().unwrap().len(), 1);

    let by_alice = app
        .request("PATCH", &path, Some(json!({ "content": "Edited" })), Some(&alice.access))
        .await;
    assert_eq!(by_alice.status, StatusCode::FORBIDDEN);

    let by_bob = app
        .request("PATCH", &path, Some(json!({ "content": "Edited" })), Some(&bob.access))
        .await;
    assert_eq!(by_bob.status, StatusCode::OK);
    assert_eq!(by_bob.body["data"]["content"], "Edited");

    let deleted = app.request("DELETE", &path, None, Some(&bob.access)).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let fetched = app.request("GET", &path, None, None).await;
    assert_eq!(fetched.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_like_twice_conflicts() {
    let app = TestApp::new();
    let alice = app.signup("alice").await;
    let post_id = app.create_post(&alice, "Like me").await;
    let path = format!("/v1/posts/{post_id}/likes");

    let first = app.request("POST", &path, None, Some(&alice.access)).await;
    assert_eq!(first.status, StatusCode::CREATED);

    let second = app.request("POST", &path, None, Some(&alice.access)).await;
    assert_eq!(second.status, StatusCode::CONFLICT);

    let post = app.request("GET", &format!("/v1/posts/{post_id}"), None, None).await;
    assert_eq!(post.body["data"]["likes"], 1);

    let removed = app.request("DELETE", &path, None, Some(&alice.access)).await;
    assert_eq!(removed.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_tag_vocabulary_and_attachment() {
    let app = TestApp::new();
    let alice = app.signup("alice").await;
    let moderator = app.signup_with_role("mod", "moderator").await;
    let post_id = app.create_post(&alice, "Tagged").await;

    let by_user = app
        .request("POST", "/v1/tags", Some(json!({ "name": "rust" })), Some(&alice.access))
        .await;
    assert_eq!(by_user.status, StatusCode::FORBIDDEN);

    let created = app
        .request("POST", "/v1/tags", Some(json!({ "name": "Rust" })), Some(&moderator.access))
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let tag_id = created.body["data"]["id"].as_i64().unwrap();

    let fetched = app
        .request("GET", &format!("/v1/tags/{tag_id}"), None, Some(&alice.access))
        .await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["data"]["name"], "rust");

    let attached = app
        .request(
            "POST",
            &format!("/v1/posts/{post_id}/tags"),
            Some(json!({ "name": "rust" })),
            Some(&alice.access),
        )
        .await;
    assert_eq!(attached.status, StatusCode::CREATED);

    let unknown = app
        .request(
            "POST",
            &format!("/v1/posts/{post_id}/tags"),
            Some(json!({ "name": "golang" })),
            Some(&alice.access),
        )
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);

    let tagged = app.request("GET", "/v1/tags/rust/posts", None, None).await;
    assert_eq!(tagged.status, StatusCode::OK);
    assert_eq!(tagged.body["data"][0]["id"], post_id);

    let detached = app
        .request(
            "DELETE",
            &format!("/v1/posts/{post_id}/tags/{tag_id}"),
            None,
            Some(&alice.access),
        )
        .await;
    assert_eq!(detached.status, StatusCode::NO_CONTENT);

    let tags = app
        .request("GET", &format!("/v1/posts/{post_id}/tags"), None, None)
        .await;
    assert!(tags.body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_follow_rules() {
    let app = TestApp::new();
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;

    let path = format!("/v1/users/{}/follow", bob.user_id);
    let follow = app.request("POST", &path, None, Some(&alice.access)).await;
    assert_eq!(follow.status, StatusCode::CREATED);

    let again = app.request("POST", &path, None, Some(&alice.access)).await;
    assert_eq!(again.status, StatusCode::CONFLICT);

    let own = app
        .request(
            "POST",
            &format!("/v1/users/{}/follow", alice.user_id),
            None,
            Some(&alice.access),
        )
        .await;
    assert_eq!(own.status, StatusCode::BAD_REQUEST);

    let unfollow = app.request("DELETE", &path, None, Some(&alice.access)).await;
    assert_eq!(unfollow.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_profile_and_role_administration() {
    let app = TestApp::new();
    let alice = app.signup("alice").await;
    let admin = app.signup_with_role("root", "admin").await;

    let profile = app
        .request(
            "PATCH",
            "/v1/users/me/profile",
            Some(json!({ "biodata": "Rustacean" })),
            Some(&alice.access),
        )
        .await;
    assert_eq!(profile.status, StatusCode::OK);

    let fetched = app
        .request("GET", &format!("/v1/users/{}", alice.user_id), None, Some(&admin.access))
        .await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["data"]["profile"]["biodata"], "Rustacean");

    let by_alice = app
        .request(
            "PATCH",
            "/v1/users/root/role",
            Some(json!({ "role": "user" })),
            Some(&alice.access),
        )
        .await;
    assert_eq!(by_alice.status, StatusCode::FORBIDDEN);

    let by_admin = app
        .request(
            "PATCH",
            "/v1/users/alice/role",
            Some(json!({ "role": "moderator" })),
            Some(&admin.access),
        )
        .await;
    assert_eq!(by_admin.status, StatusCode::OK);
    assert_eq!(by_admin.body["data"]["role"]["name"], "moderator");
}
