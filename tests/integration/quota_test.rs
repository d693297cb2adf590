//! Integration tests for quota admission control and replenishment.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use glimpze_core::config::QuotaGrant;
use glimpze_worker::ReplenishJob;

use crate::helpers::{PNG, TestApp, test_config};

fn app_with_initial(initial: QuotaGrant) -> TestApp {
    let mut config = test_config();
    config.quota.initial = initial;
    TestApp::with_config(config)
}

#[tokio::test]
async fn test_create_post_without_quota_is_forbidden() {
    let app = app_with_initial(QuotaGrant {
        create_post: 0,
        comment: 0,
        like: 0,
        follow: 0,
    });
    let alice = app.signup("alice").await;

    let response = app
        .multipart(
            "POST",
            "/v1/posts",
            &alice.access,
            &[("title", "Nope"), ("content", "x")],
            &[("photo.png", PNG)],
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["error"], "QUOTA_EXHAUSTED");
    assert!(app.blobs.is_empty());

    let posts = app
        .request(
            "GET",
            &format!("/v1/posts/users/{}", alice.user_id),
            None,
            Some(&alice.access),
        )
        .await;
    assert!(posts.body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_quota_is_spent_per_action() {
    let app = app_with_initial(QuotaGrant {
        create_post: 1,
        comment: 1,
        like: 0,
        follow: 0,
    });
    let alice = app.signup("alice").await;
    let post_id = app.create_post(&alice, "Only one").await;

    let second = app
        .multipart("POST", "/v1/posts", &alice.access, &[("title", "Two")], &[])
        .await;
    assert_eq!(second.status, StatusCode::FORBIDDEN);

    let comments = format!("/v1/posts/{post_id}/comments");
    let body = Some(serde_json::json!({ "content": "hi" }));
    let first = app.request("POST", &comments, body.clone(), Some(&alice.access)).await;
    assert_eq!(first.status, StatusCode::CREATED);
    let again = app.request("POST", &comments, body, Some(&alice.access)).await;
    assert_eq!(again.status, StatusCode::FORBIDDEN);

    let like = app
        .request("POST", &format!("/v1/posts/{post_id}/likes"), None, Some(&alice.access))
        .await;
    assert_eq!(like.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_concurrent_likes_never_exceed_quota() {
    let app = app_with_initial(QuotaGrant {
        create_post: 6,
        comment: 0,
        like: 3,
        follow: 0,
    });
    let alice = app.signup("alice").await;

    let mut post_ids = Vec::new();
    for i in 0..6 {
        post_ids.push(app.create_post(&alice, &format!("Post {i}")).await);
    }

    let handles: Vec<_> = post_ids
        .iter()
        .map(|id| {
            let router = app.router.clone();
            let req = Request::builder()
                .method("POST")
                .uri(format!("/v1/posts/{id}/likes"))
                .header("Authorization", format!("Bearer {}", alice.access))
                .body(Body::empty())
                .unwrap();
            tokio::spawn(async move { router.oneshot(req).await.unwrap().status() })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::CREATED => created += 1,
            StatusCode::FORBIDDEN => {}
            other => panic!("unexpected status {other}"),
        }
    }
    assert_eq!(created, 3);
}

#[tokio::test]
async fn test_replenishment_restores_allowance() {
    let config = {
        let mut config = test_config();
        config.quota.initial = QuotaGrant {
            create_post: 1,
            comment: 0,
            like: 0,
            follow: 0,
        };
        config
    };
    let quota = config.quota.clone();
    let app = TestApp::with_config(config);
    let alice = app.signup("alice").await;

    app.create_post(&alice, "Day one").await;
    let blocked = app
        .multipart("POST", "/v1/posts", &alice.access, &[("title", "Day one again")], &[])
        .await;
    assert_eq!(blocked.status, StatusCode::FORBIDDEN);

    let report = ReplenishJob::new(app.stores.quotas.clone(), &quota).run().await;
    assert_eq!(report.users_updated, 1);

    app.create_post(&alice, "Day two").await;
}
