//! Integration tests for the personalised and public feeds.

use axum::http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_public_feed_orders_by_likes() {
    let app = TestApp::new();
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;
    let carol = app.signup("carol").await;

    let _quiet = app.create_post(&alice, "Quiet").await;
    let popular = app.create_post(&bob, "Popular").await;
    let liked = app
        .request("POST", &format!("/v1/posts/{popular}/likes"), None, Some(&carol.access))
        .await;
    assert_eq!(liked.status, StatusCode::CREATED);

    let feed = app.request("GET", "/v1/feed", None, None).await;
    assert_eq!(feed.status, StatusCode::OK);

    let items = feed.body["data"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["post"]["id"], popular);
    let link = items[0]["image_links"][0].as_str().unwrap();
    assert!(link.starts_with("memory://"));
}

#[tokio::test]
async fn test_invalid_token_falls_back_to_public_feed() {
    let app = TestApp::new();
    let alice = app.signup("alice").await;
    app.create_post(&alice, "Hello").await;

    let feed = app.request("GET", "/v1/feed", None, Some("garbage")).await;
    assert_eq!(feed.status, StatusCode::OK);
    assert_eq!(feed.body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_user_feed_includes_followed_authors() {
    let app = TestApp::new();
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;
    let carol = app.signup("carol").await;

    let own = app.create_post(&alice, "Mine").await;
    let followed = app.create_post(&bob, "Bob's").await;
    app.create_post(&carol, "Carol's").await;

    let before = app.request("GET", "/v1/feed", None, Some(&alice.access)).await;
    let items = before.body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["post"]["id"], own);

    app.request(
        "POST",
        &format!("/v1/users/{}/follow", bob.user_id),
        None,
        Some(&alice.access),
    )
    .await;

    let after = app.request("GET", "/v1/feed", None, Some(&alice.access)).await;
    let ids: Vec<i64> = after.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["post"]["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![followed, own]);
}

#[tokio::test]
async fn test_out_of_range_page_is_empty() {
    let app = TestApp::new();
    let alice = app.signup("alice").await;
    app.create_post(&alice, "Hello").await;

    let feed = app
        .request("GET", "/v1/feed?page=18446744073709551615&per_page=100", None, None)
        .await;
    assert_eq!(feed.status, StatusCode::OK);
    assert!(feed.body["data"].as_array().unwrap().is_empty());

    let posts = app
        .request(
            "GET",
            &format!("/v1/posts/users/{}?page=18446744073709551615", alice.user_id),
            None,
            Some(&alice.access),
        )
        .await;
    assert_eq!(posts.status, StatusCode::OK);
    assert!(posts.body["data"].as_array().unwrap().is_empty());
}
