//! Route definitions for the Glimpze HTTP API.
//!
//! All routes are organized by resource and mounted under `/v1`. Gates
//! are expressed per handler through the `AuthUser` and
//! `OptionalAuthUser` extractors; role and ownership checks run in the
//! services.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
};

use crate::handlers;
use crate::state::AppState;

/// Build the `/v1` router with every route and the request body limit.
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.server.max_body_bytes;

    let api_routes = Router::new()
        .merge(health_routes())
        .merge(auth_routes())
        .merge(post_routes())
        .merge(tag_routes())
        .merge(user_routes());

    Router::new()
        .nest("/v1", api_routes)
        .layer(DefaultBodyLimit::max(max_body))
        .with_state(state)
}

/// Health and feed
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/feed", get(handlers::feed::feed))
}

/// Registration, activation, and the session lifecycle
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/activate", patch(handlers::auth::activate))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/token/refresh", post(handlers::auth::refresh))
        .route("/auth/logout", post(handlers::auth::logout))
}

/// Posts and everything nested under a post
fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", post(handlers::post::create_post))
        .route(
            "/posts/users/{user_id}",
            get(handlers::post::list_user_posts),
        )
        .route(
            "/posts/{id}",
            get(handlers::post::get_post)
                .patch(handlers::post::update_post)
                .delete(handlers::post::delete_post),
        )
        .route(
            "/posts/{id}/likes",
            post(handlers::social::like_post).delete(handlers::social::unlike_post),
        )
        .route(
            "/posts/{id}/comments",
            get(handlers::comment::list_comments).post(handlers::comment::create_comment),
        )
        .route(
            "/posts/{id}/comments/{comment_id}",
            get(handlers::comment::get_comment)
                .patch(handlers::comment::update_comment)
                .delete(handlers::comment::delete_comment),
        )
        .route(
            "/posts/{id}/tags",
            get(handlers::tag::list_post_tags).post(handlers::tag::attach_tag),
        )
        .route(
            "/posts/{id}/tags/{tag_id}",
            axum::routing::delete(handlers::tag::detach_tag),
        )
}

/// Tag vocabulary. `{tag}` is a name on the posts listing, an id elsewhere.
fn tag_routes() -> Router<AppState> {
    Router::new()
        .route("/tags", post(handlers::tag::create_tag))
        .route(
            "/tags/{tag}",
            get(handlers::tag::get_tag).delete(handlers::tag::delete_tag),
        )
        .route("/tags/{tag}/posts", get(handlers::tag::list_tagged_posts))
}

/// Profiles, roles, and follows. `{user}` is a name on the role route, an
/// id elsewhere.
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(handlers::user::me))
        .route("/users/me/profile", patch(handlers::user::update_profile))
        .route("/users/{user}", get(handlers::user::get_user))
        .route("/users/{user}/role", patch(handlers::user::update_role))
        .route(
            "/users/{user}/follow",
            post(handlers::social::follow_user).delete(handlers::social::unfollow_user),
        )
}
