//! Auth handlers: register, activate, login, refresh, logout.

use axum::Json;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{AppendHeaders, IntoResponse};
use bytes::Bytes;

use glimpze_auth::{TokenClass, TokenPair};
use glimpze_core::error::AppError;
use glimpze_entity::user::User;
use glimpze_service::Registration;

use crate::dto::request::{ActivateRequest, LoginRequest, RefreshRequest, RegisterRequest};
use crate::dto::response::{ApiResponse, LoginResponse, MessageResponse, TokenResponse};
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::extractors::auth::{access_token, cookie_token};
use crate::state::AppState;

/// POST /v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), ApiError> {
    let user = state
        .accounts
        .register(Registration {
            name: req.name,
            display_name: req.display_name,
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user))))
}

/// PATCH /v1/auth/activate
pub async fn activate(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ActivateRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.accounts.activate(&req.token).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Account activated",
    ))))
}

/// POST /v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state.sessions.login(&req.email, &req.password).await?;

    let body = LoginResponse {
        tokens: TokenResponse::from(&result.tokens),
        user: result.user,
    };

    Ok((
        session_cookies(&state, &result.tokens),
        Json(ApiResponse::ok(body)),
    ))
}

/// POST /v1/auth/token/refresh
///
/// Reads the refresh cookie; a JSON `refresh_token` field is accepted
/// when no cookie is present.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let token = cookie_token(&headers, TokenClass::Refresh)
        .or_else(|| {
            serde_json::from_slice::<RefreshRequest>(&body)
                .ok()
                .and_then(|req| req.refresh_token)
                .filter(|t| !t.is_empty())
        })
        .ok_or_else(|| AppError::unauthenticated("Missing refresh token"))?;

    let tokens = state.sessions.refresh(&token).await?;

    Ok((
        StatusCode::CREATED,
        session_cookies(&state, &tokens),
        Json(ApiResponse::ok(TokenResponse::from(&tokens))),
    ))
}

/// POST /v1/auth/logout
///
/// Always succeeds; whatever presented tokens verify are revoked.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let access = access_token(&headers);
    let refresh = cookie_token(&headers, TokenClass::Refresh);

    state
        .sessions
        .logout(access.as_deref(), refresh.as_deref())
        .await;

    let cookies = state.cookies;
    (
        AppendHeaders([
            (SET_COOKIE, cookies.clear(TokenClass::Access)),
            (SET_COOKIE, cookies.clear(TokenClass::Refresh)),
        ]),
        Json(ApiResponse::ok(MessageResponse::new("Logged out"))),
    )
}

fn session_cookies(
    state: &AppState,
    tokens: &TokenPair,
) -> AppendHeaders<[(axum::http::HeaderName, String); 2]> {
    let cookies = state.cookies;
    AppendHeaders([
        (
            SET_COOKIE,
            cookies.set(
                TokenClass::Access,
                &tokens.access.token,
                tokens.access.expires_at,
            ),
        ),
        (
            SET_COOKIE,
            cookies.set(
                TokenClass::Refresh,
                &tokens.refresh.token,
                tokens.refresh.expires_at,
            ),
        ),
    ])
}
