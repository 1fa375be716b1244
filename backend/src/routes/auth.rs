//! Authentication routes
//!
//! Registration, login, token refresh and sign-out. Password hashing runs on
//! the blocking pool inside [`PasswordService`](crate::auth::PasswordService).

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use foodbuddy_shared::{AccountResponse, AuthResponse, LoginRequest, RefreshRequest, RegisterRequest};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh_token))
        .route("/logout", post(logout))
        .route("/me", get(me))
}

/// POST /api/v1/auth/register
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let response = UserService::register(state.db(), state.jwt(), state.locale(), &req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/auth/login
///
/// The response carries the account role so admins can be routed to the
/// console.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let response = UserService::login(state.db(), state.jwt(), state.locale(), &req).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/refresh
async fn refresh_token(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let response = UserService::refresh(state.db(), state.jwt(), &req.refresh_token).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/logout
///
/// Tokens are stateless; signing out drops the cached plan, favorites and
/// history so the next sign-in starts from the store.
async fn logout(State(state): State<AppState>, auth: AuthUser) -> StatusCode {
    state.sessions().remove(auth.user_id).await;
    StatusCode::NO_CONTENT
}

/// GET /api/v1/auth/me
async fn me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<AccountResponse>> {
    let account = UserService::me(state.db(), auth.user_id).await?;
    Ok(Json(account))
}
