//! Authentication API endpoints
//!
//! Provides login, logout, token refresh, and registration endpoints.

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::{
    middleware::auth::{extract_bearer_token, validate_token, AuthUser},
    models::{AuthResponse, LoginRequest, Profile, RefreshTokenRequest, RegisterRequest, TokenResponse},
    utils::AppResult,
    AppState,
};

/// Create public routes for authentication endpoints (no auth required)
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/refresh", post(refresh_token))
        .route("/logout", post(logout))
}

/// Create protected routes for authentication endpoints (auth required)
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_current_user))
}

#[derive(Serialize)]
pub struct LogoutResponse {
    pub message: String,
}

/// POST /api/v1/auth/login
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    Ok(Json(state.sessions.sign_in(payload).await?))
}

/// POST /api/v1/auth/register
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let response = state.sessions.sign_up(payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/auth/refresh
async fn refresh_token(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    Ok(Json(state.sessions.refresh(&payload.refresh_token).await?))
}

/// POST /api/v1/auth/logout
///
/// Tokens are stateless; a valid bearer token only adds the sign-out event.
async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Json<LogoutResponse> {
    let user = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(extract_bearer_token)
        .and_then(|t| validate_token(t, &state.config.auth.jwt_secret).ok())
        .and_then(|data| AuthUser::try_from(data.claims).ok());

    if let Some(user) = user {
        state.sessions.sign_out(&user);
    }

    Json(LogoutResponse {
        message: "Logged out successfully".to_string(),
    })
}

/// GET /api/v1/auth/me
async fn get_current_user(State(state): State<AppState>, auth_user: AuthUser) -> Json<Profile> {
    Json(state.sessions.current_profile(&auth_user).await)
}
