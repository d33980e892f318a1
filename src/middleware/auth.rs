//! JWT Authentication Middleware
//!
//! This module provides JWT-based authentication for the API.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::ProfileRepository,
    models::Profile,
    utils::error::{AppError, AppResult, ErrorResponse},
    AppState, DbPool,
};

/// JWT Claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// User email
    pub email: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
    /// Not before timestamp
    pub nbf: i64,
    /// JWT ID (unique identifier for this token)
    pub jti: String,
    /// Token type (access or refresh)
    #[serde(default = "default_token_type")]
    pub token_type: TokenType,
}

fn default_token_type() -> TokenType {
    TokenType::Access
}

/// Token type enumeration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    #[default]
    Access,
    Refresh,
}

/// Authenticated identity extracted from JWT.
///
/// Carries no role: the admin flag lives on the profile and is re-read
/// on every admin request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

impl TryFrom<Claims> for AuthUser {
    type Error = &'static str;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&claims.sub).map_err(|_| "Invalid user ID in token")?;
        Ok(Self {
            id,
            email: claims.email,
        })
    }
}

/// Extractor for AuthUser from request extensions
///
/// This allows using AuthUser as a handler parameter after auth middleware has run.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<AuthUser>().cloned().ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new("unauthorized", "Authentication required")),
            )
        })
    }
}

fn create_token(
    user_id: &Uuid,
    email: &str,
    token_type: TokenType,
    lifetime: Duration,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        iat: now.timestamp(),
        exp: (now + lifetime).timestamp(),
        nbf: now.timestamp(),
        jti: Uuid::new_v4().to_string(),
        token_type,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Create a new JWT access token
pub fn create_access_token(
    user_id: &Uuid,
    email: &str,
    secret: &str,
    expiry_hours: u64,
) -> Result<String, jsonwebtoken::errors::Error> {
    create_token(
        user_id,
        email,
        TokenType::Access,
        Duration::hours(expiry_hours as i64),
        secret,
    )
}

/// Create a new JWT refresh token
pub fn create_refresh_token(
    user_id: &Uuid,
    email: &str,
    secret: &str,
    expiry_days: u64,
) -> Result<String, jsonwebtoken::errors::Error> {
    create_token(
        user_id,
        email,
        TokenType::Refresh,
        Duration::days(expiry_days as i64),
        secret,
    )
}

/// Validate and decode a JWT token
pub fn validate_token(token: &str, secret: &str) -> Result<TokenData<Claims>, AuthError> {
    let mut validation = Validation::default();
    validation.validate_exp = true;
    validation.validate_nbf = true;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })
}

/// Authentication error types
#[derive(Debug, PartialEq)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    TokenExpired,
    InvalidTokenType,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingToken => "Missing authentication token",
            AuthError::InvalidToken => "Invalid authentication token",
            AuthError::TokenExpired => "Authentication token has expired",
            AuthError::InvalidTokenType => "Invalid token type",
        };

        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("unauthorized", message)),
        )
            .into_response()
    }
}

/// Extract bearer token from Authorization header
pub(crate) fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .or_else(|| auth_header.strip_prefix("bearer "))
}

/// Authentication middleware
///
/// Validates the bearer access token and injects the AuthUser into request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(extract_bearer_token)
        .ok_or(AuthError::MissingToken)?;

    let token_data = validate_token(token, &state.config.auth.jwt_secret)?;
    if token_data.claims.token_type != TokenType::Access {
        return Err(AuthError::InvalidTokenType);
    }

    let auth_user: AuthUser = token_data
        .claims
        .try_into()
        .map_err(|_| AuthError::InvalidToken)?;

    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Load the caller's stored profile and require the admin flag
pub async fn require_admin(db: &DbPool, user: &AuthUser) -> AppResult<Profile> {
    let profile = ProfileRepository::new(db).get(user.id).await?;
    match profile {
        Some(profile) if profile.is_admin => Ok(profile),
        _ => {
            tracing::warn!(user_id = %user.id, "Admin access denied");
            Err(AppError::forbidden("Admin access required"))
        }
    }
}
