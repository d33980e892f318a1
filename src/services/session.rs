//! Session manager
//!
//! Issues and refreshes tokens, keeps profiles in sync with identities and
//! publishes session changes to subscribers.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::config::AppConfig;
use crate::db::{DbPool, ProfileRepository};
use crate::middleware::auth::{
    create_access_token, create_refresh_token, validate_token, TokenType,
};
use crate::middleware::AuthUser;
use crate::models::{
    AuthResponse, LoginRequest, Profile, RegisterRequest, TokenResponse, User,
};
use crate::services::AuthService;
use crate::utils::validation::{normalize_email, validate_password};
use crate::utils::{AppError, AppResult};

/// Session state change
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    SignedIn { user_id: Uuid, email: String },
    SignedOut { user_id: Uuid },
    /// `fallback` is set when the stored profile could not be read
    ProfileRefreshed { user_id: Uuid, fallback: bool },
}

#[derive(Clone)]
pub struct SessionManager {
    db: DbPool,
    config: Arc<AppConfig>,
    events: Arc<broadcast::Sender<SessionEvent>>,
}

impl SessionManager {
    pub fn new(db: DbPool, config: AppConfig) -> Self {
        let (tx, _) = broadcast::channel(256);
        Self {
            db,
            config: Arc::new(config),
            events: Arc::new(tx),
        }
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: SessionEvent) {
        // No receivers is fine
        let _ = self.events.send(event);
    }

    /// Register a new identity and its free-tier profile, then sign it in
    pub async fn sign_up(&self, req: RegisterRequest) -> AppResult<AuthResponse> {
        req.validate()?;
        validate_password(&req.password, self.config.auth.password_min_length)
            .map_err(AppError::ValidationError)?;

        let email = normalize_email(&req.email);
        let auth = AuthService::new(&self.db);
        if auth.get_user_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict(
                "An account with this email already exists".to_string(),
            ));
        }

        let user = auth.create_user(&email, &req.password).await?;

        let mut profile = Profile::new(
            user.id,
            email.clone(),
            Some(req.full_name.trim().to_string()),
            self.config.quota.free_max_scans,
        );
        profile.is_admin = self.config.auth.is_admin_email(&email);
        let profile = ProfileRepository::new(&self.db).create(&profile).await?;

        info!(user_id = %user.id, is_admin = profile.is_admin, "Account registered");
        self.issue_session(&user, profile)
    }

    /// Verify credentials and start a session
    pub async fn sign_in(&self, req: LoginRequest) -> AppResult<AuthResponse> {
        let email = normalize_email(&req.email);
        let user = AuthService::new(&self.db)
            .authenticate(&email, &req.password)
            .await?
            .ok_or_else(|| {
                warn!(email = %email, "Failed login attempt");
                AppError::unauthorized("Invalid email or password")
            })?;

        let profile = self.load_profile(user.id, &user.email).await;
        self.issue_session(&user, profile)
    }

    /// Tokens are stateless; the client discards them
    pub fn sign_out(&self, user: &AuthUser) {
        info!(user_id = %user.id, "Signed out");
        self.publish(SessionEvent::SignedOut { user_id: user.id });
    }

    /// Exchange a refresh token for a new access token
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<TokenResponse> {
        let auth = &self.config.auth;
        let token_data = validate_token(refresh_token, &auth.jwt_secret)
            .map_err(|_| AppError::unauthorized("Invalid refresh token"))?;

        if token_data.claims.token_type != TokenType::Refresh {
            return Err(AppError::unauthorized("Invalid token type"));
        }

        let user_id = Uuid::parse_str(&token_data.claims.sub)
            .map_err(|_| AppError::unauthorized("Invalid user ID in token"))?;

        let user = AuthService::new(&self.db)
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("User not found"))?;

        let access_token =
            create_access_token(&user.id, &user.email, &auth.jwt_secret, auth.token_expiry_hours)
                .map_err(|e| AppError::internal(format!("Failed to create token: {}", e)))?;

        Ok(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: auth.token_expiry_hours * 3600,
        })
    }

    /// Re-fetch the caller's profile, never failing
    pub async fn current_profile(&self, user: &AuthUser) -> Profile {
        self.load_profile(user.id, &user.email).await
    }

    async fn load_profile(&self, user_id: Uuid, email: &str) -> Profile {
        let (profile, fallback) = match ProfileRepository::new(&self.db).get(user_id).await {
            Ok(Some(profile)) => (profile, false),
            Ok(None) => {
                warn!(user_id = %user_id, "Profile missing, using default free profile");
                (self.fallback_profile(user_id, email), true)
            }
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Profile fetch failed, using default free profile");
                (self.fallback_profile(user_id, email), true)
            }
        };

        self.publish(SessionEvent::ProfileRefreshed { user_id, fallback });
        profile
    }

    fn fallback_profile(&self, user_id: Uuid, email: &str) -> Profile {
        Profile::fallback(user_id, email, self.config.quota.free_max_scans)
    }

    fn issue_session(&self, user: &User, profile: Profile) -> AppResult<AuthResponse> {
        let auth = &self.config.auth;
        let access_token =
            create_access_token(&user.id, &user.email, &auth.jwt_secret, auth.token_expiry_hours)
                .map_err(|e| AppError::internal(format!("Failed to create token: {}", e)))?;
        let refresh_token = create_refresh_token(
            &user.id,
            &user.email,
            &auth.jwt_secret,
            auth.refresh_token_expiry_days,
        )
        .map_err(|e| AppError::internal(format!("Failed to create refresh token: {}", e)))?;

        info!(user_id = %user.id, "Signed in");
        self.publish(SessionEvent::SignedIn {
            user_id: user.id,
            email: user.email.clone(),
        });

        Ok(AuthResponse {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: auth.token_expiry_hours * 3600,
            profile,
        })
    }
}
