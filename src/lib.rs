//! ScriptScan Library
//!
//! Handwriting transcription service: accounts with scan quotas, an image
//! scanner backed by a vision model, a per-user document store and admin
//! management of service credentials.

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, Router};

pub mod api;
pub mod config;
pub mod db;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

pub use config::AppConfig;
pub use db::DbPool;
pub use middleware::{auth_middleware, AuthUser, Claims};
use services::{SessionManager, TranscriptionProvider};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Database connection pool
    pub db: DbPool,
    /// Vision model used by the scanner
    pub transcriber: Arc<dyn TranscriptionProvider>,
    /// Session manager and event channel
    pub sessions: SessionManager,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        db: DbPool,
        transcriber: Arc<dyn TranscriptionProvider>,
    ) -> Self {
        let sessions = SessionManager::new(db.clone(), config.clone());
        Self {
            config,
            db,
            transcriber,
            sessions,
        }
    }
}

/// API router: public routes plus the authenticated routes under `/api/v1`
///
/// Authentication is applied only to the protected routes so login and
/// registration stay reachable.
pub fn api_router(state: AppState) -> Router {
    let upload_limit = state.config.server.max_upload_bytes;

    Router::new()
        .nest("/api/v1", api::public_routes())
        .nest(
            "/api/v1",
            api::protected_routes().layer(axum::middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
