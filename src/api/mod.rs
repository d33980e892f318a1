//! API routes and handlers
//!
//! This module defines all API endpoints and their routing.

use axum::{routing::get, Router};

use crate::AppState;

mod admin;
mod api_keys;
mod auth;
mod documents;
mod health;
mod navigation;
mod plans;
mod profile;
mod scans;

pub use health::*;

/// Public API routes (no authentication required)
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness))
        .nest("/auth", auth::public_routes())
        .route("/plans", get(plans::list_plans))
}

/// Protected API routes (authentication required)
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::protected_routes())
        .nest("/profile", profile::routes())
        .route("/navigation", get(navigation::get_navigation))
        .nest("/scans", scans::routes())
        .nest("/documents", documents::routes())
        .nest("/api-keys", api_keys::routes())
        .nest("/admin", admin::routes())
}
