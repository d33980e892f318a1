//! Middleware components
//!
//! This module contains middleware for:
//! - Authentication (JWT)
//! - Admin authorization

pub mod auth;

pub use auth::{auth_middleware, require_admin, AuthUser, Claims};
