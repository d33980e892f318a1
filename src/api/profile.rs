//! Self-service profile endpoints

use axum::{extract::State, routing::get, Json, Router};

use crate::{
    db::ProfileRepository,
    middleware::AuthUser,
    models::{Profile, ProfileChanges, UpdateProfileRequest},
    utils::{AppError, AppResult},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(get_profile).patch(update_profile))
}

/// GET /api/v1/profile
async fn get_profile(State(state): State<AppState>, auth_user: AuthUser) -> Json<Profile> {
    Json(state.sessions.current_profile(&auth_user).await)
}

/// PATCH /api/v1/profile
async fn update_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<Json<Profile>> {
    let repo = ProfileRepository::new(&state.db);
    let profile = repo
        .get(auth_user.id)
        .await?
        .ok_or_else(|| AppError::not_found("Profile not found"))?;

    let full_name = payload
        .full_name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());
    if full_name.as_ref().is_some_and(|n| n.chars().count() > 120) {
        return Err(AppError::ValidationError(
            "Full name must be 1-120 characters".to_string(),
        ));
    }

    let mut changes = ProfileChanges::from(&profile);
    changes.full_name = full_name;

    let updated = repo
        .update(auth_user.id, &changes)
        .await?
        .ok_or_else(|| AppError::not_found("Profile not found"))?;

    Ok(Json(updated))
}
