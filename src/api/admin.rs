//! Admin tools: usage statistics and profile management

use axum::{
    extract::{Path, State},
    routing::{get, patch},
    Json, Router,
};
use uuid::Uuid;

use crate::{
    db::ProfileRepository,
    middleware::{require_admin, AuthUser},
    models::{AdminUpdateProfileRequest, Profile, ProfileChanges, SubscriptionType, UsageStats},
    services::stats::usage_stats,
    utils::{AppError, AppResult},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(get_stats))
        .route("/profiles", get(list_profiles))
        .route("/profiles/{id}", patch(update_profile))
}

/// GET /api/v1/admin/stats
async fn get_stats(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<UsageStats>> {
    require_admin(&state.db, &auth_user).await?;
    Ok(Json(usage_stats(&state.db).await?))
}

/// GET /api/v1/admin/profiles
async fn list_profiles(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<Vec<Profile>>> {
    require_admin(&state.db, &auth_user).await?;
    Ok(Json(ProfileRepository::new(&state.db).list().await?))
}

/// Apply an admin update. A tier change without an explicit limit takes
/// the tier's default limit.
pub(crate) fn apply_admin_update(
    profile: &Profile,
    req: &AdminUpdateProfileRequest,
    free_max_scans: i64,
    premium_max_scans: i64,
) -> Result<ProfileChanges, AppError> {
    let mut changes = ProfileChanges::from(profile);

    if let Some(tier) = req.subscription_type {
        changes.subscription_type = tier;
        if req.max_scans.is_none() && tier != profile.subscription_type {
            changes.max_scans = match tier {
                SubscriptionType::Free => free_max_scans,
                SubscriptionType::Premium => premium_max_scans,
            };
        }
    }
    if let Some(max_scans) = req.max_scans {
        if max_scans < 0 {
            return Err(AppError::ValidationError(
                "max_scans cannot be negative".to_string(),
            ));
        }
        changes.max_scans = max_scans;
    }
    if let Some(is_admin) = req.is_admin {
        changes.is_admin = is_admin;
    }
    if req.reset_scans {
        changes.scans_used = 0;
    }

    Ok(changes)
}

/// PATCH /api/v1/admin/profiles/{id}
async fn update_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdminUpdateProfileRequest>,
) -> AppResult<Json<Profile>> {
    require_admin(&state.db, &auth_user).await?;

    let repo = ProfileRepository::new(&state.db);
    let profile = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found("Profile not found"))?;

    let quota = &state.config.quota;
    let changes = apply_admin_update(
        &profile,
        &payload,
        quota.free_max_scans,
        quota.premium_max_scans,
    )?;

    let updated = repo
        .update(id, &changes)
        .await?
        .ok_or_else(|| AppError::not_found("Profile not found"))?;

    tracing::info!(
        admin_id = %auth_user.id,
        profile_id = %id,
        tier = %updated.subscription_type,
        max_scans = updated.max_scans,
        is_admin = updated.is_admin,
        "Profile updated by admin"
    );

    Ok(Json(updated))
}
