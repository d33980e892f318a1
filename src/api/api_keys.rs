//! API key registry endpoints (admin only)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use uuid::Uuid;

use crate::{
    db::ApiKeyRepository,
    middleware::{require_admin, AuthUser},
    models::{ApiKeySummary, CreateApiKeyRequest, UpdateApiKeyRequest},
    utils::{
        validation::{validate_api_secret, validate_service_name},
        AppError, AppResult,
    },
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_api_keys).post(create_api_key))
        .route("/{id}", patch(update_api_key).delete(delete_api_key))
}

/// GET /api/v1/api-keys
async fn list_api_keys(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<Vec<ApiKeySummary>>> {
    require_admin(&state.db, &auth_user).await?;

    let keys = ApiKeyRepository::new(&state.db).list().await?;
    Ok(Json(keys.iter().map(ApiKeySummary::from).collect()))
}

/// POST /api/v1/api-keys
async fn create_api_key(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<CreateApiKeyRequest>,
) -> AppResult<(StatusCode, Json<ApiKeySummary>)> {
    require_admin(&state.db, &auth_user).await?;

    let service_name = payload.service_name.trim().to_lowercase();
    if !validate_service_name(&service_name) {
        return Err(AppError::ValidationError(format!(
            "Invalid service name: {}",
            payload.service_name
        )));
    }
    let secret = payload.api_key.trim();
    if !validate_api_secret(secret) {
        return Err(AppError::ValidationError("Invalid API key value".to_string()));
    }

    let key = ApiKeyRepository::new(&state.db)
        .create(
            &service_name,
            secret,
            payload.is_active.unwrap_or(true),
            Some(auth_user.id),
        )
        .await?;

    tracing::info!(
        key_id = %key.id,
        service = %key.service_name,
        created_by = %auth_user.id,
        "API key created"
    );

    Ok((StatusCode::CREATED, Json(ApiKeySummary::from(&key))))
}

/// PATCH /api/v1/api-keys/{id}
async fn update_api_key(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateApiKeyRequest>,
) -> AppResult<Json<ApiKeySummary>> {
    require_admin(&state.db, &auth_user).await?;

    let key = ApiKeyRepository::new(&state.db)
        .set_active(id, payload.is_active)
        .await?
        .ok_or_else(|| AppError::not_found("API key not found"))?;

    tracing::info!(key_id = %id, is_active = key.is_active, "API key updated");
    Ok(Json(ApiKeySummary::from(&key)))
}

/// DELETE /api/v1/api-keys/{id}
async fn delete_api_key(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_admin(&state.db, &auth_user).await?;

    if !ApiKeyRepository::new(&state.db).delete(id).await? {
        return Err(AppError::not_found("API key not found"));
    }

    tracing::info!(key_id = %id, "API key deleted");
    Ok(StatusCode::NO_CONTENT)
}
