//! Scan upload endpoint

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};

use crate::{
    middleware::AuthUser,
    models::ScanResponse,
    services::{ImageUpload, ScanError, ScanOrchestrator},
    utils::{AppError, AppResult},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/", post(create_scan))
}

/// Read the `file` field; other fields are ignored
async fn read_upload(multipart: &mut Multipart) -> AppResult<Option<ImageUpload>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(format!("Failed to parse multipart data: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request(format!("Failed to read upload: {}", e)))?;

        return Ok(Some(ImageUpload {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        }));
    }
    Ok(None)
}

/// POST /api/v1/scans
///
/// Multipart upload with a single `file` field holding the image.
async fn create_scan(
    State(state): State<AppState>,
    auth_user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<ScanResponse>)> {
    let upload = read_upload(&mut multipart)
        .await?
        .ok_or(ScanError::InvalidImage)?;

    tracing::debug!(
        user_id = %auth_user.id,
        file_name = ?upload.file_name,
        content_type = ?upload.content_type,
        size = upload.bytes.len(),
        "Scan upload received"
    );

    let outcome = ScanOrchestrator::new(
        &state.db,
        state.transcriber.as_ref(),
        &state.config.ocr.service_name,
    )
    .scan(auth_user.id, upload)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ScanResponse::new(outcome.document, &outcome.profile)),
    ))
}
