//! Document store endpoints, scoped to the caller

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::{
    db::DocumentRepository,
    middleware::AuthUser,
    models::{filter_documents, Document, DocumentQuery},
    utils::{AppError, AppResult},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_documents))
        .route("/{id}", get(get_document).delete(delete_document))
        .route("/{id}/export", get(export_document))
}

/// GET /api/v1/documents?search=
async fn list_documents(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(query): Query<DocumentQuery>,
) -> AppResult<Json<Vec<Document>>> {
    let documents = DocumentRepository::new(&state.db)
        .list_for_user(auth_user.id)
        .await?;

    Ok(Json(filter_documents(documents, query.search.as_deref())))
}

async fn load(state: &AppState, auth_user: &AuthUser, id: Uuid) -> AppResult<Document> {
    DocumentRepository::new(&state.db)
        .get_for_user(auth_user.id, id)
        .await?
        .ok_or_else(|| AppError::not_found("Document not found"))
}

/// GET /api/v1/documents/{id}
async fn get_document(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Document>> {
    Ok(Json(load(&state, &auth_user, id).await?))
}

/// GET /api/v1/documents/{id}/export
///
/// Extracted text as a plain-text attachment.
async fn export_document(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let document = load(&state, &auth_user, id).await?;
    let disposition = format!("attachment; filename=\"{}\"", document.export_file_name());

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.original_text,
    ))
}

/// DELETE /api/v1/documents/{id}
async fn delete_document(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let deleted = DocumentRepository::new(&state.db)
        .delete_for_user(auth_user.id, id)
        .await?;

    if !deleted {
        return Err(AppError::not_found("Document not found"));
    }

    tracing::info!(user_id = %auth_user.id, document_id = %id, "Document deleted");
    Ok(StatusCode::NO_CONTENT)
}
