//! Handlers for project documents: link attachments and registered
//! uploads, with resolved previews on read.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use atelier_core::document::{
    classify_source, infer_file_type, normalize_embed_url, upload_preview_kind, DocumentSource,
    PreviewKind, FILE_TYPE_LINK,
};
use atelier_core::error::CoreError;
use atelier_core::types::DbId;
use atelier_db::models::document::{
    CreateLinkDocument, CreateUploadDocument, DocumentWithPreview, ProjectDocument,
};
use atelier_db::repositories::{DocumentRepo, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::tasks::ensure_client_owns_project;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/projects/{id}/documents
///
/// Every row comes back with a resolved preview: links use their stored
/// (already normalized) embed URL; uploads get a short-lived signed URL
/// from the blob store. A signing failure downgrades that one document to
/// no preview instead of failing the whole listing.
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<DocumentWithPreview>>>> {
    if !user.is_admin() {
        ensure_client_owns_project(&state, &user, project_id).await?;
    }

    let documents = DocumentRepo::list_for_project(&state.pool, project_id).await?;

    let mut out = Vec::with_capacity(documents.len());
    for document in documents {
        let (preview_kind, preview_url) = match classify_source(
            document.storage_path.as_deref(),
            document.embed_url.as_deref(),
        ) {
            Ok(DocumentSource::Link) => (PreviewKind::Embed, document.embed_url.clone()),
            Ok(DocumentSource::Upload) => {
                let kind = upload_preview_kind(document.file_type.as_deref());
                let path = document.storage_path.as_deref().unwrap_or_default();
                match state.blob_store.signed_url(path).await {
                    Ok(url) => (kind, Some(url)),
                    Err(e) => {
                        tracing::warn!(document_id = document.id, error = %e, "Preview signing failed");
                        (kind, None)
                    }
                }
            }
            // The CHECK constraint makes this unreachable for stored rows.
            Err(_) => (PreviewKind::Generic, None),
        };
        out.push(DocumentWithPreview {
            document,
            preview_kind,
            preview_url,
        });
    }

    Ok(Json(DataResponse { data: out }))
}

/// POST /api/v1/projects/{id}/documents/link
pub async fn create_link(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateLinkDocument>,
) -> AppResult<(StatusCode, Json<DataResponse<ProjectDocument>>)> {
    if input.title.trim().is_empty() || input.embed_url.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "title and embed_url must not be empty".into(),
        )));
    }
    ensure_project_exists(&state, project_id).await?;

    let embed_url = normalize_embed_url(input.embed_url.trim());
    let document = DocumentRepo::create(
        &state.pool,
        project_id,
        input.title.trim(),
        None,
        Some(&embed_url),
        Some(FILE_TYPE_LINK),
        None,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: document })))
}

/// POST /api/v1/projects/{id}/documents/upload
///
/// Registers an upload whose binary the frontend already transferred to
/// blob storage.
pub async fn create_upload(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateUploadDocument>,
) -> AppResult<(StatusCode, Json<DataResponse<ProjectDocument>>)> {
    if input.title.trim().is_empty() || input.storage_path.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "title and storage_path must not be empty".into(),
        )));
    }
    ensure_project_exists(&state, project_id).await?;

    let file_type = infer_file_type(input.declared_mime.as_deref(), &input.filename);
    let document = DocumentRepo::create(
        &state.pool,
        project_id,
        input.title.trim(),
        Some(input.storage_path.trim()),
        None,
        Some(&file_type),
        input.size_bytes,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: document })))
}

/// DELETE /api/v1/documents/{id}
///
/// Uploads delete the blob first, then the row, so a storage failure
/// never leaves an orphaned object behind a deleted row.
pub async fn delete(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let document = DocumentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Document",
            id,
        }))?;

    if let Some(path) = document.storage_path.as_deref() {
        state.blob_store.delete(path).await?;
    }

    DocumentRepo::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn ensure_project_exists(state: &AppState, project_id: DbId) -> AppResult<()> {
    ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;
    Ok(())
}
