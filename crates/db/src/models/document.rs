//! Project document entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use atelier_core::document::PreviewKind;
use atelier_core::types::{DbId, Timestamp};

/// A row from the `project_documents` table. Exactly one of
/// `storage_path` / `embed_url` is non-null (enforced by a CHECK
/// constraint and by `atelier_core::document::classify_source`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectDocument {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub storage_path: Option<String>,
    pub embed_url: Option<String>,
    pub file_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for attaching an external link document.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLinkDocument {
    pub title: String,
    pub embed_url: String,
}

/// DTO for registering an uploaded document. The binary has already been
/// transferred to blob storage; this records the resulting path.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUploadDocument {
    pub title: String,
    pub storage_path: String,
    /// Original filename, used as the file-type fallback when no MIME
    /// type was declared.
    pub filename: String,
    pub declared_mime: Option<String>,
    pub size_bytes: Option<i64>,
}

/// A document with its resolved preview: the normalized embed URL for
/// links, or a short-lived signed URL from the blob store for uploads.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentWithPreview {
    #[serde(flatten)]
    pub document: ProjectDocument,
    pub preview_kind: PreviewKind,
    pub preview_url: Option<String>,
}
