//! Client dashboard projections.

use serde::Serialize;
use sqlx::FromRow;

use atelier_core::types::{DbId, Timestamp};

/// One "what's new" entry: a document, task, or todo created in one of the
/// client's projects since their last visit.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WhatsNewItem {
    /// `"document"`, `"task"`, or `"todo"`.
    pub kind: String,
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub created_at: Timestamp,
}
