//! Phase entity model and the batched structural-edit DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use atelier_core::types::DbId;

/// A row from the `project_phases` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectPhase {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub phase_order: i32,
}

/// One entry in a batched phase edit. `id = None` inserts a new phase;
/// `delete = true` marks an existing phase for deletion.
#[derive(Debug, Clone, Deserialize)]
pub struct PhaseBatchItem {
    pub id: Option<DbId>,
    pub title: String,
    pub phase_order: i32,
    #[serde(default)]
    pub delete: bool,
}

/// The full batched edit submitted from the project settings view.
#[derive(Debug, Clone, Deserialize)]
pub struct PhaseBatch {
    pub phases: Vec<PhaseBatchItem>,
}

/// A phase whose deletion was refused because it still owns tasks.
#[derive(Debug, Clone, Serialize)]
pub struct RejectedPhase {
    pub id: DbId,
    pub title: String,
    pub task_count: i64,
    pub reason: String,
}

/// Result of a batch save: the reloaded phase list (dense orders, so stale
/// client-side numbers are never trusted) plus any per-phase rejections.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseBatchOutcome {
    pub phases: Vec<ProjectPhase>,
    pub rejected: Vec<RejectedPhase>,
}
