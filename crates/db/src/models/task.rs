//! Task and task-note entity models and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use atelier_core::types::{DbId, Timestamp};

/// A row from the `phase_tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PhaseTask {
    pub id: DbId,
    pub project_id: DbId,
    pub phase_id: DbId,
    pub title: String,
    pub is_done: bool,
    pub due_date: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a task under a phase.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub phase_id: DbId,
    pub title: String,
}

/// DTO for toggling a task's done flag. The optional note is only recorded
/// on the client-facing false -> true transition.
#[derive(Debug, Clone, Deserialize)]
pub struct ToggleTask {
    pub is_done: bool,
    pub note: Option<String>,
}

/// DTO for replacing a task's due date; `None` clears it.
#[derive(Debug, Clone, Deserialize)]
pub struct SetDueDate {
    pub due_date: Option<NaiveDate>,
}

/// A row from the append-only `task_notes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TaskNote {
    pub id: DbId,
    pub project_id: DbId,
    pub task_id: DbId,
    pub note: String,
    pub created_by: String,
    pub created_at: Timestamp,
}
