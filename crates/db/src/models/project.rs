//! Project entity model, DTOs, and the canonical read projection.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use atelier_core::types::{DbId, Timestamp};

use crate::models::phase::ProjectPhase;
use crate::models::task::PhaseTask;

/// A row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub client_id: Option<DbId>,
    pub brief_content: Option<String>,
    pub price_cents: Option<i64>,
    pub deposit_percent: i32,
    pub last_viewed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub client_id: Option<DbId>,
    pub price_cents: Option<i64>,
    /// Defaults to 50 if omitted.
    pub deposit_percent: Option<i32>,
    pub brief_content: Option<String>,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub client_id: Option<DbId>,
    pub price_cents: Option<i64>,
    pub deposit_percent: Option<i32>,
    pub brief_content: Option<String>,
}

/// One phase with its tasks and computed completion percentage.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseDetail {
    #[serde(flatten)]
    pub phase: ProjectPhase,
    pub tasks: Vec<PhaseTask>,
    pub percent: u8,
}

/// The canonical typed projection for a project read: the row, its phases
/// in display order with tasks, and the derived progress values. Built in
/// one place (`ProjectRepo::detail`) so callers never re-normalize join
/// shapes.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub phases: Vec<PhaseDetail>,
    pub percent: u8,
    pub current_phase_id: Option<DbId>,
}
