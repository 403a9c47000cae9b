//! Project todo entity model (free-form client notes, independent of
//! phases).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use atelier_core::types::{DbId, Timestamp};

/// A row from the `project_todos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectTodo {
    pub id: DbId,
    pub project_id: DbId,
    pub text: String,
    pub is_done: bool,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for creating a todo.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTodo {
    pub text: String,
}
