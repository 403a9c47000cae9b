//! Repository for the `phase_tasks` and `task_notes` tables.

use sqlx::PgPool;

use atelier_core::types::DbId;

use crate::models::task::{CreateTask, PhaseTask, TaskNote};

const COLUMNS: &str = "id, project_id, phase_id, title, is_done, due_date, created_at, updated_at";

const NOTE_COLUMNS: &str = "id, project_id, task_id, note, created_by, created_at";

/// Provides operations for tasks and their append-only notes.
pub struct TaskRepo;

impl TaskRepo {
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        dto: &CreateTask,
    ) -> Result<PhaseTask, sqlx::Error> {
        let query = format!(
            "INSERT INTO phase_tasks (project_id, phase_id, title)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PhaseTask>(&query)
            .bind(project_id)
            .bind(dto.phase_id)
            .bind(&dto.title)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PhaseTask>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM phase_tasks WHERE id = $1");
        sqlx::query_as::<_, PhaseTask>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn set_done(
        pool: &PgPool,
        id: DbId,
        is_done: bool,
    ) -> Result<Option<PhaseTask>, sqlx::Error> {
        let query = format!(
            "UPDATE phase_tasks SET is_done = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PhaseTask>(&query)
            .bind(id)
            .bind(is_done)
            .fetch_optional(pool)
            .await
    }

    pub async fn set_due_date(
        pool: &PgPool,
        id: DbId,
        due_date: Option<chrono::NaiveDate>,
    ) -> Result<Option<PhaseTask>, sqlx::Error> {
        let query = format!(
            "UPDATE phase_tasks SET due_date = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PhaseTask>(&query)
            .bind(id)
            .bind(due_date)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM phase_tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Append a note to a task. Notes are never updated or deleted.
    pub async fn insert_note(
        pool: &PgPool,
        project_id: DbId,
        task_id: DbId,
        note: &str,
        created_by: &str,
    ) -> Result<TaskNote, sqlx::Error> {
        let query = format!(
            "INSERT INTO task_notes (project_id, task_id, note, created_by)
             VALUES ($1, $2, $3, $4)
             RETURNING {NOTE_COLUMNS}"
        );
        sqlx::query_as::<_, TaskNote>(&query)
            .bind(project_id)
            .bind(task_id)
            .bind(note)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn list_notes(pool: &PgPool, task_id: DbId) -> Result<Vec<TaskNote>, sqlx::Error> {
        let query = format!(
            "SELECT {NOTE_COLUMNS} FROM task_notes WHERE task_id = $1 ORDER BY created_at"
        );
        sqlx::query_as::<_, TaskNote>(&query)
            .bind(task_id)
            .fetch_all(pool)
            .await
    }
}
