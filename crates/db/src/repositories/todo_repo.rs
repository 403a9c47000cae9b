//! Repository for the `project_todos` table.

use sqlx::PgPool;

use atelier_core::types::DbId;

use crate::models::todo::ProjectTodo;

const COLUMNS: &str = "id, project_id, text, is_done, completed_at, created_at";

/// Provides operations for project todos.
pub struct TodoRepo;

impl TodoRepo {
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectTodo>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_todos WHERE project_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, ProjectTodo>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ProjectTodo>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_todos WHERE id = $1");
        sqlx::query_as::<_, ProjectTodo>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        text: &str,
    ) -> Result<ProjectTodo, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_todos (project_id, text)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectTodo>(&query)
            .bind(project_id)
            .bind(text)
            .fetch_one(pool)
            .await
    }

    /// Toggle the done flag; the completion timestamp tracks it.
    pub async fn set_done(
        pool: &PgPool,
        id: DbId,
        is_done: bool,
    ) -> Result<Option<ProjectTodo>, sqlx::Error> {
        let query = format!(
            "UPDATE project_todos SET
                is_done = $2,
                completed_at = CASE WHEN $2 THEN NOW() ELSE NULL END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectTodo>(&query)
            .bind(id)
            .bind(is_done)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM project_todos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
