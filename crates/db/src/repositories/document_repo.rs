//! Repository for the `project_documents` table.

use sqlx::PgPool;

use atelier_core::types::DbId;

use crate::models::document::ProjectDocument;

const COLUMNS: &str =
    "id, project_id, title, storage_path, embed_url, file_type, size_bytes, created_at, updated_at";

/// Provides operations for project documents.
pub struct DocumentRepo;

impl DocumentRepo {
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectDocument>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_documents
             WHERE project_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, ProjectDocument>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProjectDocument>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_documents WHERE id = $1");
        sqlx::query_as::<_, ProjectDocument>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a document row. The caller has already classified the source,
    /// so exactly one of `storage_path` / `embed_url` is set; the table's
    /// CHECK constraint backstops that.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        title: &str,
        storage_path: Option<&str>,
        embed_url: Option<&str>,
        file_type: Option<&str>,
        size_bytes: Option<i64>,
    ) -> Result<ProjectDocument, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_documents
                (project_id, title, storage_path, embed_url, file_type, size_bytes)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectDocument>(&query)
            .bind(project_id)
            .bind(title)
            .bind(storage_path)
            .bind(embed_url)
            .bind(file_type)
            .bind(size_bytes)
            .fetch_one(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM project_documents WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
