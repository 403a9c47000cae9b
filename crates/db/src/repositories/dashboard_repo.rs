//! Repository for the client dashboard "what's new" feed.

use sqlx::PgPool;

use atelier_core::types::{DbId, Timestamp};

use crate::models::dashboard::WhatsNewItem;

/// Provides the cross-table dashboard queries.
pub struct DashboardRepo;

impl DashboardRepo {
    /// Everything created in the client's projects since `since`: new
    /// documents, tasks, and todos, newest first.
    pub async fn whats_new(
        pool: &PgPool,
        client_id: DbId,
        since: Timestamp,
    ) -> Result<Vec<WhatsNewItem>, sqlx::Error> {
        sqlx::query_as::<_, WhatsNewItem>(
            "SELECT 'document' AS kind, d.id, d.project_id, d.title, d.created_at
             FROM project_documents d
             JOIN projects p ON p.id = d.project_id
             WHERE p.client_id = $1 AND d.created_at > $2
             UNION ALL
             SELECT 'task' AS kind, t.id, t.project_id, t.title, t.created_at
             FROM phase_tasks t
             JOIN projects p ON p.id = t.project_id
             WHERE p.client_id = $1 AND t.created_at > $2
             UNION ALL
             SELECT 'todo' AS kind, td.id, td.project_id, td.text AS title, td.created_at
             FROM project_todos td
             JOIN projects p ON p.id = td.project_id
             WHERE p.client_id = $1 AND td.created_at > $2
             ORDER BY created_at DESC",
        )
        .bind(client_id)
        .bind(since)
        .fetch_all(pool)
        .await
    }
}
