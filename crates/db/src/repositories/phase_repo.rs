//! Repository for the `project_phases` table, including the batched
//! structural edit used by the project settings view.

use sqlx::PgPool;

use atelier_core::progress;
use atelier_core::types::DbId;

use crate::models::phase::{
    PhaseBatch, PhaseBatchOutcome, ProjectPhase, RejectedPhase,
};

const COLUMNS: &str = "id, project_id, title, phase_order";

/// Provides operations for project phases.
pub struct PhaseRepo;

impl PhaseRepo {
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectPhase>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_phases
             WHERE project_id = $1 ORDER BY phase_order, id"
        );
        sqlx::query_as::<_, ProjectPhase>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Apply a batched phase edit in a single transaction.
    ///
    /// Deletions of phases that still own tasks are refused per phase and
    /// reported in `rejected`; the rest of the batch still commits. After
    /// the writes, surviving phases are renumbered to a dense `1..N` order
    /// and the final list is reloaded, so callers never see stale orders.
    pub async fn save_batch(
        pool: &PgPool,
        project_id: DbId,
        batch: &PhaseBatch,
    ) -> Result<PhaseBatchOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut rejected = Vec::new();

        for item in &batch.phases {
            match (item.id, item.delete) {
                (Some(id), true) => {
                    let task_count: i64 = sqlx::query_scalar(
                        "SELECT COUNT(*) FROM phase_tasks WHERE phase_id = $1",
                    )
                    .bind(id)
                    .fetch_one(&mut *tx)
                    .await?;

                    if task_count > 0 {
                        rejected.push(RejectedPhase {
                            id,
                            title: item.title.clone(),
                            task_count,
                            reason: format!(
                                "phase still has {task_count} task(s); move or delete them first"
                            ),
                        });
                    } else {
                        sqlx::query(
                            "DELETE FROM project_phases WHERE id = $1 AND project_id = $2",
                        )
                        .bind(id)
                        .bind(project_id)
                        .execute(&mut *tx)
                        .await?;
                    }
                }
                (Some(id), false) => {
                    sqlx::query(
                        "UPDATE project_phases SET title = $3, phase_order = $4
                         WHERE id = $1 AND project_id = $2",
                    )
                    .bind(id)
                    .bind(project_id)
                    .bind(&item.title)
                    .bind(item.phase_order)
                    .execute(&mut *tx)
                    .await?;
                }
                (None, true) => {
                    // Deleting a phase that was never inserted is a no-op.
                }
                (None, false) => {
                    sqlx::query(
                        "INSERT INTO project_phases (project_id, title, phase_order)
                         VALUES ($1, $2, $3)",
                    )
                    .bind(project_id)
                    .bind(&item.title)
                    .bind(item.phase_order)
                    .execute(&mut *tx)
                    .await?;
                }
            }
        }

        // Renumber survivors densely so gaps from deletions never persist.
        let mut orders: Vec<(DbId, i32)> = sqlx::query_as(
            "SELECT id, phase_order FROM project_phases
             WHERE project_id = $1 ORDER BY phase_order, id",
        )
        .bind(project_id)
        .fetch_all(&mut *tx)
        .await?;

        for (id, order) in progress::dense_renumber(&mut orders) {
            sqlx::query("UPDATE project_phases SET phase_order = $2 WHERE id = $1")
                .bind(id)
                .bind(order)
                .execute(&mut *tx)
                .await?;
        }

        let query = format!(
            "SELECT {COLUMNS} FROM project_phases
             WHERE project_id = $1 ORDER BY phase_order, id"
        );
        let phases = sqlx::query_as::<_, ProjectPhase>(&query)
            .bind(project_id)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(PhaseBatchOutcome { phases, rejected })
    }
}
