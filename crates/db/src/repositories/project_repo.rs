//! Repository for the `projects` table and the project detail projection.

use sqlx::PgPool;

use atelier_core::invoice::DEFAULT_DEPOSIT_PERCENT;
use atelier_core::progress::{self, PhaseCounts, DEFAULT_PHASE_TITLES};
use atelier_core::types::DbId;

use crate::models::phase::ProjectPhase;
use crate::models::project::{
    CreateProject, PhaseDetail, Project, ProjectDetail, UpdateProject,
};
use crate::models::task::PhaseTask;

const COLUMNS: &str = "id, name, client_id, brief_content, price_cents, deposit_percent, \
     last_viewed_at, created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Create a project and seed it with the default phase set, in one
    /// transaction.
    pub async fn create(pool: &PgPool, dto: &CreateProject) -> Result<Project, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO projects (name, client_id, price_cents, deposit_percent, brief_content)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(&dto.name)
            .bind(dto.client_id)
            .bind(dto.price_cents)
            .bind(dto.deposit_percent.unwrap_or(DEFAULT_DEPOSIT_PERCENT))
            .bind(&dto.brief_content)
            .fetch_one(&mut *tx)
            .await?;

        for (i, title) in DEFAULT_PHASE_TITLES.iter().enumerate() {
            sqlx::query(
                "INSERT INTO project_phases (project_id, title, phase_order)
                 VALUES ($1, $2, $3)",
            )
            .bind(project.id)
            .bind(title)
            .bind((i + 1) as i32)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(project)
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY created_at DESC");
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    pub async fn list_for_client(
        pool: &PgPool,
        client_id: DbId,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE client_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(client_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Partial update; omitted fields keep their current value.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        dto: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                client_id = COALESCE($3, client_id),
                price_cents = COALESCE($4, price_cents),
                deposit_percent = COALESCE($5, deposit_percent),
                brief_content = COALESCE($6, brief_content),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&dto.name)
            .bind(dto.client_id)
            .bind(dto.price_cents)
            .bind(dto.deposit_percent)
            .bind(&dto.brief_content)
            .fetch_optional(pool)
            .await
    }

    /// Replace the brief wholesale; unlike `update`, a `None` here clears
    /// the brief rather than leaving it untouched.
    pub async fn update_brief(
        pool: &PgPool,
        id: DbId,
        brief_content: Option<&str>,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET brief_content = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(brief_content)
            .fetch_optional(pool)
            .await
    }

    /// Record a client opening the project view.
    pub async fn touch_last_viewed(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE projects SET last_viewed_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a project. Phases, tasks, todos, and documents cascade;
    /// invoices keep their snapshot and are detached via SET NULL.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Load the full project projection: the row, ordered phases with
    /// their tasks, and progress derived from task counts. Progress is
    /// always recomputed here, never read from storage.
    pub async fn detail(pool: &PgPool, id: DbId) -> Result<Option<ProjectDetail>, sqlx::Error> {
        let Some(project) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let phases = sqlx::query_as::<_, ProjectPhase>(
            "SELECT id, project_id, title, phase_order FROM project_phases
             WHERE project_id = $1 ORDER BY phase_order, id",
        )
        .bind(id)
        .fetch_all(pool)
        .await?;

        let tasks = sqlx::query_as::<_, PhaseTask>(
            "SELECT id, project_id, phase_id, title, is_done, due_date, created_at, updated_at
             FROM phase_tasks WHERE project_id = $1 ORDER BY created_at, id",
        )
        .bind(id)
        .fetch_all(pool)
        .await?;

        let mut details = Vec::with_capacity(phases.len());
        let mut counts = Vec::with_capacity(phases.len());
        for phase in phases {
            let phase_tasks: Vec<PhaseTask> = tasks
                .iter()
                .filter(|t| t.phase_id == phase.id)
                .cloned()
                .collect();
            let done = phase_tasks.iter().filter(|t| t.is_done).count();
            let total = phase_tasks.len();
            counts.push(PhaseCounts { done, total });
            details.push(PhaseDetail {
                phase,
                tasks: phase_tasks,
                percent: progress::phase_percent(done, total),
            });
        }

        let percent = progress::project_percent(&counts);
        let current_phase_id =
            progress::current_phase_index(&counts).map(|i| details[i].phase.id);

        Ok(Some(ProjectDetail {
            project,
            phases: details,
            percent,
            current_phase_id,
        }))
    }
}
