//! Handler for the batched phase edit on a project.

use axum::extract::{Path, State};
use axum::Json;

use atelier_core::error::CoreError;
use atelier_core::types::DbId;
use atelier_db::models::phase::{PhaseBatch, PhaseBatchOutcome};
use atelier_db::repositories::{PhaseRepo, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// PUT /api/v1/projects/{id}/phases
///
/// Applies the whole structural edit (inserts, renames, reorders,
/// deletions) in one transaction. Deletions of phases that still own
/// tasks come back in `rejected` while the rest of the batch commits.
pub async fn save_batch(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(batch): Json<PhaseBatch>,
) -> AppResult<Json<DataResponse<PhaseBatchOutcome>>> {
    ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;

    for item in &batch.phases {
        if !item.delete && item.title.trim().is_empty() {
            return Err(AppError::Core(CoreError::Validation(
                "phase title must not be empty".into(),
            )));
        }
    }

    let outcome = PhaseRepo::save_batch(&state.pool, project_id, &batch).await?;

    if !outcome.rejected.is_empty() {
        tracing::info!(
            project_id,
            rejected = outcome.rejected.len(),
            "Phase deletions refused (phases still own tasks)",
        );
    }

    Ok(Json(DataResponse { data: outcome }))
}
