//! Handlers for tasks and their notes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use atelier_core::error::CoreError;
use atelier_core::types::DbId;
use atelier_db::models::task::{CreateTask, PhaseTask, SetDueDate, TaskNote, ToggleTask};
use atelier_db::repositories::{ProjectRepo, TaskRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/projects/{id}/tasks
pub async fn create(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateTask>,
) -> AppResult<(StatusCode, Json<DataResponse<PhaseTask>>)> {
    if input.title.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "title must not be empty".into(),
        )));
    }

    let task = TaskRepo::create(&state.pool, project_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

/// POST /api/v1/tasks/{id}/toggle
///
/// Flips the done flag. A note is recorded only when a client marks a
/// task done (the false -> true transition); admin toggles and un-checks
/// never write notes.
pub async fn toggle(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ToggleTask>,
) -> AppResult<Json<DataResponse<PhaseTask>>> {
    let task = TaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(task_not_found(id))?;

    if !user.is_admin() {
        ensure_client_owns_project(&state, &user, task.project_id).await?;
    }

    let record_note = !user.is_admin() && !task.is_done && input.is_done;

    let updated = TaskRepo::set_done(&state.pool, id, input.is_done)
        .await?
        .ok_or(task_not_found(id))?;

    if record_note {
        if let Some(note) = input.note.as_deref().filter(|n| !n.trim().is_empty()) {
            TaskRepo::insert_note(&state.pool, task.project_id, id, note.trim(), &user.role)
                .await?;
        }
    }

    Ok(Json(DataResponse { data: updated }))
}

/// PUT /api/v1/tasks/{id}/due-date
pub async fn set_due_date(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetDueDate>,
) -> AppResult<Json<DataResponse<PhaseTask>>> {
    let task = TaskRepo::set_due_date(&state.pool, id, input.due_date)
        .await?
        .ok_or(task_not_found(id))?;
    Ok(Json(DataResponse { data: task }))
}

/// GET /api/v1/tasks/{id}/notes
pub async fn list_notes(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<TaskNote>>>> {
    let task = TaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(task_not_found(id))?;

    if !user.is_admin() {
        ensure_client_owns_project(&state, &user, task.project_id).await?;
    }

    let notes = TaskRepo::list_notes(&state.pool, id).await?;
    Ok(Json(DataResponse { data: notes }))
}

/// DELETE /api/v1/tasks/{id}
pub async fn delete(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = TaskRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(task_not_found(id))
    }
}

fn task_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Task", id })
}

/// Reject clients touching tasks in projects that are not theirs.
pub(crate) async fn ensure_client_owns_project(
    state: &AppState,
    user: &AuthUser,
    project_id: DbId,
) -> AppResult<()> {
    let project = ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;
    if project.client_id != Some(user.user_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Project belongs to another client".into(),
        )));
    }
    Ok(())
}
