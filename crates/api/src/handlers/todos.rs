//! Handlers for project todos.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use atelier_core::error::CoreError;
use atelier_core::types::DbId;
use atelier_db::models::todo::{CreateTodo, ProjectTodo};
use atelier_db::repositories::{ProjectRepo, TodoRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::tasks::ensure_client_owns_project;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/projects/{id}/todos
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ProjectTodo>>>> {
    if !user.is_admin() {
        ensure_client_owns_project(&state, &user, project_id).await?;
    }
    let todos = TodoRepo::list_for_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: todos }))
}

/// POST /api/v1/projects/{id}/todos
pub async fn create(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateTodo>,
) -> AppResult<(StatusCode, Json<DataResponse<ProjectTodo>>)> {
    if input.text.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "text must not be empty".into(),
        )));
    }
    ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;

    let todo = TodoRepo::create(&state.pool, project_id, input.text.trim()).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: todo })))
}

#[derive(Debug, Deserialize)]
pub struct ToggleTodo {
    pub is_done: bool,
}

/// POST /api/v1/todos/{id}/toggle
///
/// Clients check off their own homework; admins can toggle anywhere.
pub async fn toggle(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ToggleTodo>,
) -> AppResult<Json<DataResponse<ProjectTodo>>> {
    let todo = TodoRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(todo_not_found(id))?;

    if !user.is_admin() {
        ensure_client_owns_project(&state, &user, todo.project_id).await?;
    }

    let todo = TodoRepo::set_done(&state.pool, id, input.is_done)
        .await?
        .ok_or(todo_not_found(id))?;
    Ok(Json(DataResponse { data: todo }))
}

/// DELETE /api/v1/todos/{id}
pub async fn delete(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = TodoRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(todo_not_found(id))
    }
}

fn todo_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Todo", id })
}
