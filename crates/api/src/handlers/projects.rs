//! Handlers for the `/projects` resource.
//!
//! Admins get full CRUD; clients see only their own projects. Every read
//! of a single project goes through the typed detail projection so
//! progress is always computed the same way.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use atelier_core::error::CoreError;
use atelier_core::types::DbId;
use atelier_db::models::project::{CreateProject, Project, ProjectDetail, UpdateProject};
use atelier_db::repositories::ProjectRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/projects
pub async fn create(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "name must not be empty".into(),
        )));
    }
    if let Some(pct) = input.deposit_percent {
        if !(1..=100).contains(&pct) {
            return Err(AppError::Core(CoreError::Validation(
                "deposit_percent must be between 1 and 100".into(),
            )));
        }
    }

    let project = ProjectRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects
///
/// Admins see every project, clients only their own.
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let projects = if user.is_admin() {
        ProjectRepo::list(&state.pool).await?
    } else {
        ProjectRepo::list_for_client(&state.pool, user.user_id).await?
    };
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/{id}
///
/// Returns the full detail projection. A client opening their project
/// also stamps `last_viewed_at`.
pub async fn get_detail(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProjectDetail>>> {
    let detail = ProjectRepo::detail(&state.pool, id)
        .await?
        .ok_or(not_found(id))?;

    if !user.is_admin() {
        if detail.project.client_id != Some(user.user_id) {
            // Hide other clients' projects entirely.
            return Err(not_found(id));
        }
        ProjectRepo::touch_last_viewed(&state.pool, id).await?;
    }

    Ok(Json(DataResponse { data: detail }))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    if let Some(pct) = input.deposit_percent {
        if !(1..=100).contains(&pct) {
            return Err(AppError::Core(CoreError::Validation(
                "deposit_percent must be between 1 and 100".into(),
            )));
        }
    }

    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(not_found(id))?;
    Ok(Json(DataResponse { data: project }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateBrief {
    pub brief_content: Option<String>,
}

/// PUT /api/v1/projects/{id}/brief
///
/// Replaces the brief outright; `null` clears it.
pub async fn update_brief(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBrief>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = ProjectRepo::update_brief(&state.pool, id, input.brief_content.as_deref())
        .await?
        .ok_or(not_found(id))?;
    Ok(Json(DataResponse { data: project }))
}

/// DELETE /api/v1/projects/{id}
pub async fn delete(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ProjectRepo::hard_delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Project",
        id,
    })
}
