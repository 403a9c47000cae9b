//! Client dashboard handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, Utc};

use atelier_core::error::CoreError;
use atelier_db::models::dashboard::WhatsNewItem;
use atelier_db::repositories::{DashboardRepo, ProfileRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireClient;
use crate::response::DataResponse;
use crate::state::AppState;

/// Window used when a client has no recorded visit yet.
const FALLBACK_WINDOW_DAYS: i64 = 14;

/// GET /api/v1/dashboard/whats-new
///
/// Everything created in the client's projects since their last visit,
/// or in the last 14 days for a first visit.
pub async fn whats_new(
    RequireClient(user): RequireClient,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<WhatsNewItem>>>> {
    let profile = ProfileRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Profile",
            id: user.user_id,
        }))?;

    let since = profile
        .last_seen_at
        .unwrap_or_else(|| Utc::now() - Duration::days(FALLBACK_WINDOW_DAYS));

    let items = DashboardRepo::whats_new(&state.pool, user.user_id, since).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/dashboard/seen
///
/// Stamps `last_seen_at`; the next what's-new window starts now.
pub async fn seen(
    RequireClient(user): RequireClient,
    State(state): State<AppState>,
) -> AppResult<StatusCode> {
    ProfileRepo::touch_last_seen(&state.pool, user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
