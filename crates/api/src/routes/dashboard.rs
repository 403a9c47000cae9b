//! Route definitions for the client dashboard.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Routes mounted at `/dashboard` (client role required).
///
/// ```text
/// GET  /whats-new -> whats_new
/// POST /seen      -> seen
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/whats-new", get(dashboard::whats_new))
        .route("/seen", post(dashboard::seen))
}
