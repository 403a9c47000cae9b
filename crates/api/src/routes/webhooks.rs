//! Route definitions for inbound webhooks.

use axum::routing::post;
use axum::Router;

use crate::handlers::webhooks;
use crate::state::AppState;

/// Routes mounted at `/webhooks`. Authenticated by HMAC signature rather
/// than a bearer token.
///
/// ```text
/// POST /payments -> payments (gateway settlement events)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/payments", post(webhooks::payments))
}
