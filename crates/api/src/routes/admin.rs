//! Route definitions for the `/admin` tree.

use axum::routing::get;
use axum::Router;

use crate::handlers::clients;
use crate::state::AppState;

/// Routes mounted at `/admin`. All handlers enforce [`RequireAdmin`].
///
/// ```text
/// GET  /clients       -> list
/// POST /clients       -> provision
/// GET  /clients/{id}  -> get_by_id (profile + contacts)
/// ```
///
/// [`RequireAdmin`]: crate::middleware::rbac::RequireAdmin
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/clients", get(clients::list).post(clients::provision))
        .route("/clients/{id}", get(clients::get_by_id))
}
