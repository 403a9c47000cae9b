//! Route definitions for the `/invoices` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::invoices;
use crate::state::AppState;

/// Routes mounted at `/invoices`.
///
/// ```text
/// GET    /            -> list (admin)
/// POST   /            -> create (admin)
/// GET    /mine        -> list_mine (client)
/// GET    /{id}        -> get_by_id
/// DELETE /{id}        -> delete (admin; paid invoices refuse)
/// POST   /{id}/send   -> send (admin)
/// POST   /{id}/checkout -> checkout
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(invoices::list).post(invoices::create))
        .route("/mine", get(invoices::list_mine))
        .route(
            "/{id}",
            get(invoices::get_by_id).delete(invoices::delete),
        )
        .route("/{id}/send", post(invoices::send))
        .route("/{id}/checkout", post(invoices::checkout))
}
