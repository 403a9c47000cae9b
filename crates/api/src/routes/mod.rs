pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod invoices;
pub mod projects;
pub mod webhooks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                              login (public)
/// /auth/activate                           redeem invitation (public)
/// /auth/me                                 current principal
///
/// /admin/clients                           list, provision (admin only)
/// /admin/clients/{id}                      profile + contacts (admin only)
///
/// /projects                                list, create
/// /projects/{id}                           detail projection, update, delete
/// /projects/{id}/brief                     replace brief (PUT)
/// /projects/{id}/phases                    batch phase save (PUT)
/// /projects/{id}/tasks                     create task (POST)
/// /projects/{id}/todos                     list, create
/// /projects/{id}/documents                 list with previews (GET)
/// /projects/{id}/documents/link            attach link (POST)
/// /projects/{id}/documents/upload          register upload (POST)
///
/// /tasks/{id}                              delete
/// /tasks/{id}/toggle                       flip done flag (POST)
/// /tasks/{id}/due-date                     set/clear due date (PUT)
/// /tasks/{id}/notes                        list notes (GET)
///
/// /todos/{id}                              delete
/// /todos/{id}/toggle                       flip done flag (POST)
///
/// /documents/{id}                          delete (blob first, then row)
///
/// /invoices                                list, create (admin)
/// /invoices/mine                           client's own invoices
/// /invoices/{id}                           get, delete
/// /invoices/{id}/send                      draft -> sent (POST)
/// /invoices/{id}/checkout                  hosted checkout session (POST)
///
/// /webhooks/payments                       gateway settlement webhook (public, signed)
///
/// /dashboard/whats-new                     client feed since last visit
/// /dashboard/seen                          stamp last visit (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .merge(projects::router())
        .nest("/invoices", invoices::router())
        .nest("/webhooks", webhooks::router())
        .nest("/dashboard", dashboard::router())
}
