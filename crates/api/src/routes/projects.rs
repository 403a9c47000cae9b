//! Route definitions for projects and their nested resources (phases,
//! tasks, todos, documents). Task/todo/document mutations addressed by
//! their own id live at top level next to `/projects`.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{documents, phases, projects, tasks, todos};
use crate::state::AppState;

/// Routes mounted at the API root (spanning `/projects`, `/tasks`,
/// `/todos`, and `/documents`).
///
/// ```text
/// GET    /projects                         -> list
/// POST   /projects                         -> create
/// GET    /projects/{id}                    -> get_detail
/// PUT    /projects/{id}                    -> update
/// DELETE /projects/{id}                    -> delete
/// PUT    /projects/{id}/brief              -> update_brief
/// PUT    /projects/{id}/phases             -> save_batch
/// POST   /projects/{id}/tasks              -> create task
/// GET    /projects/{id}/todos              -> list todos
/// POST   /projects/{id}/todos              -> create todo
/// GET    /projects/{id}/documents          -> list with previews
/// POST   /projects/{id}/documents/link     -> attach link
/// POST   /projects/{id}/documents/upload   -> register upload
///
/// POST   /tasks/{id}/toggle                -> toggle done (note on client check-off)
/// PUT    /tasks/{id}/due-date              -> set/clear due date
/// GET    /tasks/{id}/notes                 -> list notes
/// DELETE /tasks/{id}                       -> delete
///
/// POST   /todos/{id}/toggle                -> toggle done
/// DELETE /todos/{id}                       -> delete
///
/// DELETE /documents/{id}                   -> delete
/// ```
pub fn router() -> Router<AppState> {
    let project_routes = Router::new()
        .route("/", get(projects::list).post(projects::create))
        .route(
            "/{id}",
            get(projects::get_detail)
                .put(projects::update)
                .delete(projects::delete),
        )
        .route("/{id}/brief", put(projects::update_brief))
        .route("/{id}/phases", put(phases::save_batch))
        .route("/{id}/tasks", post(tasks::create))
        .route("/{id}/todos", get(todos::list).post(todos::create))
        .route("/{id}/documents", get(documents::list))
        .route("/{id}/documents/link", post(documents::create_link))
        .route("/{id}/documents/upload", post(documents::create_upload));

    let task_routes = Router::new()
        .route("/{id}", delete(tasks::delete))
        .route("/{id}/toggle", post(tasks::toggle))
        .route("/{id}/due-date", put(tasks::set_due_date))
        .route("/{id}/notes", get(tasks::list_notes));

    let todo_routes = Router::new()
        .route("/{id}", delete(todos::delete))
        .route("/{id}/toggle", post(todos::toggle));

    let document_routes = Router::new().route("/{id}", delete(documents::delete));

    Router::new()
        .nest("/projects", project_routes)
        .nest("/tasks", task_routes)
        .nest("/todos", todo_routes)
        .nest("/documents", document_routes)
}
