//! Route definitions for the `/projects` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::project;
use crate::state::AppState;

/// Routes merged into `/api`.
///
/// ```text
/// GET    /projects        -> list
/// POST   /projects        -> create
/// DELETE /projects/{id}   -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects", get(project::list).post(project::create))
        .route("/projects/{id}", delete(project::delete))
}
