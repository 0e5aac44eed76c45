//! Route definitions for uploads.

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::upload;
use crate::state::AppState;

/// Routes merged into `/api`.
///
/// ```text
/// GET    /uploads               -> list
/// POST   /upload                -> upload (body capped at `max_upload_bytes`)
/// DELETE /upload/{module_key}   -> delete
/// ```
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/uploads", get(upload::list))
        .route(
            "/upload",
            post(upload::upload).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/upload/{module_key}", delete(upload::delete))
}
