pub mod completion;
pub mod health;
pub mod project;
pub mod upload;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                 list, create
/// /projects/{id}            delete
///
/// /completed                list flags
/// /completed/toggle         flip one flag (POST)
///
/// /uploads                  list uploads
/// /upload                   upload a file (multipart POST)
/// /upload/{module_key}      delete an upload
/// ```
pub fn api_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .merge(project::router())
        .merge(completion::router())
        .merge(upload::router(max_upload_bytes))
}
