use axum::routing::{get, post};
use axum::Router;

use crate::handlers::completion;
use crate::state::AppState;

/// ```text
/// GET    /completed          -> list
/// POST   /completed/toggle   -> toggle
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/completed", get(completion::list))
        .route("/completed/toggle", post(completion::toggle))
}
