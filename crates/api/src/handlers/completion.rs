//! Handlers for completion flags.

use axum::extract::State;
use axum::Json;
use folio_core::upload::{CompletionMap, CompletionState, ToggleCompletion};

use crate::error::AppResult;
use crate::handlers::checked_module_key;
use crate::state::AppState;

/// GET /api/completed
pub async fn list(State(state): State<AppState>) -> AppResult<Json<CompletionMap>> {
    let flags = state.store.list_completion_flags().await?;
    Ok(Json(flags))
}

/// POST /api/completed/toggle
///
/// Flips the flag and returns the new value. Each call flips again.
pub async fn toggle(
    State(state): State<AppState>,
    Json(input): Json<ToggleCompletion>,
) -> AppResult<Json<CompletionState>> {
    let key = checked_module_key(input.module_key)?;
    let completed = state.store.toggle_completion(&key).await?;
    tracing::debug!(module_key = %key, completed, "Completion toggled");
    Ok(Json(CompletionState {
        module_key: key,
        completed,
    }))
}
