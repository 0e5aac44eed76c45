//! Handlers for the `/projects` resource.

use axum::extract::{Path, State};
use axum::Json;
use folio_core::project::{CreateProject, Project};
use folio_core::types::DbId;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Response body for `DELETE /api/projects/{id}`.
#[derive(Debug, Serialize)]
pub struct DeleteProjectResponse {
    /// Number of projects removed: 0 when the id did not exist.
    pub deleted: u64,
}

/// GET /api/projects
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Project>>> {
    let projects = state.store.list_projects().await?;
    Ok(Json(projects))
}

/// POST /api/projects
///
/// Responds 200 with the created project.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<Json<Project>> {
    let input = input.validate()?;
    let project = state.store.create_project(input).await?;
    Ok(Json(project))
}

/// DELETE /api/projects/{id}
///
/// Completion flags and uploads stored under the project's module keys are
/// left in place.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteProjectResponse>> {
    let id: DbId = id
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid project id '{id}'")))?;

    let deleted = state.store.delete_project(id).await?;
    if deleted == 0 {
        tracing::debug!(project_id = id, "Delete of unknown project");
    } else {
        tracing::info!(project_id = id, "Project deleted");
    }
    Ok(Json(DeleteProjectResponse { deleted }))
}
