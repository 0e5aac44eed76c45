//! Row model for the `projects` table.

use folio_core::project::Project;
use folio_core::types::{DbId, Timestamp};
use sqlx::types::Json;
use sqlx::FromRow;

/// A project row. `modules` is a JSONB array of module names.
#[derive(Debug, Clone, FromRow)]
pub struct ProjectRow {
    pub id: DbId,
    pub name: String,
    #[sqlx(rename = "type")]
    pub project_type: String,
    pub area: String,
    pub modules: Json<Vec<String>>,
    pub created_at: Timestamp,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Project {
            id: row.id,
            name: row.name,
            project_type: row.project_type,
            area: row.area,
            modules: row.modules.0,
            created_at: Some(row.created_at),
        }
    }
}
