//! Repository for the `projects` table.

use folio_core::project::NewProject;
use folio_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::project::ProjectRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, type, area, modules, created_at";

/// Provides create/list/delete for projects. There is no update: projects
/// are immutable once created.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row. The id comes from
    /// the table's sequence, so ids are never reused after deletes.
    pub async fn create(pool: &PgPool, input: &NewProject) -> Result<ProjectRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (name, type, area, modules)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(&input.name)
            .bind(&input.project_type)
            .bind(&input.area)
            .bind(Json(&input.modules))
            .fetch_one(pool)
            .await
    }

    /// List every project in creation order.
    pub async fn list(pool: &PgPool) -> Result<Vec<ProjectRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY id");
        sqlx::query_as::<_, ProjectRow>(&query).fetch_all(pool).await
    }

    /// Permanently delete a project. Returns the number of rows removed (0 or 1).
    ///
    /// Completion and upload rows keyed by this project's modules are left in place.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
