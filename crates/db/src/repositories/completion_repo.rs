//! Repository for the `completed_modules` table.

use sqlx::PgPool;

use crate::models::completion::CompletionRow;

const COLUMNS: &str = "id, module_key, completed";

/// Provides list and toggle for completion flags.
pub struct CompletionRepo;

impl CompletionRepo {
    /// List flags that are currently `true`. `false` rows are equivalent to
    /// absence and are omitted.
    pub async fn list_completed(pool: &PgPool) -> Result<Vec<CompletionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM completed_modules WHERE completed ORDER BY module_key"
        );
        sqlx::query_as::<_, CompletionRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// Flip the flag for `module_key` and return the new value.
    ///
    /// An unseen key is inserted as `true`. The flip happens inside a single
    /// statement, so concurrent toggles serialize on the row lock.
    pub async fn toggle(pool: &PgPool, module_key: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "INSERT INTO completed_modules (module_key, completed)
             VALUES ($1, TRUE)
             ON CONFLICT (module_key)
             DO UPDATE SET completed = NOT completed_modules.completed
             RETURNING completed",
        )
        .bind(module_key)
        .fetch_one(pool)
        .await
    }

    /// Look up a single flag (any value). Used by tests and diagnostics.
    pub async fn find_by_key(
        pool: &PgPool,
        module_key: &str,
    ) -> Result<Option<CompletionRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM completed_modules WHERE module_key = $1");
        sqlx::query_as::<_, CompletionRow>(&query)
            .bind(module_key)
            .fetch_optional(pool)
            .await
    }
}
