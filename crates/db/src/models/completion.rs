//! Row model for the `completed_modules` table.

use folio_core::types::DbId;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct CompletionRow {
    pub id: DbId,
    pub module_key: String,
    pub completed: bool,
}
