//! Row model for the `uploads` table.

use folio_core::types::{DbId, Timestamp};
use folio_core::upload::Upload;
use sqlx::FromRow;

/// An upload row. `filename` holds the blob reference (the provider's
/// public id for remote storage, the file name for local storage).
#[derive(Debug, Clone, FromRow)]
pub struct UploadRow {
    pub id: DbId,
    pub module_key: String,
    pub filename: String,
    pub original_name: String,
    pub mime_type: String,
    pub url: String,
    pub size_bytes: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<UploadRow> for Upload {
    fn from(row: UploadRow) -> Self {
        Upload {
            module_key: row.module_key,
            reference: row.filename,
            original_name: row.original_name,
            mime_type: row.mime_type,
            retrieval_url: row.url,
            size_bytes: row.size_bytes,
            uploaded_at: row.updated_at,
        }
    }
}
