//! Repository for the `uploads` table.

use folio_core::upload::NewUpload;
use sqlx::PgPool;

use crate::models::upload::UploadRow;

const COLUMNS: &str =
    "id, module_key, filename, original_name, mime_type, url, size_bytes, created_at, updated_at";

/// Provides list/upsert/delete for uploads, one row per module key.
pub struct UploadRepo;

impl UploadRepo {
    /// List every upload ordered by module key.
    pub async fn list(pool: &PgPool) -> Result<Vec<UploadRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM uploads ORDER BY module_key");
        sqlx::query_as::<_, UploadRow>(&query).fetch_all(pool).await
    }

    /// Find the upload for a module key.
    pub async fn find_by_key(
        pool: &PgPool,
        module_key: &str,
    ) -> Result<Option<UploadRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM uploads WHERE module_key = $1");
        sqlx::query_as::<_, UploadRow>(&query)
            .bind(module_key)
            .fetch_optional(pool)
            .await
    }

    /// Insert or replace the upload for `module_key`.
    ///
    /// Returns `(current, replaced)`. The previous row is read under
    /// `FOR UPDATE` in the same transaction so the caller learns exactly
    /// which blob this write superseded.
    pub async fn upsert(
        pool: &PgPool,
        module_key: &str,
        input: &NewUpload,
    ) -> Result<(UploadRow, Option<UploadRow>), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let select = format!("SELECT {COLUMNS} FROM uploads WHERE module_key = $1 FOR UPDATE");
        let replaced = sqlx::query_as::<_, UploadRow>(&select)
            .bind(module_key)
            .fetch_optional(&mut *tx)
            .await?;

        let upsert = format!(
            "INSERT INTO uploads (module_key, filename, original_name, mime_type, url, size_bytes)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (module_key)
             DO UPDATE SET
                filename = EXCLUDED.filename,
                original_name = EXCLUDED.original_name,
                mime_type = EXCLUDED.mime_type,
                url = EXCLUDED.url,
                size_bytes = EXCLUDED.size_bytes,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        let current = sqlx::query_as::<_, UploadRow>(&upsert)
            .bind(module_key)
            .bind(&input.reference)
            .bind(&input.original_name)
            .bind(&input.mime_type)
            .bind(&input.retrieval_url)
            .bind(input.size_bytes)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok((current, replaced))
    }

    /// Delete the upload for `module_key`, returning the removed row if any.
    pub async fn delete(pool: &PgPool, module_key: &str) -> Result<Option<UploadRow>, sqlx::Error> {
        let query = format!("DELETE FROM uploads WHERE module_key = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, UploadRow>(&query)
            .bind(module_key)
            .fetch_optional(pool)
            .await
    }
}
