//! Record persistence for projects, completion flags and uploads.
//!
//! [`Store`] is the seam the API layer talks to. Two implementations exist:
//!
//! - [`PgStore`]: PostgreSQL tables through the `folio-db` repositories.
//! - [`JsonFileStore`]: a single JSON document rewritten on every mutation.
//!
//! Neither cascades project deletes to completion or upload records, and
//! neither offers transactions spanning more than one record.

pub mod error;
pub mod json_file;
pub mod pg;
pub mod seed;

use std::collections::BTreeMap;

use async_trait::async_trait;
use folio_core::project::{NewProject, Project};
use folio_core::types::DbId;
use folio_core::upload::{CompletionMap, NewUpload, Upload, UpsertedUpload};

pub use error::{StoreError, StoreResult};
pub use json_file::JsonFileStore;
pub use pg::PgStore;

/// Data access shared by both backends.
///
/// Every method is a single-record operation; failures surface as
/// [`StoreError`] and nothing is retried.
#[async_trait]
pub trait Store: Send + Sync {
    /// Short name for logs and the health endpoint.
    fn backend_name(&self) -> &'static str;

    /// Verify the backing storage is reachable.
    async fn health_check(&self) -> StoreResult<()>;

    /// Every project, no filtering or paging.
    async fn list_projects(&self) -> StoreResult<Vec<Project>>;

    /// Persist a project under a freshly assigned id.
    async fn create_project(&self, input: NewProject) -> StoreResult<Project>;

    /// Delete by id, returning the number of projects removed (0 or 1).
    /// Completion and upload records are not touched.
    async fn delete_project(&self, id: DbId) -> StoreResult<u64>;

    /// Completion flags by module key.
    async fn list_completion_flags(&self) -> StoreResult<CompletionMap>;

    /// Flip the flag for `module_key` and return the new value. An unseen
    /// key becomes `true`. Not idempotent.
    async fn toggle_completion(&self, module_key: &str) -> StoreResult<bool>;

    /// Every upload by module key.
    async fn list_uploads(&self) -> StoreResult<BTreeMap<String, Upload>>;

    /// Insert or replace the upload for `module_key`.
    async fn upsert_upload(&self, module_key: &str, input: NewUpload)
        -> StoreResult<UpsertedUpload>;

    /// Remove the upload for `module_key`, returning it if one existed.
    async fn delete_upload(&self, module_key: &str) -> StoreResult<Option<Upload>>;
}
