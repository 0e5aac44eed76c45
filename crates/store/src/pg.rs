//! [`Store`] backed by PostgreSQL.

use std::collections::BTreeMap;

use async_trait::async_trait;
use folio_core::project::{NewProject, Project};
use folio_core::types::DbId;
use folio_core::upload::{CompletionMap, NewUpload, Upload, UpsertedUpload};
use folio_db::repositories::{CompletionRepo, ProjectRepo, UploadRepo};
use folio_db::DbPool;

use crate::{Store, StoreResult};

/// Thin adapter from the [`Store`] trait to the `folio-db` repositories.
///
/// Holds no in-memory state: the database serializes conflicting writes.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn health_check(&self) -> StoreResult<()> {
        folio_db::health_check(&self.pool).await?;
        Ok(())
    }

    async fn list_projects(&self) -> StoreResult<Vec<Project>> {
        let rows = ProjectRepo::list(&self.pool).await?;
        Ok(rows.into_iter().map(Project::from).collect())
    }

    async fn create_project(&self, input: NewProject) -> StoreResult<Project> {
        let row = ProjectRepo::create(&self.pool, &input).await?;
        tracing::info!(project_id = row.id, name = %row.name, "Project created");
        Ok(row.into())
    }

    async fn delete_project(&self, id: DbId) -> StoreResult<u64> {
        Ok(ProjectRepo::delete(&self.pool, id).await?)
    }

    async fn list_completion_flags(&self) -> StoreResult<CompletionMap> {
        let rows = CompletionRepo::list_completed(&self.pool).await?;
        Ok(rows
            .into_iter()
            .map(|row| (row.module_key, row.completed))
            .collect())
    }

    async fn toggle_completion(&self, module_key: &str) -> StoreResult<bool> {
        Ok(CompletionRepo::toggle(&self.pool, module_key).await?)
    }

    async fn list_uploads(&self) -> StoreResult<BTreeMap<String, Upload>> {
        let rows = UploadRepo::list(&self.pool).await?;
        Ok(rows
            .into_iter()
            .map(|row| (row.module_key.clone(), Upload::from(row)))
            .collect())
    }

    async fn upsert_upload(
        &self,
        module_key: &str,
        input: NewUpload,
    ) -> StoreResult<UpsertedUpload> {
        let (current, replaced) = UploadRepo::upsert(&self.pool, module_key, &input).await?;
        Ok(UpsertedUpload {
            current: current.into(),
            replaced: replaced.map(Upload::from),
        })
    }

    async fn delete_upload(&self, module_key: &str) -> StoreResult<Option<Upload>> {
        let removed = UploadRepo::delete(&self.pool, module_key).await?;
        Ok(removed.map(Upload::from))
    }
}
