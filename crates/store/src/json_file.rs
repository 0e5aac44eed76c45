//! [`Store`] backed by a single JSON document on local disk.
//!
//! The whole database is one in-memory [`Document`] owned by the store and
//! guarded by a single async mutex. Every mutation runs as
//! lock → copy → modify → flush → swap, so the file and the in-memory copy
//! never diverge: if the flush fails the mutation is discarded.
//!
//! The lock only serializes writers inside this process. Two processes
//! pointed at the same file still lose updates (last flush wins).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use folio_core::project::{next_project_id, NewProject, Project};
use folio_core::types::{DbId, Timestamp};
use folio_core::upload::{CompletionMap, NewUpload, Upload, UpsertedUpload};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::{Store, StoreError, StoreResult};

// ---------------------------------------------------------------------------
// Document layout
// ---------------------------------------------------------------------------

/// On-disk layout. Field names match data files written by earlier
/// versions of the tracker, so existing files load unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub completed_modules: BTreeMap<String, bool>,
    #[serde(default)]
    pub uploads: BTreeMap<String, StoredUpload>,
}

/// Upload metadata as stored in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredUpload {
    pub filename: String,
    pub original_name: String,
    #[serde(default = "default_mime_type")]
    pub mime_type: String,
    #[serde(default)]
    pub size: i64,
    #[serde(rename = "uploadDate")]
    pub upload_date: Timestamp,
    /// Absent in files written before URLs were stored; readers then build
    /// the URL from `filename`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

fn default_mime_type() -> String {
    "application/octet-stream".to_string()
}

impl StoredUpload {
    fn from_new(input: NewUpload, upload_date: Timestamp) -> Self {
        Self {
            filename: input.reference,
            original_name: input.original_name,
            mime_type: input.mime_type,
            size: input.size_bytes,
            upload_date,
            url: Some(input.retrieval_url),
        }
    }

    /// Convert to the shared [`Upload`] record. An empty `retrieval_url`
    /// means the URL was never stored and must be derived from the reference.
    fn to_upload(&self, module_key: &str) -> Upload {
        Upload {
            module_key: module_key.to_string(),
            reference: self.filename.clone(),
            original_name: self.original_name.clone(),
            mime_type: self.mime_type.clone(),
            retrieval_url: self.url.clone().unwrap_or_default(),
            size_bytes: self.size,
            uploaded_at: self.upload_date,
        }
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// File-backed store. Cheap to share behind an `Arc`.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    doc: Mutex<Document>,
}

impl JsonFileStore {
    /// Open `path`, creating an empty document if the file does not exist.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        Self::open_with_seed(path, Vec::new()).await
    }

    /// Open `path`, creating it with `seed` projects if it does not exist.
    ///
    /// An existing file that cannot be parsed is an error: it is never
    /// silently replaced.
    pub async fn open_with_seed(path: impl Into<PathBuf>, seed: Vec<Project>) -> StoreResult<Self> {
        let path = path.into();

        let doc = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let doc: Document =
                    serde_json::from_slice(&bytes).map_err(|source| StoreError::Json {
                        path: path.clone(),
                        source,
                    })?;
                tracing::info!(
                    path = %path.display(),
                    projects = doc.projects.len(),
                    "Data file loaded"
                );
                doc
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let doc = Document {
                    projects: seed,
                    ..Default::default()
                };
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(parent)
                        .await
                        .map_err(|source| StoreError::Io {
                            path: parent.to_path_buf(),
                            source,
                        })?;
                }
                flush(&path, &doc).await?;
                tracing::info!(
                    path = %path.display(),
                    seeded = doc.projects.len(),
                    "Data file created"
                );
                doc
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        Ok(Self {
            path,
            doc: Mutex::new(doc),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy of the current document.
    pub async fn snapshot(&self) -> Document {
        self.doc.lock().await.clone()
    }

    /// Run `f` against a copy of the document and flush it if `f` reports a
    /// change. The copy replaces the in-memory document only after the
    /// flush succeeds.
    async fn mutate<T, F>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut Document) -> (T, bool),
    {
        let mut guard = self.doc.lock().await;
        let mut next = guard.clone();
        let (out, changed) = f(&mut next);
        if changed {
            flush(&self.path, &next).await?;
            *guard = next;
        }
        Ok(out)
    }
}

/// Write `doc` to a sibling temp file and rename it over `path`.
async fn flush(path: &Path, doc: &Document) -> StoreResult<()> {
    let bytes = serde_json::to_vec_pretty(doc).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    tokio::fs::write(&tmp, &bytes)
        .await
        .map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(())
}

#[async_trait]
impl Store for JsonFileStore {
    fn backend_name(&self) -> &'static str {
        "json"
    }

    async fn health_check(&self) -> StoreResult<()> {
        tokio::fs::metadata(&self.path)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })?;
        Ok(())
    }

    async fn list_projects(&self) -> StoreResult<Vec<Project>> {
        Ok(self.doc.lock().await.projects.clone())
    }

    async fn create_project(&self, input: NewProject) -> StoreResult<Project> {
        let project = self
            .mutate(|doc| {
                let id = next_project_id(&doc.projects);
                let project = input.into_project(id, None);
                doc.projects.push(project.clone());
                (project, true)
            })
            .await?;
        tracing::info!(project_id = project.id, name = %project.name, "Project created");
        Ok(project)
    }

    async fn delete_project(&self, id: DbId) -> StoreResult<u64> {
        self.mutate(|doc| {
            let before = doc.projects.len();
            doc.projects.retain(|p| p.id != id);
            let removed = (before - doc.projects.len()) as u64;
            (removed, removed > 0)
        })
        .await
    }

    async fn list_completion_flags(&self) -> StoreResult<CompletionMap> {
        Ok(self.doc.lock().await.completed_modules.clone())
    }

    async fn toggle_completion(&self, module_key: &str) -> StoreResult<bool> {
        self.mutate(|doc| {
            let flag = doc
                .completed_modules
                .entry(module_key.to_string())
                .or_insert(false);
            *flag = !*flag;
            (*flag, true)
        })
        .await
    }

    async fn list_uploads(&self) -> StoreResult<BTreeMap<String, Upload>> {
        let doc = self.doc.lock().await;
        Ok(doc
            .uploads
            .iter()
            .map(|(key, stored)| (key.clone(), stored.to_upload(key)))
            .collect())
    }

    async fn upsert_upload(
        &self,
        module_key: &str,
        input: NewUpload,
    ) -> StoreResult<UpsertedUpload> {
        let now = chrono::Utc::now();
        self.mutate(|doc| {
            let stored = StoredUpload::from_new(input, now);
            let current = stored.to_upload(module_key);
            let replaced = doc
                .uploads
                .insert(module_key.to_string(), stored)
                .map(|old| old.to_upload(module_key));
            (UpsertedUpload { current, replaced }, true)
        })
        .await
    }

    async fn delete_upload(&self, module_key: &str) -> StoreResult<Option<Upload>> {
        self.mutate(|doc| {
            let removed = doc
                .uploads
                .remove(module_key)
                .map(|old| old.to_upload(module_key));
            let changed = removed.is_some();
            (removed, changed)
        })
        .await
    }
}
