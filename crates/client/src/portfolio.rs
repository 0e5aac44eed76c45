//! Client-side caches and the flows that mutate them.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use folio_core::module_key::ModuleKey;
use folio_core::progress::{self, Summary};
use folio_core::project::Project;
use folio_core::types::DbId;
use folio_core::upload::UploadView;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::form::ProjectForm;
use crate::view::{ModuleRow, ProjectRow};

/// Everything the client knows about the server state, plus which project
/// is expanded in the list.
#[derive(Debug, Clone, Default)]
pub struct Caches {
    pub projects: Vec<Project>,
    pub completed: HashMap<String, bool>,
    pub uploads: HashMap<String, UploadView>,
    pub expanded: Option<DbId>,
}

type SharedCaches = Arc<RwLock<Caches>>;

fn read(caches: &SharedCaches) -> RwLockReadGuard<'_, Caches> {
    caches.read().unwrap_or_else(PoisonError::into_inner)
}

fn write(caches: &SharedCaches) -> RwLockWriteGuard<'_, Caches> {
    caches.write().unwrap_or_else(PoisonError::into_inner)
}

/// The client application state.
///
/// Completion toggles are optimistic; every other mutation waits for the
/// server and only then touches the caches.
#[derive(Debug, Clone)]
pub struct Portfolio {
    api: ApiClient,
    caches: SharedCaches,
}

impl Portfolio {
    /// Fetch projects, completion flags and uploads concurrently.
    pub async fn load(api: ApiClient) -> ClientResult<Self> {
        let portfolio = Self {
            api,
            caches: SharedCaches::default(),
        };
        portfolio.refresh().await?;
        Ok(portfolio)
    }

    /// Re-fetch all three collections, keeping the expanded project.
    pub async fn refresh(&self) -> ClientResult<()> {
        let (projects, completed, uploads) = tokio::try_join!(
            self.api.list_projects(),
            self.api.list_completed(),
            self.api.list_uploads(),
        )?;

        let mut caches = write(&self.caches);
        caches.projects = projects;
        caches.completed = completed.into_iter().collect();
        caches.uploads = uploads.into_iter().collect();
        tracing::debug!(
            projects = caches.projects.len(),
            completed = caches.completed.len(),
            uploads = caches.uploads.len(),
            "Portfolio loaded"
        );
        Ok(())
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Copy of the current caches.
    pub fn snapshot(&self) -> Caches {
        read(&self.caches).clone()
    }

    pub fn projects(&self) -> Vec<Project> {
        read(&self.caches).projects.clone()
    }

    pub fn is_completed(&self, key: &ModuleKey) -> bool {
        read(&self.caches)
            .completed
            .get(&key.to_string())
            .copied()
            .unwrap_or(false)
    }

    pub fn upload_for(&self, key: &ModuleKey) -> Option<UploadView> {
        read(&self.caches).uploads.get(&key.to_string()).cloned()
    }

    // -----------------------------------------------------------------------
    // Completion
    // -----------------------------------------------------------------------

    /// Flip the flag locally, then send the toggle on a background task.
    ///
    /// On success the cache takes the server's value and on failure the undo
    /// step restores the previous value. Either way the cache is left alone
    /// once a later toggle of the same key has changed it. Dropping the
    /// returned handle does not stop the request.
    pub fn toggle_completion(&self, key: &ModuleKey) -> PendingToggle {
        let key = key.to_string();

        let (previous, optimistic) = {
            let mut caches = write(&self.caches);
            let previous = caches.completed.get(&key).copied().unwrap_or(false);
            caches.completed.insert(key.clone(), !previous);
            (previous, !previous)
        };

        let undo: Box<dyn FnOnce() + Send> = {
            let caches = Arc::clone(&self.caches);
            let key = key.clone();
            Box::new(move || {
                let mut caches = write(&caches);
                if caches.completed.get(&key).copied() == Some(optimistic) {
                    caches.completed.insert(key, previous);
                }
            })
        };

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_toggle(
            self.api.clone(),
            Arc::clone(&self.caches),
            key.clone(),
            optimistic,
            cancel.clone(),
            undo,
        ));

        PendingToggle {
            module_key: key,
            optimistic,
            cancel,
            handle,
        }
    }

    // -----------------------------------------------------------------------
    // Uploads
    // -----------------------------------------------------------------------

    /// Upload a file for `key` and cache the view the server returns.
    pub async fn upload(
        &self,
        key: &ModuleKey,
        file_name: &str,
        mime_type: &str,
        data: Vec<u8>,
    ) -> ClientResult<UploadView> {
        let response = self
            .api
            .upload(&key.to_string(), file_name, mime_type, data)
            .await?;
        write(&self.caches)
            .uploads
            .insert(response.module_key, response.file.clone());
        Ok(response.file)
    }

    pub async fn delete_upload(&self, key: &ModuleKey) -> ClientResult<()> {
        let key = key.to_string();
        self.api.delete_upload(&key).await?;
        write(&self.caches).uploads.remove(&key);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Projects
    // -----------------------------------------------------------------------

    /// Submit the create form; the created project is appended to the list.
    pub async fn create_project(&self, form: &ProjectForm) -> ClientResult<Project> {
        let request = form.to_request()?;
        let project = self.api.create_project(&request).await?;
        write(&self.caches).projects.push(project.clone());
        tracing::info!(project_id = project.id, name = %project.name, "Project created");
        Ok(project)
    }

    /// Delete a project. Its completion flags and uploads stay cached, as
    /// they stay on the server.
    pub async fn delete_project(&self, id: DbId) -> ClientResult<u64> {
        let deleted = self.api.delete_project(id).await?;
        let mut caches = write(&self.caches);
        caches.projects.retain(|p| p.id != id);
        if caches.expanded == Some(id) {
            caches.expanded = None;
        }
        Ok(deleted)
    }

    // -----------------------------------------------------------------------
    // View
    // -----------------------------------------------------------------------

    /// Expand `id`, or collapse it if it is already expanded. At most one
    /// project is expanded at a time. Returns the expanded project.
    pub fn toggle_expanded(&self, id: DbId) -> Option<DbId> {
        let mut caches = write(&self.caches);
        caches.expanded = if caches.expanded == Some(id) {
            None
        } else {
            Some(id)
        };
        caches.expanded
    }

    /// One row per project, in list order. Only the expanded project
    /// carries module rows.
    pub fn rows(&self) -> Vec<ProjectRow> {
        let caches = read(&self.caches);
        caches
            .projects
            .iter()
            .map(|project| {
                let expanded = caches.expanded == Some(project.id);
                let modules = if expanded {
                    ModuleRow::build(
                        project,
                        |key| caches.completed.get(key).copied().unwrap_or(false),
                        |key| caches.uploads.get(key).cloned(),
                    )
                } else {
                    Vec::new()
                };
                ProjectRow {
                    project: project.clone(),
                    expanded,
                    progress: progress::project_progress(project, &caches.completed),
                    completed_modules: progress::completed_module_count(
                        project,
                        &caches.completed,
                    ),
                    total_modules: project.module_count(),
                    modules,
                }
            })
            .collect()
    }

    pub fn total_progress(&self) -> u32 {
        let caches = read(&self.caches);
        progress::total_progress(&caches.projects, &caches.completed)
    }

    pub fn summary(&self) -> Summary {
        let caches = read(&self.caches);
        progress::summary(
            &caches.projects,
            &caches.completed,
            caches.uploads.keys().map(String::as_str),
        )
    }
}

/// Drive one toggle request and reconcile the cache with its outcome.
async fn run_toggle(
    api: ApiClient,
    caches: SharedCaches,
    key: String,
    optimistic: bool,
    cancel: CancellationToken,
    undo: Box<dyn FnOnce() + Send>,
) -> ClientResult<bool> {
    let result = tokio::select! {
        _ = cancel.cancelled() => Err(ClientError::Cancelled),
        result = api.toggle_completion(&key) => result,
    };

    match result {
        Ok(state) => {
            let mut caches = write(&caches);
            if caches.completed.get(&key).copied() == Some(optimistic) {
                caches.completed.insert(key, state.completed);
            } else {
                tracing::debug!(module_key = %key, "Stale toggle response, keeping newer value");
            }
            Ok(state.completed)
        }
        Err(ClientError::Cancelled) => {
            tracing::debug!(module_key = %key, "Toggle cancelled, keeping local value");
            Err(ClientError::Cancelled)
        }
        Err(err) => {
            tracing::warn!(module_key = %key, error = %err, "Toggle failed, reverting");
            undo();
            Err(err)
        }
    }
}

/// An in-flight optimistic toggle.
#[derive(Debug)]
pub struct PendingToggle {
    module_key: String,
    optimistic: bool,
    cancel: CancellationToken,
    handle: JoinHandle<ClientResult<bool>>,
}

impl PendingToggle {
    pub fn module_key(&self) -> &str {
        &self.module_key
    }

    /// The value shown locally while the request is in flight.
    pub fn optimistic_value(&self) -> bool {
        self.optimistic
    }

    /// Abort the request. The optimistic value stays in the cache; the
    /// server may or may not have applied the toggle.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait for the server's value. The cache has already been reconciled
    /// (or reverted) when this returns.
    pub async fn wait(self) -> ClientResult<bool> {
        self.handle
            .await
            .map_err(|e| ClientError::Task(e.to_string()))?
    }
}
