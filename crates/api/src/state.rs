use std::sync::Arc;

use folio_blob::BlobService;
use folio_store::Store;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Project, completion and upload records.
    pub store: Arc<dyn Store>,
    /// Upload file bytes.
    pub blobs: Arc<dyn BlobService>,
    pub config: Arc<ServerConfig>,
}
