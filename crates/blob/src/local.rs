//! Blob storage in a local upload directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use folio_core::naming::{blob_reference, file_extension, is_safe_reference};
use tokio::io::AsyncWriteExt;

use crate::{BlobError, BlobMeta, BlobResult, BlobService, StoredBlob};

/// Attempts at finding an unused file name before giving up. Each attempt
/// bumps the millisecond component of the reference.
const MAX_NAME_ATTEMPTS: i64 = 16;

/// Stores files under `dir`; URLs point at `{public_base_url}/uploads/{reference}`.
#[derive(Debug, Clone)]
pub struct LocalBlobService {
    dir: PathBuf,
    public_base_url: String,
}

impl LocalBlobService {
    /// Create the service, creating `dir` if needed.
    pub async fn open(dir: impl Into<PathBuf>, public_base_url: &str) -> BlobResult<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| BlobError::Io {
                path: dir.clone(),
                source,
            })?;
        Ok(Self {
            dir,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, reference: &str) -> BlobResult<PathBuf> {
        if !is_safe_reference(reference) {
            return Err(BlobError::InvalidReference(reference.to_string()));
        }
        Ok(self.dir.join(reference))
    }
}

#[async_trait]
impl BlobService for LocalBlobService {
    fn backend_name(&self) -> &'static str {
        "local"
    }

    async fn store(&self, data: Vec<u8>, meta: BlobMeta<'_>) -> BlobResult<StoredBlob> {
        let ext = file_extension(meta.original_name);
        let millis = chrono::Utc::now().timestamp_millis();

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let reference = blob_reference(meta.suggested_key, millis + attempt, ext.as_deref());
            let path = self.path_for(&reference)?;

            // `create_new` refuses to overwrite, so two uploads in the same
            // millisecond cannot share a file.
            let mut file = match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(source) => return Err(BlobError::Io { path, source }),
            };

            let written: std::io::Result<()> = async {
                file.write_all(&data).await?;
                file.flush().await
            }
            .await;
            if let Err(source) = written {
                let _ = tokio::fs::remove_file(&path).await;
                return Err(BlobError::Io { path, source });
            }

            tracing::debug!(reference = %reference, bytes = data.len(), "Blob stored locally");
            let url = self.retrieval_url(&reference);
            return Ok(StoredBlob { reference, url });
        }

        Err(BlobError::Io {
            path: self.dir.clone(),
            source: std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "no free file name for upload",
            ),
        })
    }

    async fn delete(&self, reference: &str) -> BlobResult<()> {
        let path = self.path_for(reference)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(reference, "Blob deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(reference, "Blob already absent, nothing to delete");
                Ok(())
            }
            Err(source) => Err(BlobError::Io { path, source }),
        }
    }

    fn retrieval_url(&self, reference: &str) -> String {
        format!("{}/uploads/{reference}", self.public_base_url)
    }

    fn static_dir(&self) -> Option<&Path> {
        Some(&self.dir)
    }
}
