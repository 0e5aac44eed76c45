//! Binary storage for upload files.
//!
//! [`BlobService`] stores the bytes of an upload and hands back a stable
//! reference plus the URL clients use to fetch it. Two implementations:
//!
//! - [`LocalBlobService`]: files in an upload directory, served by the API
//!   process under `/uploads/*`.
//! - [`CloudinaryBlobService`]: signed REST calls to a Cloudinary-style
//!   image host, which returns a CDN URL.

pub mod cloudinary;
pub mod error;
pub mod local;

use std::path::Path;

use async_trait::async_trait;

pub use cloudinary::{CloudinaryBlobService, CloudinaryConfig};
pub use error::{BlobError, BlobResult};
pub use local::LocalBlobService;

/// Metadata accompanying the bytes of a new blob.
#[derive(Debug, Clone)]
pub struct BlobMeta<'a> {
    pub mime_type: &'a str,
    /// Module key the blob belongs to; used as the reference prefix.
    pub suggested_key: &'a str,
    /// Client-supplied file name. Only its extension is used.
    pub original_name: &'a str,
}

/// A stored blob: the opaque reference and where to fetch it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub reference: String,
    pub url: String,
}

#[async_trait]
pub trait BlobService: Send + Sync {
    /// Short name for logs and the health endpoint.
    fn backend_name(&self) -> &'static str;

    /// Store `data` under a fresh reference. Repeated calls for the same
    /// key never reuse a reference.
    async fn store(&self, data: Vec<u8>, meta: BlobMeta<'_>) -> BlobResult<StoredBlob>;

    /// Delete a blob. Deleting a reference that does not exist succeeds.
    async fn delete(&self, reference: &str) -> BlobResult<()>;

    /// URL for a reference.
    fn retrieval_url(&self, reference: &str) -> String;

    /// Directory to expose under `/uploads`, for backends served by this process.
    fn static_dir(&self) -> Option<&Path> {
        None
    }
}
