use std::path::PathBuf;

/// Error type for blob storage operations.
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    /// Reading or writing the upload directory failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP request to the remote provider failed (network, DNS, timeout, body).
    #[error("Blob provider request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote provider answered with an error.
    #[error("Blob provider returned HTTP {status}: {message}")]
    Provider { status: u16, message: String },

    /// The upload's content type is not a valid MIME type.
    #[error("Invalid content type '{0}'")]
    InvalidContentType(String),

    /// A reference that cannot name a blob of this backend.
    #[error("Invalid blob reference '{0}'")]
    InvalidReference(String),
}

pub type BlobResult<T> = Result<T, BlobError>;
