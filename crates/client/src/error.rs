use folio_core::error::CoreError;

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Input rejected before any request was sent.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The request never produced a usable response (connect, timeout, body).
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Server returned HTTP {status}: {message}")]
    Api {
        status: u16,
        /// Machine-readable `code` from the error body, when present.
        code: Option<String>,
        message: String,
    },

    /// The base URL cannot have path segments appended.
    #[error("Invalid API base URL '{0}'")]
    InvalidBaseUrl(String),

    /// A pending request was cancelled before it completed.
    #[error("Request cancelled")]
    Cancelled,

    /// The background task driving a request panicked or was aborted.
    #[error("Background task failed: {0}")]
    Task(String),
}

pub type ClientResult<T> = Result<T, ClientError>;
