use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use folio_blob::BlobError;
use folio_core::error::CoreError;
use folio_store::StoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors, the store and blob layer errors,
/// and adds HTTP-specific variants. Implements [`IntoResponse`] to produce
/// consistent `{"error", "code"}` JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `folio_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Reading or writing records failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Storing or deleting upload bytes failed.
    #[error(transparent)]
    Blob(#[from] BlobError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The request body exceeded the configured limit.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(err.body_text())
        } else {
            AppError::BadRequest(err.body_text())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Storage errors ---
            AppError::Store(err) => {
                tracing::error!(error = %err, "Store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORE_ERROR",
                    store_message(err),
                )
            }
            AppError::Blob(BlobError::InvalidContentType(mime)) => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                format!("Invalid content type '{mime}'"),
            ),
            AppError::Blob(err) => {
                tracing::error!(error = %err, "Blob service error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "BLOB_ERROR",
                    blob_message(err),
                )
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg.clone())
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Client-facing description of a store failure. Names the failing layer
/// without echoing file paths or SQL.
fn store_message(err: &StoreError) -> String {
    match err {
        StoreError::Database(_) => "Database operation failed".to_string(),
        StoreError::Io { source, .. } => format!("Failed to write data file: {source}"),
        StoreError::Json { .. } => "Data file is malformed".to_string(),
    }
}

fn blob_message(err: &BlobError) -> String {
    match err {
        BlobError::Io { source, .. } => format!("Failed to store file: {source}"),
        BlobError::Request(_) => "File storage provider is unreachable".to_string(),
        BlobError::Provider { status, message } => {
            format!("File storage provider rejected the request ({status}): {message}")
        }
        BlobError::InvalidContentType(mime) => format!("Invalid content type '{mime}'"),
        BlobError::InvalidReference(reference) => format!("Invalid file reference '{reference}'"),
    }
}
