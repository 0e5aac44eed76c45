//! Handlers for proof-of-completion uploads.
//!
//! The blob service owns the bytes, the store owns the record. The two are
//! not written atomically: a replaced or deleted record's blob is removed
//! afterwards on a best-effort basis, and a blob whose record could not be
//! written is removed again.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use folio_blob::BlobMeta;
use folio_core::upload::{NewUpload, Upload, UploadMap, UploadResponse, UploadView};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::handlers::checked_module_key;
use crate::state::AppState;

/// Content type recorded when the client sends none.
const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Response body for `DELETE /api/upload/{module_key}`.
#[derive(Debug, Serialize)]
pub struct DeleteUploadResponse {
    pub success: bool,
}

/// The `file` part of an upload form.
struct IncomingFile {
    original_name: String,
    mime_type: String,
    data: Vec<u8>,
}

/// GET /api/uploads
pub async fn list(State(state): State<AppState>) -> AppResult<Json<UploadMap>> {
    let uploads = state.store.list_uploads().await?;
    let views = uploads
        .into_iter()
        .map(|(key, upload)| {
            let view = view_of(&state, &upload);
            (key, view)
        })
        .collect();
    Ok(Json(views))
}

/// POST /api/upload
///
/// Multipart form with a `file` part and a `moduleKey` field. Replaces any
/// upload already stored under the key.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let mut file: Option<IncomingFile> = None;
    let mut module_key: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let original_name = field.file_name().unwrap_or("upload").to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or(FALLBACK_MIME_TYPE)
                    .to_string();
                let data = field.bytes().await?;
                file = Some(IncomingFile {
                    original_name,
                    mime_type,
                    data: data.to_vec(),
                });
            }
            "moduleKey" => {
                module_key = Some(field.text().await?);
            }
            _ => {} // ignore unknown fields
        }
    }

    let file = file.ok_or_else(|| AppError::BadRequest("No file uploaded".into()))?;
    let raw_key =
        module_key.ok_or_else(|| AppError::BadRequest("Missing required 'moduleKey' field".into()))?;
    let key = checked_module_key(raw_key)?;

    let size_bytes = file.data.len() as i64;
    let stored = state
        .blobs
        .store(
            file.data,
            BlobMeta {
                mime_type: &file.mime_type,
                suggested_key: &key,
                original_name: &file.original_name,
            },
        )
        .await?;

    let input = NewUpload {
        reference: stored.reference.clone(),
        original_name: file.original_name,
        mime_type: file.mime_type,
        retrieval_url: stored.url,
        size_bytes,
    };
    let upserted = match state.store.upsert_upload(&key, input).await {
        Ok(upserted) => upserted,
        Err(err) => {
            discard_blob(&state, &stored.reference).await;
            return Err(err.into());
        }
    };

    if let Some(replaced) = &upserted.replaced {
        if replaced.reference != upserted.current.reference {
            discard_blob(&state, &replaced.reference).await;
        }
    }

    tracing::info!(
        module_key = %key,
        reference = %upserted.current.reference,
        size_bytes,
        replaced = upserted.replaced.is_some(),
        "Upload stored"
    );

    Ok(Json(UploadResponse {
        module_key: key,
        file: view_of(&state, &upserted.current),
    }))
}

/// DELETE /api/upload/{module_key}
///
/// Succeeds whether or not an upload exists for the key.
pub async fn delete(
    State(state): State<AppState>,
    Path(module_key): Path<String>,
) -> AppResult<Json<DeleteUploadResponse>> {
    match state.store.delete_upload(&module_key).await? {
        Some(removed) => {
            discard_blob(&state, &removed.reference).await;
            tracing::info!(module_key = %module_key, "Upload deleted");
        }
        None => tracing::debug!(module_key = %module_key, "Delete of missing upload"),
    }
    Ok(Json(DeleteUploadResponse { success: true }))
}

/// Client view of a record. Records written before URLs were persisted get
/// theirs from the blob service.
fn view_of(state: &AppState, upload: &Upload) -> UploadView {
    let mut view = upload.view();
    if view.preview.is_empty() {
        view.preview = state.blobs.retrieval_url(&upload.reference);
    }
    view
}

/// Delete a blob whose record is gone; failures are logged, not returned.
async fn discard_blob(state: &AppState, reference: &str) {
    if let Err(err) = state.blobs.delete(reference).await {
        tracing::warn!(reference, error = %err, "Failed to delete superseded blob");
    }
}
