//! Upload records, completion payloads and the client-facing views of both.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// Mapping from module key to completion flag, as served by `GET /completed`.
pub type CompletionMap = BTreeMap<String, bool>;

/// Mapping from module key to upload view, as served by `GET /uploads`.
pub type UploadMap = BTreeMap<String, UploadView>;

/// Request body for `POST /completed/toggle`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleCompletion {
    #[serde(default)]
    pub module_key: String,
}

/// Completion state after a toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionState {
    pub module_key: String,
    pub completed: bool,
}

/// The single proof-of-completion file attached to a module key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upload {
    pub module_key: String,
    /// Opaque handle the blob service uses to locate the stored bytes.
    pub reference: String,
    pub original_name: String,
    pub mime_type: String,
    /// Absolute URL of the currently stored blob.
    pub retrieval_url: String,
    pub size_bytes: i64,
    pub uploaded_at: Timestamp,
}

impl Upload {
    pub fn view(&self) -> UploadView {
        UploadView {
            name: self.original_name.clone(),
            preview: self.retrieval_url.clone(),
            mime_type: self.mime_type.clone(),
        }
    }
}

/// Metadata for a new or replacement upload, after the blob is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUpload {
    pub reference: String,
    pub original_name: String,
    pub mime_type: String,
    pub retrieval_url: String,
    pub size_bytes: i64,
}

impl NewUpload {
    pub fn into_upload(self, module_key: &str, uploaded_at: Timestamp) -> Upload {
        Upload {
            module_key: module_key.to_string(),
            reference: self.reference,
            original_name: self.original_name,
            mime_type: self.mime_type,
            retrieval_url: self.retrieval_url,
            size_bytes: self.size_bytes,
            uploaded_at,
        }
    }
}

/// Result of an upsert: the stored record plus the one it replaced, whose
/// blob the caller is responsible for cleaning up.
#[derive(Debug, Clone)]
pub struct UpsertedUpload {
    pub current: Upload,
    pub replaced: Option<Upload>,
}

/// What the client renders for an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadView {
    pub name: String,
    pub preview: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

/// Response body for `POST /upload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub module_key: String,
    pub file: UploadView,
}
