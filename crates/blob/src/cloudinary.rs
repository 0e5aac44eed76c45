//! Blob storage on a Cloudinary-style image host.
//!
//! Uploads and deletes are signed REST calls:
//!
//! ```text
//! POST {api_base}/{cloud_name}/image/upload   multipart: file, api_key, timestamp,
//!                                              folder, public_id, signature,
//!                                              signature_algorithm
//! POST {api_base}/{cloud_name}/image/destroy  form: public_id, api_key, timestamp,
//!                                              signature, signature_algorithm
//! ```
//!
//! The reference stored for an upload is the provider's `public_id`; the
//! retrieval URL is the `secure_url` it returns.

use std::time::Duration;

use async_trait::async_trait;
use folio_core::naming::{blob_reference, sign_params};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::{BlobError, BlobMeta, BlobResult, BlobService, StoredBlob};

/// Default REST endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Default delivery host used by [`BlobService::retrieval_url`].
pub const DEFAULT_DELIVERY_BASE: &str = "https://res.cloudinary.com";

/// Folder uploads are placed in unless configured otherwise.
pub const DEFAULT_FOLDER: &str = "portfolio-manager";

/// Timeout for a single provider request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Credentials and endpoints for the image host.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: String,
    pub api_base: String,
    pub delivery_base: String,
}

impl CloudinaryConfig {
    pub fn new(cloud_name: &str, api_key: &str, api_secret: &str) -> Self {
        Self {
            cloud_name: cloud_name.to_string(),
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
            folder: DEFAULT_FOLDER.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            delivery_base: DEFAULT_DELIVERY_BASE.to_string(),
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/{}/image/{action}",
            self.api_base.trim_end_matches('/'),
            self.cloud_name
        )
    }
}

#[derive(Debug, Deserialize)]
struct UploadResult {
    public_id: String,
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResult {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Remote blob service. Holds a pooled HTTP client.
pub struct CloudinaryBlobService {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryBlobService {
    pub fn new(config: CloudinaryConfig) -> BlobResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, config })
    }

    /// Signed parameters (excluding the file) for an upload of `public_id`.
    pub fn upload_params(&self, public_id: &str, timestamp: i64) -> Vec<(&'static str, String)> {
        let timestamp = timestamp.to_string();
        let signature = sign_params(
            &[
                ("folder", self.config.folder.as_str()),
                ("public_id", public_id),
                ("timestamp", timestamp.as_str()),
            ],
            &self.config.api_secret,
        );
        vec![
            ("api_key", self.config.api_key.clone()),
            ("folder", self.config.folder.clone()),
            ("public_id", public_id.to_string()),
            ("timestamp", timestamp),
            ("signature", signature),
            ("signature_algorithm", "sha256".to_string()),
        ]
    }

    /// Signed parameters for destroying `public_id`.
    pub fn destroy_params(&self, public_id: &str, timestamp: i64) -> Vec<(&'static str, String)> {
        let timestamp = timestamp.to_string();
        let signature = sign_params(
            &[("public_id", public_id), ("timestamp", timestamp.as_str())],
            &self.config.api_secret,
        );
        vec![
            ("api_key", self.config.api_key.clone()),
            ("public_id", public_id.to_string()),
            ("timestamp", timestamp),
            ("signature", signature),
            ("signature_algorithm", "sha256".to_string()),
        ]
    }
}

/// Turn a non-2xx provider response into [`BlobError::Provider`].
async fn provider_error(response: reqwest::Response) -> BlobError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error.message)
        .unwrap_or(text);
    BlobError::Provider { status, message }
}

#[async_trait]
impl BlobService for CloudinaryBlobService {
    fn backend_name(&self) -> &'static str {
        "cloudinary"
    }

    async fn store(&self, data: Vec<u8>, meta: BlobMeta<'_>) -> BlobResult<StoredBlob> {
        let now = chrono::Utc::now();
        let public_id = blob_reference(meta.suggested_key, now.timestamp_millis(), None);

        let file = Part::bytes(data)
            .file_name(meta.original_name.to_string())
            .mime_str(meta.mime_type)
            .map_err(|_| BlobError::InvalidContentType(meta.mime_type.to_string()))?;
        let mut form = Form::new().part("file", file);
        for (name, value) in self.upload_params(&public_id, now.timestamp()) {
            form = form.text(name, value);
        }

        let response = self
            .client
            .post(self.config.endpoint("upload"))
            .multipart(form)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(provider_error(response).await);
        }

        let result: UploadResult = response.json().await?;
        tracing::info!(public_id = %result.public_id, "Blob uploaded to image host");
        Ok(StoredBlob {
            reference: result.public_id,
            url: result.secure_url,
        })
    }

    async fn delete(&self, reference: &str) -> BlobResult<()> {
        let params = self.destroy_params(reference, chrono::Utc::now().timestamp());
        let response = self
            .client
            .post(self.config.endpoint("destroy"))
            .form(&params)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(provider_error(response).await);
        }

        let result: DestroyResult = response.json().await?;
        match result.result.as_str() {
            "ok" => {
                tracing::info!(public_id = reference, "Blob destroyed on image host");
                Ok(())
            }
            "not found" => {
                tracing::warn!(public_id = reference, "Blob already absent on image host");
                Ok(())
            }
            other => Err(BlobError::Provider {
                status: 200,
                message: format!("unexpected destroy result '{other}'"),
            }),
        }
    }

    fn retrieval_url(&self, reference: &str) -> String {
        format!(
            "{}/{}/image/upload/{reference}",
            self.config.delivery_base.trim_end_matches('/'),
            self.config.cloud_name
        )
    }
}
