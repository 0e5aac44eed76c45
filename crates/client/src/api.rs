//! Typed wrapper over the HTTP routes.

use std::time::Duration;

use folio_core::project::{CreateProject, Project};
use folio_core::types::DbId;
use folio_core::upload::{
    CompletionMap, CompletionState, ToggleCompletion, UploadMap, UploadResponse,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{ClientError, ClientResult};

/// Default base URL of a locally running API.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3005/api";

/// Timeout for a single request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeletedBody {
    deleted: u64,
}

/// HTTP client for one API base URL (e.g. `http://localhost:3005/api`).
///
/// Cheap to clone: clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Self::with_client(http, base_url)
    }

    /// Use an existing `reqwest` client (shared pool, custom settings).
    pub fn with_client(http: reqwest::Client, base_url: &str) -> ClientResult<Self> {
        let base =
            Url::parse(base_url).map_err(|_| ClientError::InvalidBaseUrl(base_url.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `base` with `segments` appended, each percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidBaseUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET /projects
    pub async fn list_projects(&self) -> ClientResult<Vec<Project>> {
        let response = self.http.get(self.endpoint(&["projects"])?).send().await?;
        parse(response).await
    }

    /// POST /projects
    pub async fn create_project(&self, input: &CreateProject) -> ClientResult<Project> {
        let response = self
            .http
            .post(self.endpoint(&["projects"])?)
            .json(input)
            .send()
            .await?;
        parse(response).await
    }

    /// DELETE /projects/{id}, returning how many projects were removed.
    pub async fn delete_project(&self, id: DbId) -> ClientResult<u64> {
        let response = self
            .http
            .delete(self.endpoint(&["projects", &id.to_string()])?)
            .send()
            .await?;
        let body: DeletedBody = parse(response).await?;
        Ok(body.deleted)
    }

    /// GET /completed
    pub async fn list_completed(&self) -> ClientResult<CompletionMap> {
        let response = self.http.get(self.endpoint(&["completed"])?).send().await?;
        parse(response).await
    }

    /// POST /completed/toggle
    pub async fn toggle_completion(&self, module_key: &str) -> ClientResult<CompletionState> {
        let body = ToggleCompletion {
            module_key: module_key.to_string(),
        };
        let response = self
            .http
            .post(self.endpoint(&["completed", "toggle"])?)
            .json(&body)
            .send()
            .await?;
        parse(response).await
    }

    /// GET /uploads
    pub async fn list_uploads(&self) -> ClientResult<UploadMap> {
        let response = self.http.get(self.endpoint(&["uploads"])?).send().await?;
        parse(response).await
    }

    /// POST /upload (multipart `file` + `moduleKey`)
    pub async fn upload(
        &self,
        module_key: &str,
        file_name: &str,
        mime_type: &str,
        data: Vec<u8>,
    ) -> ClientResult<UploadResponse> {
        let file = Part::bytes(data)
            .file_name(file_name.to_string())
            .mime_str(mime_type)?;
        let form = Form::new()
            .text("moduleKey", module_key.to_string())
            .part("file", file);

        let response = self
            .http
            .post(self.endpoint(&["upload"])?)
            .multipart(form)
            .send()
            .await?;
        parse(response).await
    }

    /// DELETE /upload/{module_key}
    pub async fn delete_upload(&self, module_key: &str) -> ClientResult<()> {
        let response = self
            .http
            .delete(self.endpoint(&["upload", module_key])?)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}

/// Turn a non-success response into [`ClientError::Api`].
async fn check(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    let (message, code) = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => (body.error, body.code),
        Err(_) => (text, None),
    };
    Err(ClientError::Api {
        status: status.as_u16(),
        code,
        message,
    })
}

async fn parse<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    Ok(check(response).await?.json().await?)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn endpoints_encode_module_keys() {
        let client = ApiClient::new("http://localhost:3005/api/").unwrap();
        let url = client.endpoint(&["upload", "1-MODULO DE ORDENES"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3005/api/upload/1-MODULO%20DE%20ORDENES"
        );
    }

    #[test]
    fn base_without_trailing_slash() {
        let client = ApiClient::new(DEFAULT_BASE_URL).unwrap();
        let url = client.endpoint(&["completed", "toggle"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3005/api/completed/toggle");
    }

    #[test]
    fn rejects_unusable_base_url() {
        assert_matches!(
            ApiClient::new("not a url"),
            Err(ClientError::InvalidBaseUrl(_))
        );
        assert_matches!(
            ApiClient::new("mailto:someone@example.com"),
            Err(ClientError::InvalidBaseUrl(_))
        );
    }
}
