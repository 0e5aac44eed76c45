//! Shared fixtures for the HTTP integration tests.
//!
//! Every test app runs on a JSON data file and a local upload directory
//! inside its own temporary directory, so tests never share state.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use folio_api::config::{BlobConfig, ServerConfig, StoreConfig};
use folio_api::router::build_app_router;
use folio_api::state::AppState;
use folio_blob::LocalBlobService;
use folio_store::JsonFileStore;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

pub const BOUNDARY: &str = "folio-test-boundary";

/// A running application plus the temporary directory backing it.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub dir: TempDir,
}

impl TestApp {
    /// Fresh clone of the router; `oneshot` consumes it.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    pub fn data_file(&self) -> PathBuf {
        self.dir.path().join("data.json")
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.dir.path().join("uploads")
    }
}

/// Build a test `ServerConfig` rooted at `dir`.
pub fn test_config(dir: &TempDir, max_upload_bytes: usize) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes,
        store: StoreConfig::Json {
            data_file: dir.path().join("data.json"),
            seed_demo_data: false,
        },
        blob: BlobConfig::Local {
            upload_dir: dir.path().join("uploads"),
            public_base_url: "http://localhost:3005".to_string(),
        },
    }
}

/// Build the full application router with all middleware layers.
pub async fn build_test_app() -> TestApp {
    build_test_app_with_limit(10 * 1024 * 1024).await
}

pub async fn build_test_app_with_limit(max_upload_bytes: usize) -> TestApp {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, max_upload_bytes);

    let store = JsonFileStore::open(dir.path().join("data.json"))
        .await
        .unwrap();
    let blobs = LocalBlobService::open(dir.path().join("uploads"), "http://localhost:3005")
        .await
        .unwrap();

    let state = AppState {
        store: Arc::new(store),
        blobs: Arc::new(blobs),
        config: Arc::new(config.clone()),
    };
    let router = build_app_router(state.clone(), &config);

    TestApp { router, state, dir }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// One part of a multipart form.
pub enum Part<'a> {
    Text {
        name: &'a str,
        value: &'a str,
    },
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        data: &'a [u8],
    },
}

/// Encode `parts` as a `multipart/form-data` body using [`BOUNDARY`].
pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn post_multipart(app: Router, uri: &str, parts: &[Part<'_>]) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Upload `data` as a PNG for `module_key`.
pub async fn upload_png(app: Router, module_key: &str, file_name: &str, data: &[u8]) -> Response {
    post_multipart(
        app,
        "/api/upload",
        &[
            Part::Text {
                name: "moduleKey",
                value: module_key,
            },
            Part::File {
                name: "file",
                file_name,
                content_type: "image/png",
                data,
            },
        ],
    )
    .await
}
