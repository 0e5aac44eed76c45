//! The same routes on the PostgreSQL store.
//!
//! Each test gets a fresh database with the `folio-db` migrations applied.

mod common;

use std::sync::Arc;

use axum::Router;
use common::{body_json, delete, get, post_json, test_config, upload_png};
use folio_api::router::build_app_router;
use folio_api::state::AppState;
use folio_blob::LocalBlobService;
use folio_store::PgStore;
use serde_json::json;
use sqlx::PgPool;
use tempfile::TempDir;

async fn build_pg_app(pool: PgPool, dir: &TempDir) -> Router {
    let config = test_config(dir, 1024 * 1024);
    let blobs = LocalBlobService::open(dir.path().join("uploads"), "http://localhost:3005")
        .await
        .unwrap();
    let state = AppState {
        store: Arc::new(PgStore::new(pool)),
        blobs: Arc::new(blobs),
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

#[sqlx::test(migrations = "../db/migrations")]
async fn health_reports_postgres_backend(pool: PgPool) {
    let dir = TempDir::new().unwrap();
    let app = build_pg_app(pool, &dir).await;

    let json = body_json(get(app, "/health").await).await;
    assert_eq!(json["store_backend"], "postgres");
    assert_eq!(json["store_healthy"], true);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn ids_come_from_sequence_and_do_not_restart(pool: PgPool) {
    let dir = TempDir::new().unwrap();
    let app = build_pg_app(pool, &dir).await;

    let a = body_json(post_json(app.clone(), "/api/projects", json!({"name": "A"})).await).await;
    let id = a["id"].as_i64().unwrap();
    assert_eq!(a["area"], "Sistemas");

    let deleted = body_json(delete(app.clone(), &format!("/api/projects/{id}")).await).await;
    assert_eq!(deleted, json!({"deleted": 1}));

    let b = body_json(post_json(app, "/api/projects", json!({"name": "B"})).await).await;
    assert!(b["id"].as_i64().unwrap() > id);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn completion_list_omits_flags_toggled_off(pool: PgPool) {
    let dir = TempDir::new().unwrap();
    let app = build_pg_app(pool, &dir).await;

    for _ in 0..2 {
        post_json(app.clone(), "/api/completed/toggle", json!({"moduleKey": "1-A"})).await;
    }
    let third = body_json(
        post_json(app.clone(), "/api/completed/toggle", json!({"moduleKey": "1-B"})).await,
    )
    .await;
    assert_eq!(third["completed"], true);

    let json = body_json(get(app, "/api/completed").await).await;
    assert_eq!(json, json!({"1-B": true}));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn reupload_keeps_one_record(pool: PgPool) {
    let dir = TempDir::new().unwrap();
    let app = build_pg_app(pool, &dir).await;

    upload_png(app.clone(), "1-A", "a.png", b"a").await;
    upload_png(app.clone(), "1-A", "b.png", b"b").await;

    let uploads = body_json(get(app, "/api/uploads").await).await;
    assert_eq!(uploads.as_object().unwrap().len(), 1);
    assert_eq!(uploads["1-A"]["name"], "b.png");
    assert_eq!(std::fs::read_dir(dir.path().join("uploads")).unwrap().count(), 1);
}
