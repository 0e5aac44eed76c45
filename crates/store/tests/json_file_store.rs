//! Integration tests for the file-backed store.
//!
//! Every test works on a data file inside its own temporary directory.

use std::sync::Arc;

use assert_matches::assert_matches;
use folio_core::project::{CreateProject, NewProject};
use folio_core::upload::NewUpload;
use folio_store::seed::demo_projects;
use folio_store::{JsonFileStore, Store, StoreError};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn open_store(dir: &TempDir) -> JsonFileStore {
    JsonFileStore::open(dir.path().join("data.json")).await.unwrap()
}

fn new_project(name: &str, modules: &[&str]) -> NewProject {
    CreateProject {
        name: name.to_string(),
        project_type: None,
        area: None,
        modules: Some(modules.iter().map(|m| m.to_string()).collect()),
    }
    .validate()
    .unwrap()
}

fn new_upload(reference: &str) -> NewUpload {
    NewUpload {
        reference: reference.to_string(),
        original_name: "proof.png".to_string(),
        mime_type: "image/png".to_string(),
        retrieval_url: format!("http://localhost:3005/uploads/{reference}"),
        size_bytes: 3,
    }
}

// ---------------------------------------------------------------------------
// Opening
// ---------------------------------------------------------------------------

#[tokio::test]
async fn open_creates_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("data.json");

    let store = JsonFileStore::open(&path).await.unwrap();

    assert!(path.exists());
    assert!(store.list_projects().await.unwrap().is_empty());
}

#[tokio::test]
async fn open_with_seed_writes_demo_projects_once() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.json");

    let store = JsonFileStore::open_with_seed(&path, demo_projects())
        .await
        .unwrap();
    assert_eq!(store.list_projects().await.unwrap().len(), 6);
    store.delete_project(1).await.unwrap();
    drop(store);

    // An existing file is never re-seeded.
    let reopened = JsonFileStore::open_with_seed(&path, demo_projects())
        .await
        .unwrap();
    assert_eq!(reopened.list_projects().await.unwrap().len(), 5);
}

#[tokio::test]
async fn open_rejects_corrupt_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.json");
    std::fs::write(&path, "{ not json").unwrap();

    let result = JsonFileStore::open(&path).await;

    assert_matches!(result, Err(StoreError::Json { .. }));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
}

#[tokio::test]
async fn open_accepts_file_with_projects_missing_type() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.json");
    std::fs::write(
        &path,
        r#"{"projects":[{"id":1,"name":"X","area":"Sistemas","modules":[]}],"completedModules":{},"uploads":{}}"#,
    )
    .unwrap();

    let store = JsonFileStore::open(&path).await.unwrap();

    let projects = store.list_projects().await.unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].name, "X");
    assert_eq!(projects[0].project_type, "REPORTE");
}

#[tokio::test]
async fn mutations_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let project = store
        .create_project(new_project("A", &["X"]))
        .await
        .unwrap();
    store.toggle_completion("1-X").await.unwrap();
    store.upsert_upload("1-X", new_upload("r1")).await.unwrap();
    drop(store);

    let reopened = open_store(&dir).await;
    assert_eq!(reopened.list_projects().await.unwrap(), vec![project]);
    assert_eq!(reopened.list_completion_flags().await.unwrap()["1-X"], true);
    assert_eq!(reopened.list_uploads().await.unwrap()["1-X"].reference, "r1");
}

#[tokio::test]
async fn file_uses_documented_top_level_keys() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    store.create_project(new_project("A", &[])).await.unwrap();

    let raw = std::fs::read_to_string(store.path()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(json["projects"].is_array());
    assert!(json["completedModules"].is_object());
    assert!(json["uploads"].is_object());
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ids_are_max_plus_one_and_restart_when_empty() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    let a = store.create_project(new_project("A", &[])).await.unwrap();
    let b = store.create_project(new_project("B", &[])).await.unwrap();
    assert_eq!((a.id, b.id), (1, 2));

    assert_eq!(store.delete_project(1).await.unwrap(), 1);
    let c = store.create_project(new_project("C", &[])).await.unwrap();
    assert_eq!(c.id, 3);

    store.delete_project(2).await.unwrap();
    store.delete_project(3).await.unwrap();
    let d = store.create_project(new_project("D", &[])).await.unwrap();
    assert_eq!(d.id, 1);
}

#[tokio::test]
async fn delete_missing_project_reports_zero() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    assert_eq!(store.delete_project(42).await.unwrap(), 0);
}

#[tokio::test]
async fn delete_project_keeps_orphaned_records() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let p = store.create_project(new_project("A", &["X"])).await.unwrap();
    let key = format!("{}-X", p.id);
    store.toggle_completion(&key).await.unwrap();
    store.upsert_upload(&key, new_upload("r1")).await.unwrap();

    store.delete_project(p.id).await.unwrap();

    assert_eq!(store.list_completion_flags().await.unwrap()[&key], true);
    assert!(store.list_uploads().await.unwrap().contains_key(&key));
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

#[tokio::test]
async fn toggle_n_times_is_odd_parity() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    for n in 1..=6 {
        let completed = store.toggle_completion("2-main").await.unwrap();
        assert_eq!(completed, n % 2 == 1, "after {n} toggles");
    }
    // False flags are kept in the file backend.
    assert_eq!(store.list_completion_flags().await.unwrap()["2-main"], false);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_toggles_are_not_lost() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(open_store(&dir).await);

    let handles: Vec<_> = (0..25)
        .map(|_| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.toggle_completion("1-A").await.unwrap() })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    // 25 flips from absent: odd count, ends true.
    assert_eq!(store.list_completion_flags().await.unwrap()["1-A"], true);
    let on_disk = open_store(&dir).await;
    assert_eq!(on_disk.list_completion_flags().await.unwrap()["1-A"], true);
}

// ---------------------------------------------------------------------------
// Uploads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upsert_twice_keeps_one_record_and_reports_replaced() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    let first = store.upsert_upload("1-A", new_upload("r1")).await.unwrap();
    assert!(first.replaced.is_none());

    let second = store.upsert_upload("1-A", new_upload("r2")).await.unwrap();
    assert_eq!(second.current.reference, "r2");
    assert_eq!(second.replaced.unwrap().reference, "r1");

    let uploads = store.list_uploads().await.unwrap();
    assert_eq!(uploads.len(), 1);
    assert_eq!(
        uploads["1-A"].retrieval_url,
        "http://localhost:3005/uploads/r2"
    );
}

#[tokio::test]
async fn delete_missing_upload_is_noop() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    assert!(store.delete_upload("9-main").await.unwrap().is_none());
}

#[tokio::test]
async fn delete_upload_returns_removed_record() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    store.upsert_upload("1-A", new_upload("r1")).await.unwrap();

    let removed = store.delete_upload("1-A").await.unwrap();

    assert_eq!(removed.unwrap().reference, "r1");
    assert!(store.list_uploads().await.unwrap().is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn failed_flush_leaves_state_unchanged() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    store.create_project(new_project("A", &[])).await.unwrap();

    // Read-only directory: the temp file cannot be created.
    std::fs::set_permissions(dir.path(), std::fs::Permissions::from_mode(0o555)).unwrap();
    let result = store.create_project(new_project("B", &[])).await;
    std::fs::set_permissions(dir.path(), std::fs::Permissions::from_mode(0o755)).unwrap();

    // Root ignores directory permissions; only assert when the write failed.
    if result.is_err() {
        assert_matches!(result, Err(StoreError::Io { .. }));
        assert_eq!(store.list_projects().await.unwrap().len(), 1);
    }
}
