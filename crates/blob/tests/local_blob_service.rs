//! Integration tests for the local-disk blob service.

use assert_matches::assert_matches;
use folio_blob::{BlobError, BlobMeta, BlobService, LocalBlobService};
use tempfile::TempDir;

fn meta<'a>(key: &'a str, name: &'a str) -> BlobMeta<'a> {
    BlobMeta {
        mime_type: "image/png",
        suggested_key: key,
        original_name: name,
    }
}

async fn service(dir: &TempDir) -> LocalBlobService {
    LocalBlobService::open(dir.path().join("uploads"), "http://localhost:3005/")
        .await
        .unwrap()
}

#[tokio::test]
async fn open_creates_upload_dir() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir).await;
    assert!(svc.dir().is_dir());
    assert_eq!(svc.static_dir(), Some(svc.dir()));
}

#[tokio::test]
async fn store_writes_file_and_builds_url() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir).await;

    let stored = svc
        .store(b"png-bytes".to_vec(), meta("1-MODULO A", "proof.PNG"))
        .await
        .unwrap();

    assert!(stored.reference.starts_with("1-MODULO_A_"));
    assert!(stored.reference.ends_with(".png"));
    assert_eq!(
        stored.url,
        format!("http://localhost:3005/uploads/{}", stored.reference)
    );
    let on_disk = std::fs::read(svc.dir().join(&stored.reference)).unwrap();
    assert_eq!(on_disk, b"png-bytes");
}

#[tokio::test]
async fn repeated_stores_for_same_key_get_distinct_references() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir).await;

    let a = svc.store(b"a".to_vec(), meta("1-A", "a.png")).await.unwrap();
    let b = svc.store(b"b".to_vec(), meta("1-A", "b.png")).await.unwrap();

    assert_ne!(a.reference, b.reference);
    assert_ne!(a.url, b.url);
    assert_eq!(std::fs::read(svc.dir().join(&a.reference)).unwrap(), b"a");
    assert_eq!(std::fs::read(svc.dir().join(&b.reference)).unwrap(), b"b");
}

#[tokio::test]
async fn delete_removes_file() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir).await;
    let stored = svc.store(b"x".to_vec(), meta("2-main", "x.jpg")).await.unwrap();

    svc.delete(&stored.reference).await.unwrap();

    assert!(!svc.dir().join(&stored.reference).exists());
}

#[tokio::test]
async fn delete_missing_reference_succeeds() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir).await;
    svc.delete("never-stored_1.png").await.unwrap();
}

#[tokio::test]
async fn traversal_references_are_rejected() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir).await;
    assert_matches!(
        svc.delete("../data.json").await,
        Err(BlobError::InvalidReference(_))
    );
}
