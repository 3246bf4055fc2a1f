// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::TempDir;

fn store() -> (TempDir, FileKvStore) {
    let dir = TempDir::new().unwrap();
    let store = FileKvStore::new(dir.path().join("store.json"));
    (dir, store)
}

#[tokio::test]
async fn get_missing_key_is_not_found() {
    let (_dir, store) = store();
    let err = store.get("missing").await.unwrap_err();
    assert!(matches!(err, KvError::NotFound(k) if k == "missing"));
}

#[tokio::test]
async fn create_then_get_returns_value_and_version() {
    let (_dir, store) = store();
    let version = store.create("k", "v1").await.unwrap();

    let entry = store.get("k").await.unwrap();
    assert_eq!(entry.value, "v1");
    assert_eq!(entry.version, version);
}

#[tokio::test]
async fn create_existing_key_fails() {
    let (_dir, store) = store();
    store.create("k", "v1").await.unwrap();

    let err = store.create("k", "v2").await.unwrap_err();
    assert!(matches!(err, KvError::AlreadyExists(_)));
    assert_eq!(store.get("k").await.unwrap().value, "v1");
}

#[tokio::test]
async fn compare_and_swap_requires_current_version() {
    let (_dir, store) = store();
    let v1 = store.create("k", "v1").await.unwrap();
    let v2 = store.compare_and_swap("k", "v2", v1).await.unwrap();
    assert!(v2 > v1);

    let err = store.compare_and_swap("k", "stale", v1).await.unwrap_err();
    assert!(matches!(err, KvError::VersionConflict { expected, .. } if expected == v1));
    assert_eq!(store.get("k").await.unwrap().value, "v2");
}

#[tokio::test]
async fn compare_and_swap_missing_key_is_not_found() {
    let (_dir, store) = store();
    let err = store
        .compare_and_swap("k", "v", Version(1))
        .await
        .unwrap_err();
    assert!(matches!(err, KvError::NotFound(_)));
}

#[tokio::test]
async fn versions_are_store_wide() {
    let (_dir, store) = store();
    let a = store.create("a", "1").await.unwrap();
    let b = store.create("b", "1").await.unwrap();
    assert!(b > a);
}

#[tokio::test]
async fn state_survives_reopen() {
    let (dir, store) = store();
    let version = store.create("k", "v").await.unwrap();

    let reopened = FileKvStore::new(dir.path().join("store.json"));
    let entry = reopened.get("k").await.unwrap();
    assert_eq!(entry.version, version);
}

#[tokio::test]
async fn creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let store = FileKvStore::new(dir.path().join("nested/deeper/store.json"));
    store.create("k", "v").await.unwrap();
    assert!(store.path().exists());
}

#[tokio::test]
async fn concurrent_swaps_from_same_version_admit_one_winner() {
    let (_dir, store) = store();
    let v1 = store.create("k", "0").await.unwrap();

    let mut handles = Vec::new();
    for i in 0..8 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.compare_and_swap("k", &i.to_string(), v1).await
        }));
    }

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);
}

#[test]
fn from_endpoint_accepts_file_scheme_only() {
    let store = FileKvStore::from_endpoint("file:///var/lib/rebootlock.json").unwrap();
    assert_eq!(store.path(), Path::new("/var/lib/rebootlock.json"));
    assert!(FileKvStore::from_endpoint("http://127.0.0.1:2379").is_none());
}

#[tokio::test]
async fn corrupt_file_is_reported() {
    let (_dir, store) = store();
    std::fs::write(store.path(), "not json").unwrap();
    let err = store.get("k").await.unwrap_err();
    assert!(matches!(err, KvError::Other(_)));
}
