// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::TempDir;

fn sentinel(dir: &TempDir) -> RebootRequiredFile {
    RebootRequiredFile::new(dir.path().join("reboot-required"))
        .with_poll_interval(Duration::from_millis(10))
}

#[tokio::test]
async fn missing_sentinel_is_idle() {
    let dir = TempDir::new().unwrap();
    let status = sentinel(&dir).current_status().await.unwrap();
    assert!(!status.needs_reboot());
}

#[tokio::test]
async fn request_reboot_creates_sentinel() {
    let dir = TempDir::new().unwrap();
    let signal = sentinel(&dir);
    signal.request_reboot().await.unwrap();

    assert!(signal.path().exists());
    assert!(signal.current_status().await.unwrap().needs_reboot());
}

#[tokio::test]
async fn first_line_is_reported_as_new_version() {
    let dir = TempDir::new().unwrap();
    let signal = sentinel(&dir);
    std::fs::write(signal.path(), "2345.3.0\nextra\n").unwrap();

    let status = signal.current_status().await.unwrap();
    assert_eq!(status.new_version, "2345.3.0");
}

#[tokio::test]
async fn subscribe_delivers_when_sentinel_appears() {
    let dir = TempDir::new().unwrap();
    let signal = sentinel(&dir);
    let (_stop_tx, stop_rx) = watch::channel(false);

    let mut rx = signal.subscribe(stop_rx).await.unwrap();
    signal.request_reboot().await.unwrap();

    let status = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(status.needs_reboot());
}

#[tokio::test]
async fn subscribe_ends_on_stop() {
    let dir = TempDir::new().unwrap();
    let signal = sentinel(&dir);
    let (stop_tx, stop_rx) = watch::channel(false);

    let mut rx = signal.subscribe(stop_rx).await.unwrap();
    stop_tx.send(true).unwrap();

    let next = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap();
    assert!(next.is_none());
}
