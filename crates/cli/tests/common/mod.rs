// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test utilities for CLI integration tests.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway file-backed store and machine id
pub struct TestEnv {
    pub dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        std::fs::write(dir.path().join("machine-id"), "local-machine\n")
            .expect("Failed to write machine id");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn store_path(&self) -> PathBuf {
        self.path().join("store.json")
    }

    pub fn endpoint(&self) -> String {
        format!("file://{}", self.store_path().display())
    }

    /// `rebootlockctl` pointed at this environment's store
    pub fn ctl(&self) -> Command {
        let mut cmd = Command::cargo_bin("rebootlockctl").expect("Failed to find binary");
        cmd.env_clear()
            .env("REBOOTLOCKCTL_ENDPOINT", self.endpoint())
            .env(
                "REBOOTLOCKCTL_MACHINE_ID_FILE",
                self.path().join("machine-id"),
            );
        cmd
    }
}
