// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! update-engine coordinator.conf writer

use super::{CoordinatorStateAdapter, StatusError};
use async_trait::async_trait;
use fs2::FileExt;
use rebootlock_core::CoordinatorState;
use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub const DEFAULT_STATUS_PATH: &str = "/run/update-engine/coordinator.conf";

struct Inner {
    file: File,
    name: String,
    strategy: String,
}

impl Inner {
    fn write_state(&mut self, state: CoordinatorState) -> std::io::Result<()> {
        let contents = format!(
            "NAME={}\nSTRATEGY={}\nSTATE={}\n",
            self.name, self.strategy, state
        );
        self.file.set_len(0)?;
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(contents.as_bytes())?;
        self.file.sync_data()
    }
}

/// `KEY=value` status file read by the update engine
///
/// The file stays exclusively locked for as long as any clone of this
/// adapter is alive, so only one coordinator can claim it.
#[derive(Clone)]
pub struct CoordinatorConfFile {
    path: PathBuf,
    inner: Arc<Mutex<Inner>>,
}

impl CoordinatorConfFile {
    /// Claim the file and report `Starting`
    pub fn open(
        path: impl Into<PathBuf>,
        name: &str,
        strategy: &str,
    ) -> Result<Self, StatusError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;
        file.try_lock_exclusive()
            .map_err(|_| StatusError::Locked(path.display().to_string()))?;

        let mut inner = Inner {
            file,
            name: name.to_string(),
            strategy: strategy.to_string(),
        };
        inner.write_state(CoordinatorState::Starting)?;

        Ok(Self {
            path,
            inner: Arc::new(Mutex::new(inner)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CoordinatorStateAdapter for CoordinatorConfFile {
    async fn update_state(&self, state: CoordinatorState) -> Result<(), StatusError> {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            inner
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .write_state(state)
        })
        .await
        .map_err(|e| StatusError::Io(std::io::Error::other(e)))??;
        Ok(())
    }
}

#[cfg(test)]
#[path = "conf_file_tests.rs"]
mod tests;
