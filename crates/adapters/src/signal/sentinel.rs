// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reboot-required sentinel file

use super::{stopped, RebootSignalAdapter, SignalError};
use async_trait::async_trait;
use rebootlock_core::UpdateStatus;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::{mpsc, watch};

pub const DEFAULT_SENTINEL_PATH: &str = "/run/reboot-required";

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Signals a needed reboot through the presence of a file
///
/// The file's first line, if any, is reported as the new version.
#[derive(Debug, Clone)]
pub struct RebootRequiredFile {
    path: PathBuf,
    poll_interval: Duration,
}

impl RebootRequiredFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the sentinel, asking the daemon to reboot
    pub async fn request_reboot(&self) -> Result<(), SignalError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&self.path, b"").await?;
        Ok(())
    }

    async fn read_status(path: &Path) -> Result<UpdateStatus, SignalError> {
        match tokio::fs::read_to_string(path).await {
            Ok(contents) => {
                let version = contents.lines().next().unwrap_or("").trim();
                Ok(UpdateStatus::need_reboot(version))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(UpdateStatus::idle()),
            Err(e) => Err(SignalError::Io(e)),
        }
    }
}

#[async_trait]
impl RebootSignalAdapter for RebootRequiredFile {
    async fn current_status(&self) -> Result<UpdateStatus, SignalError> {
        Self::read_status(&self.path).await
    }

    async fn subscribe(
        &self,
        mut stop: watch::Receiver<bool>,
    ) -> Result<mpsc::Receiver<UpdateStatus>, SignalError> {
        let (tx, rx) = mpsc::channel(1);
        let path = self.path.clone();
        let poll_interval = self.poll_interval;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(poll_interval);
            let mut was_present = false;
            loop {
                tokio::select! {
                    _ = stopped(&mut stop) => break,
                    _ = interval.tick() => {}
                }

                let status = match Self::read_status(&path).await {
                    Ok(status) => status,
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "failed to read reboot sentinel");
                        continue;
                    }
                };

                let present = status.needs_reboot();
                if present && !was_present && tx.send(status).await.is_err() {
                    break;
                }
                was_present = present;
            }
        });

        Ok(rx)
    }
}

#[cfg(test)]
#[path = "sentinel_tests.rs"]
mod tests;
