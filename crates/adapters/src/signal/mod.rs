// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reboot-needed signal adapters

mod sentinel;

pub use sentinel::{RebootRequiredFile, DEFAULT_SENTINEL_PATH};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeRebootSignal;

use async_trait::async_trait;
use rebootlock_core::UpdateStatus;
use thiserror::Error;
use tokio::sync::{mpsc, watch};

/// Errors from reboot signal sources
#[derive(Debug, Error)]
pub enum SignalError {
    #[error("signal source unavailable: {0}")]
    Unavailable(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Adapter for the source that says a reboot is needed
#[async_trait]
pub trait RebootSignalAdapter: Clone + Send + Sync + 'static {
    /// Current update status
    async fn current_status(&self) -> Result<UpdateStatus, SignalError>;

    /// Stream reboot-needed statuses until `stop` flips to true or its sender drops
    async fn subscribe(
        &self,
        stop: watch::Receiver<bool>,
    ) -> Result<mpsc::Receiver<UpdateStatus>, SignalError>;
}

/// Resolves once `stop` is set or its sender is gone
pub(crate) async fn stopped(stop: &mut watch::Receiver<bool>) {
    let _ = stop.wait_for(|stop| *stop).await;
}
