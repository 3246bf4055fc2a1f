// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reboot actuator adapters

mod systemctl;

pub use systemctl::SystemctlRebootAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeRebootAdapter;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from reboot operations
#[derive(Debug, Error)]
pub enum RebootError {
    #[error("reboot command failed: {0}")]
    CommandFailed(String),
}

/// Adapter that asks the machine to reboot
///
/// Returning `Ok` only means the request was accepted. Callers must not
/// assume the machine is going down.
#[async_trait]
pub trait RebootAdapter: Clone + Send + Sync + 'static {
    async fn reboot(&self) -> Result<(), RebootError>;
}
