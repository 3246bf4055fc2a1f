// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coordinator state reporting adapters

mod conf_file;

pub use conf_file::{CoordinatorConfFile, DEFAULT_STATUS_PATH};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeStateAdapter;

use async_trait::async_trait;
use rebootlock_core::CoordinatorState;
use thiserror::Error;

/// Errors from state reporting
#[derive(Debug, Error)]
pub enum StatusError {
    #[error("status file {0} is locked by another coordinator")]
    Locked(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Sink for the coordinator's externally visible lifecycle state
#[async_trait]
pub trait CoordinatorStateAdapter: Clone + Send + Sync + 'static {
    async fn update_state(&self, state: CoordinatorState) -> Result<(), StatusError>;
}
