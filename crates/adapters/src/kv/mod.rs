// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Versioned key-value store adapters
//!
//! Every write either creates a key that must not exist yet or replaces a
//! value whose version still matches the one the writer read.

mod backend;
mod etcd;
mod file;

pub use backend::KvBackend;
pub use etcd::{EtcdConfig, EtcdKeysAdapter, TlsFiles, DEFAULT_ENDPOINTS};
pub use file::FileKvStore;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeKvStore, KvCall};

use async_trait::async_trait;
use rebootlock_core::Version;
use thiserror::Error;

/// A value and the version the store assigned to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvEntry {
    pub value: String,
    pub version: Version,
}

/// Errors from key-value store operations
#[derive(Debug, Error)]
pub enum KvError {
    #[error("key not found: {0}")]
    NotFound(String),
    #[error("key already exists: {0}")]
    AlreadyExists(String),
    #[error("compare failed for {key}: expected version {expected}")]
    VersionConflict { key: String, expected: Version },
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store error: {0}")]
    Other(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Adapter for a versioned key-value store with single-key compare-and-swap
#[async_trait]
pub trait KvStore: Clone + Send + Sync + 'static {
    /// Read a value and its current version
    async fn get(&self, key: &str) -> Result<KvEntry, KvError>;

    /// Create a key, failing with `AlreadyExists` if it is present
    async fn create(&self, key: &str, value: &str) -> Result<Version, KvError>;

    /// Replace a value only if its version is still `expected`
    ///
    /// The previous value is not compared.
    async fn compare_and_swap(
        &self,
        key: &str,
        value: &str,
        expected: Version,
    ) -> Result<Version, KvError>;
}
