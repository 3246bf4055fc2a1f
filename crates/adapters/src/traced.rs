// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::kv::{KvEntry, KvError, KvStore};
use crate::reboot::{RebootAdapter, RebootError};
use async_trait::async_trait;
use rebootlock_core::Version;
use tracing::Instrument;

/// Wrapper that adds tracing to any KvStore
#[derive(Clone)]
pub struct TracedKvStore<K> {
    inner: K,
}

impl<K> TracedKvStore<K> {
    pub fn new(inner: K) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &K {
        &self.inner
    }
}

fn require_key(key: &str) -> Result<(), KvError> {
    if key.is_empty() {
        tracing::error!("empty key");
        return Err(KvError::Other("key must not be empty".to_string()));
    }
    Ok(())
}

#[async_trait]
impl<K: KvStore> KvStore for TracedKvStore<K> {
    async fn get(&self, key: &str) -> Result<KvEntry, KvError> {
        let span = tracing::info_span!("kv.get", key);
        async {
            require_key(key)?;

            let start = std::time::Instant::now();
            let result = self.inner.get(key).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(entry) => tracing::debug!(version = %entry.version, elapsed_ms, "read"),
                Err(KvError::NotFound(_)) => tracing::debug!(elapsed_ms, "not found"),
                Err(e) => tracing::warn!(elapsed_ms, error = %e, "get failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn create(&self, key: &str, value: &str) -> Result<Version, KvError> {
        let span = tracing::info_span!("kv.create", key);
        async {
            require_key(key)?;

            let start = std::time::Instant::now();
            let result = self.inner.create(key, value).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(version) => tracing::info!(%version, elapsed_ms, "created"),
                Err(KvError::AlreadyExists(_)) => tracing::debug!(elapsed_ms, "already exists"),
                Err(e) => tracing::warn!(elapsed_ms, error = %e, "create failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        value: &str,
        expected: Version,
    ) -> Result<Version, KvError> {
        let span = tracing::info_span!("kv.compare_and_swap", key, %expected);
        async {
            require_key(key)?;

            let start = std::time::Instant::now();
            let result = self.inner.compare_and_swap(key, value, expected).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(version) => tracing::info!(%version, elapsed_ms, "swapped"),
                Err(e) => tracing::warn!(elapsed_ms, error = %e, "compare-and-swap failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

/// Wrapper that adds tracing to any RebootAdapter
#[derive(Clone)]
pub struct TracedRebootAdapter<R> {
    inner: R,
}

impl<R> TracedRebootAdapter<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<R: RebootAdapter> RebootAdapter for TracedRebootAdapter<R> {
    async fn reboot(&self) -> Result<(), RebootError> {
        let span = tracing::info_span!("reboot");
        async {
            tracing::info!("requesting reboot");
            let result = self.inner.reboot().await;
            match &result {
                Ok(()) => tracing::info!("reboot requested"),
                Err(e) => tracing::error!(error = %e, "reboot request failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
