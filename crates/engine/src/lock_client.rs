// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistence of the semaphore in a versioned key-value store

use crate::error::LockError;
use async_trait::async_trait;
use rebootlock_adapters::{KvError, KvStore};
use rebootlock_core::Semaphore;

/// Root of every key this crate writes
pub const KEY_PREFIX: &str = "coreos.com/updateengine/rebootlock";

/// Reads and writes the semaphore
///
/// Implementations never retry. A failed `set` surfaces the store error as is.
#[async_trait]
pub trait LockClient: Clone + Send + Sync + 'static {
    /// Store a default semaphore unless one already exists
    async fn init(&self) -> Result<(), LockError>;

    /// Read the semaphore, versioned by the store
    async fn get(&self) -> Result<Semaphore, LockError>;

    /// Write the semaphore if nobody else wrote since it was read
    async fn set(&self, semaphore: &Semaphore) -> Result<(), LockError>;
}

/// Key holding a group's semaphore
pub fn semaphore_key(group: &str) -> String {
    if group.is_empty() {
        format!("{}/semaphore", KEY_PREFIX)
    } else {
        format!("{}/groups/{}/semaphore", KEY_PREFIX, query_escape(group))
    }
}

/// Escape a group name the way URL query components are escaped
fn query_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

/// Lock client over any [`KvStore`]
#[derive(Clone)]
pub struct KvLockClient<K> {
    store: K,
    key: String,
}

impl<K: KvStore> KvLockClient<K> {
    /// Create a client for `group` and make sure its semaphore exists
    pub async fn new(store: K, group: &str) -> Result<Self, LockError> {
        let client = Self::without_init(store, group);
        client.init().await?;
        Ok(client)
    }

    /// Create a client without touching the store
    pub fn without_init(store: K, group: &str) -> Self {
        Self {
            store,
            key: semaphore_key(group),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

#[async_trait]
impl<K: KvStore> LockClient for KvLockClient<K> {
    async fn init(&self) -> Result<(), LockError> {
        let value = serde_json::to_string(&Semaphore::new()).map_err(LockError::Encode)?;
        match self.store.create(&self.key, &value).await {
            Ok(_) | Err(KvError::AlreadyExists(_)) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn get(&self) -> Result<Semaphore, LockError> {
        let entry = self.store.get(&self.key).await?;
        let mut semaphore: Semaphore =
            serde_json::from_str(&entry.value).map_err(LockError::Decode)?;
        semaphore.version = Some(entry.version);
        Ok(semaphore)
    }

    async fn set(&self, semaphore: &Semaphore) -> Result<(), LockError> {
        let version = semaphore.version.ok_or(LockError::MissingVersion)?;
        let value = serde_json::to_string(semaphore).map_err(LockError::Encode)?;
        self.store
            .compare_and_swap(&self.key, &value, version)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "lock_client_tests.rs"]
mod tests;
