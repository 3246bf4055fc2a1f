// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-file key-value store for hosts sharing a filesystem

use super::{KvEntry, KvError, KvStore};
use async_trait::async_trait;
use fs2::FileExt;
use rebootlock_core::Version;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    /// Highest version handed out so far
    index: u64,
    keys: BTreeMap<String, StoredValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredValue {
    value: String,
    version: u64,
}

/// Key-value store kept in one JSON file
///
/// Each operation holds an exclusive `flock` on the file for its whole
/// read-modify-write, so concurrent processes see the same compare-and-swap
/// semantics as a networked store. Versions come from a store-wide counter.
#[derive(Debug, Clone)]
pub struct FileKvStore {
    path: PathBuf,
}

impl FileKvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Build a store from a `file://` endpoint
    pub fn from_endpoint(endpoint: &str) -> Option<Self> {
        endpoint.strip_prefix("file://").map(Self::new)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn with_locked<T, F>(&self, f: F) -> Result<T, KvError>
    where
        F: FnOnce(&mut StoreFile) -> Result<(T, bool), KvError>,
    {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?;
        file.lock_exclusive()?;

        let result = Self::read_modify_write(&mut file, f);
        let unlocked = FileExt::unlock(&file);
        let value = result?;
        unlocked?;
        Ok(value)
    }

    fn read_modify_write<T, F>(file: &mut File, f: F) -> Result<T, KvError>
    where
        F: FnOnce(&mut StoreFile) -> Result<(T, bool), KvError>,
    {
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        let mut store = if contents.trim().is_empty() {
            StoreFile::default()
        } else {
            serde_json::from_str(&contents)
                .map_err(|e| KvError::Other(format!("corrupt store file: {}", e)))?
        };

        let (value, dirty) = f(&mut store)?;
        if dirty {
            let encoded = serde_json::to_string_pretty(&store)
                .map_err(|e| KvError::Other(format!("failed to encode store: {}", e)))?;
            file.set_len(0)?;
            file.seek(SeekFrom::Start(0))?;
            file.write_all(encoded.as_bytes())?;
            file.sync_data()?;
        }
        Ok(value)
    }

    fn blocking<T, F>(&self, f: F) -> impl std::future::Future<Output = Result<T, KvError>>
    where
        F: FnOnce(&mut StoreFile) -> Result<(T, bool), KvError> + Send + 'static,
        T: Send + 'static,
    {
        let this = self.clone();
        async move {
            tokio::task::spawn_blocking(move || this.with_locked(f))
                .await
                .map_err(|e| KvError::Other(format!("store task failed: {}", e)))?
        }
    }
}

#[async_trait]
impl KvStore for FileKvStore {
    async fn get(&self, key: &str) -> Result<KvEntry, KvError> {
        let key = key.to_string();
        self.blocking(move |store| match store.keys.get(&key) {
            Some(stored) => Ok((
                KvEntry {
                    value: stored.value.clone(),
                    version: Version(stored.version),
                },
                false,
            )),
            None => Err(KvError::NotFound(key)),
        })
        .await
    }

    async fn create(&self, key: &str, value: &str) -> Result<Version, KvError> {
        let (key, value) = (key.to_string(), value.to_string());
        self.blocking(move |store| {
            if store.keys.contains_key(&key) {
                return Err(KvError::AlreadyExists(key));
            }
            store.index += 1;
            let version = store.index;
            store.keys.insert(key, StoredValue { value, version });
            Ok((Version(version), true))
        })
        .await
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        value: &str,
        expected: Version,
    ) -> Result<Version, KvError> {
        let (key, value) = (key.to_string(), value.to_string());
        self.blocking(move |store| {
            let next = store.index + 1;
            let Some(stored) = store.keys.get_mut(&key) else {
                return Err(KvError::NotFound(key));
            };
            if stored.version != expected.0 {
                return Err(KvError::VersionConflict { key, expected });
            }
            stored.value = value;
            stored.version = next;
            store.index = next;
            Ok((Version(next), true))
        })
        .await
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
