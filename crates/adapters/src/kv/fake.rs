// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake key-value store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{KvEntry, KvError, KvStore};
use async_trait::async_trait;
use rebootlock_core::Version;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Recorded store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KvCall {
    Get {
        key: String,
    },
    Create {
        key: String,
        value: String,
    },
    CompareAndSwap {
        key: String,
        value: String,
        expected: Version,
    },
}

#[derive(Default)]
struct State {
    index: u64,
    entries: HashMap<String, KvEntry>,
    /// Errors returned by the next calls, oldest first
    failures: VecDeque<KvError>,
    /// Writes applied just before the next compare-and-swap
    interleaved: VecDeque<(String, String)>,
}

impl State {
    fn bump(&mut self) -> Version {
        self.index += 1;
        Version(self.index)
    }
}

/// In-memory store with the same version rules as a real one
#[derive(Clone, Default)]
pub struct FakeKvStore {
    state: Arc<Mutex<State>>,
    calls: Arc<Mutex<Vec<KvCall>>>,
}

impl FakeKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<KvCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Current value of a key, bypassing call recording
    pub fn value(&self, key: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entries
            .get(key)
            .map(|e| e.value.clone())
    }

    /// Overwrite a key as another writer would, bumping its version
    pub fn put(&self, key: &str, value: &str) -> Version {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let version = state.bump();
        state.entries.insert(
            key.to_string(),
            KvEntry {
                value: value.to_string(),
                version,
            },
        );
        version
    }

    /// Make the next call fail with `error`
    pub fn fail_next(&self, error: KvError) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .failures
            .push_back(error);
    }

    /// Have another writer update `key` between the next read and swap
    pub fn interleave_write(&self, key: &str, value: &str) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .interleaved
            .push_back((key.to_string(), value.to_string()));
    }

    fn record(&self, call: KvCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }
}

#[async_trait]
impl KvStore for FakeKvStore {
    async fn get(&self, key: &str) -> Result<KvEntry, KvError> {
        self.record(KvCall::Get {
            key: key.to_string(),
        });

        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(err) = state.failures.pop_front() {
            return Err(err);
        }
        state
            .entries
            .get(key)
            .cloned()
            .ok_or_else(|| KvError::NotFound(key.to_string()))
    }

    async fn create(&self, key: &str, value: &str) -> Result<Version, KvError> {
        self.record(KvCall::Create {
            key: key.to_string(),
            value: value.to_string(),
        });

        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(err) = state.failures.pop_front() {
            return Err(err);
        }
        if state.entries.contains_key(key) {
            return Err(KvError::AlreadyExists(key.to_string()));
        }
        let version = state.bump();
        state.entries.insert(
            key.to_string(),
            KvEntry {
                value: value.to_string(),
                version,
            },
        );
        Ok(version)
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        value: &str,
        expected: Version,
    ) -> Result<Version, KvError> {
        self.record(KvCall::CompareAndSwap {
            key: key.to_string(),
            value: value.to_string(),
            expected,
        });

        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(err) = state.failures.pop_front() {
            return Err(err);
        }
        if let Some((other_key, other_value)) = state.interleaved.pop_front() {
            let version = state.bump();
            state.entries.insert(
                other_key,
                KvEntry {
                    value: other_value,
                    version,
                },
            );
        }

        let current = match state.entries.get(key) {
            Some(entry) => entry.version,
            None => return Err(KvError::NotFound(key.to_string())),
        };
        if current != expected {
            return Err(KvError::VersionConflict {
                key: key.to_string(),
                expected,
            });
        }
        let version = state.bump();
        state.entries.insert(
            key.to_string(),
            KvEntry {
                value: value.to_string(),
                version,
            },
        );
        Ok(version)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
