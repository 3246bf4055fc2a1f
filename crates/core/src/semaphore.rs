// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Counting semaphore shared by every machine in a reboot group
//!
//! The semaphore is plain data plus the holder-management rules. Persisting
//! it (and the version that guards each write) is the lock client's job.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Opaque store version a semaphore was read at
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version(pub u64);

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors from semaphore holder management
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemaphoreError {
    #[error("holder exists: {0}")]
    AlreadyHeld(String),
    #[error("holder does not exist: {0}")]
    NotHeld(String),
    #[error("semaphore is at {available}")]
    Exhausted { available: i64 },
}

/// Cluster-wide reboot semaphore
///
/// `capacity - available == holders.len()` holds before and after every
/// successful `lock`/`unlock`. `set_capacity` only shifts `available` by the
/// capacity delta, so shrinking below the holder count drives it negative
/// until enough holders unlock.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Semaphore {
    /// Never serialized; always taken from the store on read
    #[serde(skip)]
    pub version: Option<Version>,
    #[serde(rename = "semaphore", default)]
    pub available: i64,
    #[serde(rename = "max", default)]
    pub capacity: i64,
    /// Sorted ascending, no duplicates
    #[serde(default, deserialize_with = "null_as_empty")]
    pub holders: Vec<String>,
}

// Older writers emit `"holders": null` for an empty list.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Default for Semaphore {
    fn default() -> Self {
        Self::new()
    }
}

impl Semaphore {
    /// A fresh semaphore allowing a single concurrent reboot
    pub fn new() -> Self {
        Self {
            version: None,
            available: 1,
            capacity: 1,
            holders: Vec::new(),
        }
    }

    /// Whether `id` currently holds the semaphore
    pub fn is_held_by(&self, id: &str) -> bool {
        self.holders
            .binary_search_by(|h| h.as_str().cmp(id))
            .is_ok()
    }

    fn add_holder(&mut self, id: &str) -> Result<(), SemaphoreError> {
        match self.holders.binary_search_by(|h| h.as_str().cmp(id)) {
            Ok(_) => Err(SemaphoreError::AlreadyHeld(id.to_string())),
            Err(pos) => {
                self.holders.insert(pos, id.to_string());
                Ok(())
            }
        }
    }

    fn remove_holder(&mut self, id: &str) -> Result<(), SemaphoreError> {
        match self.holders.binary_search_by(|h| h.as_str().cmp(id)) {
            Ok(pos) => {
                self.holders.remove(pos);
                Ok(())
            }
            Err(_) => Err(SemaphoreError::NotHeld(id.to_string())),
        }
    }

    /// Take one permit for `id`
    ///
    /// Exhaustion is checked before membership: a holder locking again on a
    /// full semaphore sees `Exhausted`, not `AlreadyHeld`.
    pub fn lock(&mut self, id: &str) -> Result<(), SemaphoreError> {
        if self.available <= 0 {
            return Err(SemaphoreError::Exhausted {
                available: self.available,
            });
        }

        self.add_holder(id)?;
        self.available = self.available.wrapping_sub(1);
        Ok(())
    }

    /// Return the permit held by `id`
    pub fn unlock(&mut self, id: &str) -> Result<(), SemaphoreError> {
        self.remove_holder(id)?;
        self.available = self.available.wrapping_add(1);
        Ok(())
    }

    /// Change the number of concurrent holders allowed
    ///
    /// Arithmetic wraps at the `i64` bounds, so `capacity - available` is
    /// preserved for any input.
    pub fn set_capacity(&mut self, capacity: i64) {
        let diff = self.capacity.wrapping_sub(capacity);
        self.available = self.available.wrapping_sub(diff);
        self.capacity = capacity;
    }
}

impl fmt::Display for Semaphore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "semaphore_tests.rs"]
mod tests;
