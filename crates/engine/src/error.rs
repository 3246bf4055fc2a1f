// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the lock and the coordinator

use rebootlock_adapters::{KvError, SignalError};
use rebootlock_core::SemaphoreError;
use thiserror::Error;

/// Errors from reading or mutating the shared semaphore
#[derive(Debug, Error)]
pub enum LockError {
    #[error(transparent)]
    Semaphore(#[from] SemaphoreError),
    #[error("store error: {0}")]
    Store(#[from] KvError),
    #[error("malformed semaphore: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("failed to encode semaphore: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("semaphore was never read from the store")]
    MissingVersion,
}

impl LockError {
    /// The holder is already in the semaphore
    pub fn is_already_held(&self) -> bool {
        matches!(self, LockError::Semaphore(SemaphoreError::AlreadyHeld(_)))
    }

    /// The holder is not in the semaphore
    pub fn is_not_held(&self) -> bool {
        matches!(self, LockError::Semaphore(SemaphoreError::NotHeld(_)))
    }

    /// Another writer changed the semaphore since it was read
    pub fn is_conflict(&self) -> bool {
        matches!(self, LockError::Store(KvError::VersionConflict { .. }))
    }
}

/// Errors that stop the coordinator
#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("strategy {0} needs a lock, but none was configured")]
    MissingLock(&'static str),
    #[error("reboot signal error: {0}")]
    Signal(#[from] SignalError),
    #[error("reboot signal source closed before a reboot was needed")]
    SignalClosed,
    #[error("reboot was requested but the machine is still running")]
    RebootNeverHappened,
}
