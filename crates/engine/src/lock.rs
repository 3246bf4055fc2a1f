// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-modify-write transactions on the shared semaphore

use crate::error::LockError;
use crate::lock_client::LockClient;
use rebootlock_core::{Semaphore, SemaphoreError};

/// One holder's handle on the shared semaphore
///
/// Every mutation reads the semaphore, applies the change in memory and
/// writes it back against the version it read. A concurrent writer makes the
/// write fail; retrying is up to the caller.
#[derive(Clone)]
pub struct Lock<C> {
    id: String,
    client: C,
}

impl<C: LockClient> Lock<C> {
    pub fn new(id: impl Into<String>, client: C) -> Self {
        Self {
            id: id.into(),
            client,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Create the semaphore if nobody has yet
    pub async fn init(&self) -> Result<(), LockError> {
        self.client.init().await
    }

    /// Read the semaphore without changing it
    pub async fn get(&self) -> Result<Semaphore, LockError> {
        self.client.get().await
    }

    /// Apply `mutate` to the current semaphore and write the result
    ///
    /// Nothing is written when `mutate` fails.
    pub async fn transact<F>(&self, mutate: F) -> Result<Semaphore, LockError>
    where
        F: FnOnce(&mut Semaphore) -> Result<(), SemaphoreError> + Send,
    {
        let mut semaphore = self.client.get().await?;
        mutate(&mut semaphore)?;
        self.client.set(&semaphore).await?;
        Ok(semaphore)
    }

    /// Take one unit of the semaphore for this holder
    pub async fn lock(&self) -> Result<(), LockError> {
        self.transact(|sem| sem.lock(&self.id)).await?;
        Ok(())
    }

    /// Give back this holder's unit
    pub async fn unlock(&self) -> Result<(), LockError> {
        self.transact(|sem| sem.unlock(&self.id)).await?;
        Ok(())
    }

    /// Change the capacity, returning the written semaphore and the old capacity
    pub async fn set_capacity(&self, capacity: i64) -> Result<(Semaphore, i64), LockError> {
        let mut old = 0;
        let semaphore = self
            .transact(|sem| {
                old = sem.capacity;
                sem.set_capacity(capacity);
                Ok(())
            })
            .await?;
        Ok((semaphore, old))
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
