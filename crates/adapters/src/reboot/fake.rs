// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake reboot adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{RebootAdapter, RebootError};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Counts reboot requests instead of rebooting
#[derive(Clone, Default)]
pub struct FakeRebootAdapter {
    reboots: Arc<Mutex<u32>>,
    fail: Arc<Mutex<bool>>,
}

impl FakeRebootAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of reboot requests received
    pub fn reboots(&self) -> u32 {
        *self.reboots.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make every later reboot request fail
    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap_or_else(|e| e.into_inner()) = fail;
    }
}

#[async_trait]
impl RebootAdapter for FakeRebootAdapter {
    async fn reboot(&self) -> Result<(), RebootError> {
        *self.reboots.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        if *self.fail.lock().unwrap_or_else(|e| e.into_inner()) {
            return Err(RebootError::CommandFailed("fake failure".to_string()));
        }
        Ok(())
    }
}
