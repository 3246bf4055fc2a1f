// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake state adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{CoordinatorStateAdapter, StatusError};
use async_trait::async_trait;
use rebootlock_core::CoordinatorState;
use std::sync::{Arc, Mutex};

/// Records every reported state
#[derive(Clone, Default)]
pub struct FakeStateAdapter {
    states: Arc<Mutex<Vec<CoordinatorState>>>,
    fail: Arc<Mutex<bool>>,
}

impl FakeStateAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All reported states, oldest first
    pub fn states(&self) -> Vec<CoordinatorState> {
        self.states.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn last(&self) -> Option<CoordinatorState> {
        self.states().last().copied()
    }

    /// Make later updates fail after recording them
    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap_or_else(|e| e.into_inner()) = fail;
    }
}

#[async_trait]
impl CoordinatorStateAdapter for FakeStateAdapter {
    async fn update_state(&self, state: CoordinatorState) -> Result<(), StatusError> {
        self.states
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(state);
        if *self.fail.lock().unwrap_or_else(|e| e.into_inner()) {
            return Err(StatusError::Io(std::io::Error::other("fake failure")));
        }
        Ok(())
    }
}
