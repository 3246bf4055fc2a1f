// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake reboot signal for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{stopped, RebootSignalAdapter, SignalError};
use async_trait::async_trait;
use rebootlock_core::UpdateStatus;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, watch};

/// Fake signal source
///
/// A raised signal is latched: subscribers that arrive after `signal_reboot`
/// still receive it.
#[derive(Clone)]
pub struct FakeRebootSignal {
    status: Arc<watch::Sender<UpdateStatus>>,
    subscriptions: Arc<Mutex<u32>>,
}

impl Default for FakeRebootSignal {
    fn default() -> Self {
        let (status, _) = watch::channel(UpdateStatus::idle());
        Self {
            status: Arc::new(status),
            subscriptions: Arc::new(Mutex::new(0)),
        }
    }
}

impl FakeRebootSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start out already needing a reboot
    pub fn needing_reboot() -> Self {
        let signal = Self::new();
        signal.signal_reboot();
        signal
    }

    /// Report that an update was installed and a reboot is needed
    pub fn signal_reboot(&self) {
        self.set_status(UpdateStatus::need_reboot("fake-update"));
    }

    pub fn set_status(&self, status: UpdateStatus) {
        self.status.send_replace(status);
    }

    /// Number of `subscribe` calls so far
    pub fn subscriptions(&self) -> u32 {
        *self.subscriptions.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl RebootSignalAdapter for FakeRebootSignal {
    async fn current_status(&self) -> Result<UpdateStatus, SignalError> {
        Ok(self.status.borrow().clone())
    }

    async fn subscribe(
        &self,
        mut stop: watch::Receiver<bool>,
    ) -> Result<mpsc::Receiver<UpdateStatus>, SignalError> {
        *self.subscriptions.lock().unwrap_or_else(|e| e.into_inner()) += 1;

        let (tx, rx) = mpsc::channel(1);
        let mut status = self.status.subscribe();
        tokio::spawn(async move {
            tokio::select! {
                _ = stopped(&mut stop) => {}
                found = async { status.wait_for(UpdateStatus::needs_reboot).await.map(|r| r.clone()) } => {
                    let found = match found {
                        Ok(found) => found,
                        Err(_) => return,
                    };
                    let _ = tx.send(found).await;
                }
            }
        });
        Ok(rx)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
