// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reboot coordination state machine
//!
//! Waits for the reboot-needed signal, takes the shared lock when the
//! strategy asks for it, waits for the maintenance window and reboots.

use crate::error::{CoordinatorError, LockError};
use crate::lock::Lock;
use crate::lock_client::LockClient;
use chrono::TimeDelta;
use rebootlock_adapters::{CoordinatorStateAdapter, RebootAdapter, RebootSignalAdapter};
use rebootlock_core::{Backoff, Clock, CoordinatorState, Periodic, Strategy};
use std::time::Duration;
use tokio::sync::watch;

/// How long to wait for the machine to go down after requesting a reboot
pub const REBOOT_WAIT: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Coordinator policy
#[derive(Clone, Debug)]
pub struct CoordinatorConfig {
    pub strategy: Strategy,
    /// Reboot only inside this window
    pub window: Option<Periodic>,
    /// Retry schedule for lock acquisition and stale-lock release
    pub backoff: Backoff,
}

impl CoordinatorConfig {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            window: None,
            backoff: Backoff::default(),
        }
    }
}

/// Coordinator adapter dependencies
pub struct CoordinatorDeps<L, G, R, T, C> {
    /// Required when the strategy uses the lock
    pub lock: Option<Lock<L>>,
    pub signal: G,
    pub reboot: R,
    pub state: T,
    pub clock: C,
}

/// Per-machine reboot coordinator
pub struct Coordinator<L, G, R, T, C> {
    lock: Option<Lock<L>>,
    signal: G,
    reboot: R,
    state: T,
    clock: C,
    config: CoordinatorConfig,
}

impl<L, G, R, T, C> Coordinator<L, G, R, T, C>
where
    L: LockClient,
    G: RebootSignalAdapter,
    R: RebootAdapter,
    T: CoordinatorStateAdapter,
    C: Clock,
{
    pub fn new(
        deps: CoordinatorDeps<L, G, R, T, C>,
        config: CoordinatorConfig,
    ) -> Result<Self, CoordinatorError> {
        if config.strategy.uses_lock() && deps.lock.is_none() {
            return Err(CoordinatorError::MissingLock(config.strategy.as_str()));
        }
        Ok(Self {
            lock: deps.lock,
            signal: deps.signal,
            reboot: deps.reboot,
            state: deps.state,
            clock: deps.clock,
            config,
        })
    }

    /// Run until the machine reboots
    ///
    /// Returns `Ok` only when the strategy is `off`. Any other return means
    /// the reboot did not happen.
    pub async fn run(self) -> Result<(), CoordinatorError> {
        self.report(CoordinatorState::Starting).await;

        let strategy = self.config.strategy;
        if strategy == Strategy::Off {
            tracing::info!("reboot strategy is off, not rebooting");
            self.report(CoordinatorState::Disabled).await;
            return Ok(());
        }

        let status = self.signal.current_status().await?;
        tracing::info!(
            current_operation = %status.current_operation,
            %strategy,
            "coordinator starting"
        );
        self.report(CoordinatorState::Running).await;

        if !status.needs_reboot() {
            self.wait_for_signal().await?;
        }

        self.report(CoordinatorState::RebootPlanned).await;
        if let Some(lock) = self.lock.as_ref().filter(|_| strategy.uses_lock()) {
            self.acquire(lock).await;
        }
        self.wait_for_window().await;

        self.reboot_and_wait().await
    }

    async fn wait_for_signal(&self) -> Result<(), CoordinatorError> {
        let (stop_tx, stop_rx) = watch::channel(false);

        let release = self
            .lock
            .clone()
            .filter(|_| self.config.strategy.uses_lock())
            .map(|lock| {
                tokio::spawn(release_stale(
                    lock,
                    self.config.backoff.clone(),
                    stop_rx.clone(),
                ))
            });

        let received = match self.signal.subscribe(stop_rx).await {
            Ok(mut statuses) => statuses.recv().await,
            Err(e) => {
                let _ = stop_tx.send(true);
                return Err(e.into());
            }
        };

        let _ = stop_tx.send(true);
        if let Some(release) = release {
            if let Err(e) = release.await {
                tracing::warn!(error = %e, "stale lock release task failed");
            }
        }

        match received {
            Some(status) => {
                tracing::info!(new_version = %status.new_version, "reboot needed");
                Ok(())
            }
            None => Err(CoordinatorError::SignalClosed),
        }
    }

    async fn acquire(&self, lock: &Lock<L>) {
        let mut backoff = self.config.backoff.clone();
        let mut initialized = false;
        loop {
            let attempt = async {
                ensure_init(lock, &mut initialized).await?;
                lock.lock().await
            };
            match attempt.await {
                Ok(()) => {
                    tracing::info!(holder = lock.id(), "acquired reboot lock");
                    return;
                }
                Err(e) if e.is_already_held() => {
                    tracing::info!(holder = lock.id(), "reboot lock already held");
                    return;
                }
                Err(e) => {
                    let interval = backoff.next_interval();
                    tracing::warn!(
                        error = %e,
                        retry_in_secs = interval.as_secs(),
                        "failed to acquire reboot lock"
                    );
                    tokio::time::sleep(interval).await;
                }
            }
        }
    }

    async fn wait_for_window(&self) {
        let Some(window) = &self.config.window else {
            return;
        };

        let wait = window.duration_to_start(&self.clock.now());
        if wait <= TimeDelta::zero() {
            tracing::info!(%window, "inside reboot window");
            return;
        }

        let wait = wait.to_std().unwrap_or_default();
        tracing::info!(%window, wait_secs = wait.as_secs(), "waiting for reboot window");
        tokio::time::sleep(wait).await;
    }

    async fn reboot_and_wait(&self) -> Result<(), CoordinatorError> {
        if let Err(e) = self.reboot.reboot().await {
            tracing::error!(error = %e, "reboot request failed");
        }
        self.report(CoordinatorState::Rebooting).await;

        tracing::info!("reboot requested, going to sleep");
        tokio::time::sleep(REBOOT_WAIT).await;

        tracing::error!("reboot attempt never finished");
        Err(CoordinatorError::RebootNeverHappened)
    }

    async fn report(&self, state: CoordinatorState) {
        if let Err(e) = self.state.update_state(state).await {
            tracing::warn!(%state, error = %e, "failed to report coordinator state");
        }
    }
}

/// Release a lock this machine may still hold from before a restart
///
/// Ends once the lock is released or not held, or when `stop` is set.
async fn release_stale<L: LockClient>(
    lock: Lock<L>,
    mut backoff: Backoff,
    mut stop: watch::Receiver<bool>,
) {
    let mut interval = backoff.current();
    let mut initialized = false;
    loop {
        tokio::select! {
            _ = stopped(&mut stop) => return,
            _ = tokio::time::sleep(interval) => {}
        }

        let attempt = async {
            ensure_init(&lock, &mut initialized).await?;
            lock.unlock().await
        };
        match attempt.await {
            Ok(()) => {
                tracing::info!(holder = lock.id(), "released lock held from before restart");
                return;
            }
            Err(e) if e.is_not_held() => {
                tracing::debug!(holder = lock.id(), "no stale lock to release");
                return;
            }
            Err(e) => {
                interval = backoff.next_interval();
                tracing::warn!(
                    error = %e,
                    retry_in_secs = interval.as_secs(),
                    "releasing stale lock failed"
                );
            }
        }
    }
}

/// Create the semaphore on the first successful call
///
/// The store may be unreachable at startup, so creation is retried with the
/// lock operations instead of up front.
async fn ensure_init<L: LockClient>(
    lock: &Lock<L>,
    initialized: &mut bool,
) -> Result<(), LockError> {
    if !*initialized {
        lock.init().await?;
        *initialized = true;
    }
    Ok(())
}

async fn stopped(stop: &mut watch::Receiver<bool>) {
    let _ = stop.wait_for(|stop| *stop).await;
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
