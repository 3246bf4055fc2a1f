// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rebootlock-core: pure logic for cluster-coordinated reboots
//!
//! This crate provides:
//! - The counting semaphore persisted in the key-value store
//! - Recurring maintenance windows
//! - The retry backoff schedule
//! - Reboot strategies and coordinator lifecycle states
//!
//! Nothing here performs I/O.

pub mod backoff;
pub mod clock;
pub mod semaphore;
pub mod status;
pub mod strategy;
pub mod window;

pub use backoff::{Backoff, INITIAL_INTERVAL, MAX_INTERVAL};
pub use clock::{Clock, FakeClock, SystemClock};
pub use semaphore::{Semaphore, SemaphoreError, Version};
pub use status::{CoordinatorState, UpdateStatus, IDLE, UPDATED_NEED_REBOOT};
pub use strategy::{Strategy, StrategyError, StrategyName};
pub use window::{Periodic, Window, WindowError};
