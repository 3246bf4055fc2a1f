// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Reboot lock protocol and coordination engine

mod coordinator;
mod error;
mod lock;
mod lock_client;

pub use coordinator::{Coordinator, CoordinatorConfig, CoordinatorDeps, REBOOT_WAIT};
pub use error::{CoordinatorError, LockError};
pub use lock::Lock;
pub use lock_client::{semaphore_key, KvLockClient, LockClient, KEY_PREFIX};
