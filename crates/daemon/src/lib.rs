// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Reboot coordination daemon
//!
//! Configuration, logging and the composition root shared by `rebootlockd`
//! and `rebootlockctl daemon`.

mod lifecycle;
mod logging;

pub use lifecycle::{run, Config, DaemonCoordinator, LifecycleError, COORDINATOR_NAME};
pub use logging::setup_logging;
