// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O

pub mod kv;
pub mod machine;
pub mod reboot;
pub mod signal;
pub mod status;
pub mod traced;

pub use kv::{
    EtcdConfig, EtcdKeysAdapter, FileKvStore, KvBackend, KvEntry, KvError, KvStore, TlsFiles,
    DEFAULT_ENDPOINTS,
};
pub use machine::{MachineIdFile, MachineIdentity, DEFAULT_MACHINE_ID_PATH};
pub use reboot::{RebootAdapter, RebootError, SystemctlRebootAdapter};
pub use signal::{RebootRequiredFile, RebootSignalAdapter, SignalError, DEFAULT_SENTINEL_PATH};
pub use status::{CoordinatorConfFile, CoordinatorStateAdapter, StatusError, DEFAULT_STATUS_PATH};
pub use traced::{TracedKvStore, TracedRebootAdapter};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use kv::{FakeKvStore, KvCall};
#[cfg(any(test, feature = "test-support"))]
pub use reboot::FakeRebootAdapter;
#[cfg(any(test, feature = "test-support"))]
pub use signal::FakeRebootSignal;
#[cfg(any(test, feature = "test-support"))]
pub use status::FakeStateAdapter;
