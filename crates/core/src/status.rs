// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Update status and coordinator lifecycle states

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operation name reported once an update is installed and needs a reboot
pub const UPDATED_NEED_REBOOT: &str = "UPDATE_STATUS_UPDATED_NEED_REBOOT";

/// Operation name reported while nothing is pending
pub const IDLE: &str = "UPDATE_STATUS_IDLE";

/// Snapshot of the local update machinery
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateStatus {
    pub last_checked_time: i64,
    pub progress: f64,
    pub current_operation: String,
    pub new_version: String,
    pub new_size: i64,
}

impl UpdateStatus {
    pub fn idle() -> Self {
        Self {
            current_operation: IDLE.to_string(),
            ..Self::default()
        }
    }

    pub fn need_reboot(new_version: impl Into<String>) -> Self {
        Self {
            current_operation: UPDATED_NEED_REBOOT.to_string(),
            new_version: new_version.into(),
            ..Self::default()
        }
    }

    pub fn needs_reboot(&self) -> bool {
        self.current_operation == UPDATED_NEED_REBOOT
    }
}

impl fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LastCheckedTime={} Progress={} CurrentOperation={:?} NewVersion={} NewSize={}",
            self.last_checked_time,
            self.progress,
            self.current_operation,
            self.new_version,
            self.new_size
        )
    }
}

/// Externally observable coordinator lifecycle phase
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoordinatorState {
    Starting,
    /// Running but intentionally never rebooting
    Disabled,
    Running,
    /// A reboot will happen once the lock and window allow it
    RebootPlanned,
    Rebooting,
}

impl CoordinatorState {
    pub fn as_str(self) -> &'static str {
        match self {
            CoordinatorState::Starting => "starting",
            CoordinatorState::Disabled => "disabled",
            CoordinatorState::Running => "running",
            CoordinatorState::RebootPlanned => "reboot-planned",
            CoordinatorState::Rebooting => "rebooting",
        }
    }
}

impl fmt::Display for CoordinatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
