// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reboot strategy selection
//!
//! The strategy is fixed for the daemon's lifetime. The deprecated
//! `best-effort` name is mapped onto one of the fixed strategies once, at
//! startup, instead of probing the store on every reboot.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StrategyError {
    #[error("unknown reboot strategy: {0:?}")]
    Unknown(String),
}

/// How the daemon decides whether to take the cluster lock before rebooting
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Never reboot
    Off,
    /// Reboot as soon as a reboot is needed, without locking
    Reboot,
    /// Hold the cluster-wide semaphore while rebooting
    EtcdLock,
}

/// A strategy name as configured, before resolution
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyName {
    Fixed(Strategy),
    /// Deprecated; resolves to `EtcdLock` or `Reboot`
    BestEffort,
}

impl std::str::FromStr for StrategyName {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "off" => Ok(StrategyName::Fixed(Strategy::Off)),
            "reboot" => Ok(StrategyName::Fixed(Strategy::Reboot)),
            "etcd-lock" => Ok(StrategyName::Fixed(Strategy::EtcdLock)),
            "best-effort" | "" => Ok(StrategyName::BestEffort),
            other => Err(StrategyError::Unknown(other.to_string())),
        }
    }
}

impl StrategyName {
    /// Resolve to a fixed strategy
    ///
    /// `best-effort` locks when the store was explicitly configured and
    /// reboots unconditionally otherwise.
    pub fn resolve(self, store_configured: bool) -> Strategy {
        match self {
            StrategyName::Fixed(strategy) => strategy,
            StrategyName::BestEffort if store_configured => Strategy::EtcdLock,
            StrategyName::BestEffort => Strategy::Reboot,
        }
    }

    pub fn is_deprecated(self) -> bool {
        matches!(self, StrategyName::BestEffort)
    }
}

impl Strategy {
    /// Whether this strategy takes the cluster lock
    pub fn uses_lock(self) -> bool {
        matches!(self, Strategy::EtcdLock)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Off => "off",
            Strategy::Reboot => "reboot",
            Strategy::EtcdLock => "etcd-lock",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "strategy_tests.rs"]
mod tests;
