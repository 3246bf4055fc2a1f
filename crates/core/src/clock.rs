// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable wall-clock handling
//!
//! Maintenance windows are defined in local wall-clock time, so the clock
//! hands out zoned timestamps rather than monotonic instants. The zone stays
//! attached so window arithmetic follows DST changes.

use chrono::{DateTime, FixedOffset, Local, TimeDelta, TimeZone};
use std::sync::{Arc, Mutex};

/// A clock that provides the current wall-clock time
pub trait Clock: Clone + Send + Sync + 'static {
    type Tz: TimeZone + Send + Sync + 'static;

    fn now(&self) -> DateTime<Self::Tz>;
}

/// Real system clock in the local time zone
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    type Tz = Local;

    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Fake clock for testing with controllable time
#[derive(Clone, Debug)]
pub struct FakeClock {
    current: Arc<Mutex<DateTime<FixedOffset>>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self::at(Local::now().fixed_offset())
    }

    /// Create a clock frozen at the given time
    pub fn at(time: DateTime<FixedOffset>) -> Self {
        Self {
            current: Arc::new(Mutex::new(time)),
        }
    }

    /// Advance the clock by the given duration
    pub fn advance(&self, delta: TimeDelta) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current += delta;
    }

    /// Set the clock to a specific time
    pub fn set(&self, time: DateTime<FixedOffset>) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current = time;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    type Tz = FixedOffset;

    fn now(&self) -> DateTime<FixedOffset> {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
