// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exponential retry schedule for lock acquisition and release
//!
//! The interval doubles before every wait and is capped. There is no jitter:
//! machines that fail together retry together.

use std::time::Duration;

/// First interval before doubling
pub const INITIAL_INTERVAL: Duration = Duration::from_secs(5);

/// Upper bound on any single wait
pub const MAX_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Double `interval`, capped at `max`
pub fn expand(interval: Duration, max: Duration) -> Duration {
    interval.saturating_mul(2).min(max)
}

/// Doubling backoff state
#[derive(Clone, Debug)]
pub struct Backoff {
    current: Duration,
    max: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(INITIAL_INTERVAL, MAX_INTERVAL)
    }
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            current: initial,
            max,
        }
    }

    /// The interval the last call to `next_interval` produced
    pub fn current(&self) -> Duration {
        self.current
    }

    /// Double the interval and return it
    pub fn next_interval(&mut self) -> Duration {
        self.current = expand(self.current, self.max);
        self.current
    }
}

impl Iterator for Backoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        Some(self.next_interval())
    }
}

#[cfg(test)]
#[path = "backoff_tests.rs"]
mod tests;
