// SPDX-License-Identifier: MIT

//! Clock abstraction for testable time handling.
//!
//! Two notions of time are exposed and never mixed (spec §9 "Clock"):
//! `now()` is a monotonic [`Instant`] used for ages, timeouts, and
//! durations; `utc_now()` is a wall-clock [`DateTime<Utc>`] used for
//! absolute timestamps that cross the RPC boundary (schedule windows,
//! `status()` fields).

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A clock that provides the current time.
pub trait Clock: Clone + Send + Sync {
    fn now(&self) -> Instant;
    fn utc_now(&self) -> DateTime<Utc>;
}

/// Real system clock.
#[derive(Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn utc_now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fake clock for testing with controllable time.
#[derive(Clone)]
pub struct FakeClock {
    monotonic: Arc<Mutex<Instant>>,
    wall: Arc<Mutex<DateTime<Utc>>>,
}

impl FakeClock {
    pub fn new(wall_start: DateTime<Utc>) -> Self {
        Self { monotonic: Arc::new(Mutex::new(Instant::now())), wall: Arc::new(Mutex::new(wall_start)) }
    }

    /// Advance both the monotonic and wall clocks by the same duration.
    pub fn advance(&self, duration: Duration) {
        *self.monotonic.lock() += duration;
        *self.wall.lock() += duration;
    }

    pub fn set_utc(&self, wall: DateTime<Utc>) {
        *self.wall.lock() = wall;
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        *self.monotonic.lock()
    }

    fn utc_now(&self) -> DateTime<Utc> {
        *self.wall.lock()
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
