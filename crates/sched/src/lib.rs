// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! obs-sched: schedule validation and the low-precision night-bounds
//! calculation it depends on. Pure functions only -- no I/O, no locking,
//! no knowledge of the daemon's threads.

pub mod ephemeris;
pub mod validate;

pub use ephemeris::night_start_end;
pub use validate::{parse_dome_window, parse_schedule, parse_schedule_actions, validate_schedule, ParsedAction, ParsedSchedule};
