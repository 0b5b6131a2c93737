// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! obs-backends: the hardware/process boundary. Concrete dome and
//! environment integrations, and concrete action implementations, are out
//! of scope (spec Non-goals) -- this crate defines the traits the daemon
//! drives, fakes for testing, and the module registries that resolve
//! config-time names to constructors.

pub mod actions;
pub mod dome;
pub mod environment;
pub mod registry;

pub use dome::DomeBackend;
pub use environment::EnvironmentSource;
pub use registry::{StaticActionRegistry, StaticDomeRegistry};
