// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! obs-daemon: the `opsd` binary's library half -- the environment watcher,
//! dome and telescope controllers, the RPC listener, and the
//! `OperationsDaemon` that composes them (spec §4, §5).

pub mod daemon;
pub mod dome;
pub mod environment;
pub mod listener;
pub mod telescope;

pub use daemon::OperationsDaemon;
pub use dome::DomeController;
pub use environment::EnvironmentWatcher;
pub use telescope::TelescopeController;
