// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! obs-core: domain model for the observatory operations daemon.
//!
//! This crate has no knowledge of config parsing, RPC transports, or
//! concrete backends -- those live in `obs-config`, `obs-wire`, and
//! `obs-backends`. It defines the state machines and invariants that the
//! rest of the workspace builds on: dome/telescope modes, the environment
//! snapshot, the action queue, and the `CommandStatus` taxonomy.

pub mod macros;

pub mod action;
pub mod clock;
pub mod command;
pub mod dome;
pub mod environment;
pub mod error;
pub mod id;
pub mod mode;
pub mod queue;
pub mod registry;
pub mod telescope;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use action::{Action, ActionState, ActionStatus, TaskDescriptor};
pub use clock::{Clock, FakeClock, SystemClock};
pub use command::CommandStatus;
pub use dome::{DomeIntent, DomeOpenWindow, DomeState, DomeStatus};
pub use environment::{EnvironmentCondition, EnvironmentSnapshot, RawSensorReading, SensorReading};
pub use error::{BackendError, CoreError};
pub use id::ActionId;
pub use mode::OperationsMode;
pub use queue::ActionQueue;
pub use registry::{ActionModuleRegistry, ActionParamSchema, DomeModuleRegistry, ParamType};
pub use telescope::TelescopeState;
