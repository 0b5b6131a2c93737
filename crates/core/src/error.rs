// SPDX-License-Identifier: MIT

//! Error types shared by the core state machines.

use thiserror::Error;

/// Errors a backend (dome hardware, environment daemon) can report up
/// through the controllers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("backend command timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("backend reported a hardware error: {0}")]
    HardwareError(String),

    #[error("backend unreachable: {0}")]
    Unreachable(String),
}

/// Errors surfaced by the core domain (not backend I/O).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid dome open window: {0}")]
    InvalidWindow(String),

    #[error("action queue already has a running action")]
    QueueBusy,

    #[error("no action is currently running")]
    NoRunningAction,
}
