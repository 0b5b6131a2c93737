// SPDX-License-Identifier: MIT

//! An error that carries the process exit code it should produce.
//!
//! Subcommands return `ExitError` instead of calling `std::process::exit`
//! directly, so `main` is the only place the process actually terminates
//! (spec §6: 0 on success, 1 on local error, otherwise the CommandStatus
//! numeric code).

use std::fmt;

use obs_core::CommandStatus;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn local(message: impl Into<String>) -> Self {
        Self { code: 1, message: message.into() }
    }

    pub fn from_status(status: &CommandStatus) -> Self {
        Self { code: status.code(), message: status.message() }
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

impl From<anyhow::Error> for ExitError {
    fn from(err: anyhow::Error) -> Self {
        Self::local(err.to_string())
    }
}
