// SPDX-License-Identifier: MIT

//! `opsctl tel (auto|manual|stop)` (spec §6 CLI surface).

use clap::Subcommand;
use obs_wire::{Request, Response};

use crate::client::send;
use crate::exit_error::ExitError;

#[derive(Subcommand)]
pub enum TelCommand {
    /// Put the telescope under automatic (scheduled) control.
    Auto,
    /// Put the telescope under manual control, aborting any running action.
    Manual,
    /// Abort the in-progress action and drain the queue, without changing mode.
    Stop,
}

pub fn run(host: &str, command: TelCommand) -> Result<(), ExitError> {
    let request = match command {
        TelCommand::Auto => Request::TelControl { auto: true },
        TelCommand::Manual => Request::TelControl { auto: false },
        TelCommand::Stop => Request::StopTelescope,
    };

    match send(host, &request)? {
        Response::Command(status) if status.is_success() => Ok(()),
        Response::Command(status) => Err(ExitError::from_status(&status)),
        other => Err(ExitError::local(format!("unexpected response: {other:?}"))),
    }
}
