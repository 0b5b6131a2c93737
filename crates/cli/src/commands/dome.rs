// SPDX-License-Identifier: MIT

//! `opsctl dome (open|close|auto|manual)` (spec §6 CLI surface).
//!
//! The RPC surface has no direct "open the dome now" call -- only mode
//! control and window scheduling. `open` is sugar for scheduling a window
//! that starts immediately and runs long enough to cover a session;
//! `close` is sugar for clearing whatever window is active, which causes
//! the dome controller to command a close on its next tick.

use chrono::{Duration, Utc};
use clap::Subcommand;
use obs_wire::{DomeWindowDoc, Request, Response, ScheduleDoc};

use crate::client::send;
use crate::exit_error::ExitError;

/// How long an `opsctl dome open` window stays open if nothing clears it.
const OPEN_SESSION: Duration = Duration::hours(12);

#[derive(Subcommand)]
pub enum DomeCommand {
    /// Open the dome now, for one observing session.
    Open,
    /// Close the dome now (clears any active open window).
    Close,
    /// Put the dome under automatic (scheduled) control.
    Auto,
    /// Put the dome under manual control (requires it to be closed).
    Manual,
}

pub fn run(host: &str, command: DomeCommand) -> Result<(), ExitError> {
    let request = match command {
        DomeCommand::Open => {
            let now = Utc::now();
            Request::ScheduleObservations {
                schedule: ScheduleDoc {
                    night: None,
                    dome: Some(DomeWindowDoc { open: now.to_rfc3339(), close: (now + OPEN_SESSION).to_rfc3339() }),
                    actions: None,
                },
            }
        }
        DomeCommand::Close => Request::ClearDomeWindow,
        DomeCommand::Auto => Request::DomeControl { auto: true },
        DomeCommand::Manual => Request::DomeControl { auto: false },
    };

    match send(host, &request)? {
        Response::Command(status) if status.is_success() => Ok(()),
        Response::Command(status) => Err(ExitError::from_status(&status)),
        other => Err(ExitError::local(format!("unexpected response: {other:?}"))),
    }
}
