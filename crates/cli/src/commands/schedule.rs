// SPDX-License-Identifier: MIT

//! `opsctl schedule [--dome] [--tel] <file>` (spec §6 CLI surface, the
//! `--dome`/`--tel` partial-apply flags).
//!
//! With neither flag, the whole document is sent as-is. `--dome` sends
//! only the dome window (actions dropped); `--tel` sends only the actions
//! (dome window dropped). Passing both is equivalent to passing neither.

use std::path::Path;

use obs_wire::{Request, Response, ScheduleDoc};

use crate::client::send;
use crate::exit_error::ExitError;

pub fn run(host: &str, file: &Path, dome_only: bool, tel_only: bool) -> Result<(), ExitError> {
    let json = std::fs::read_to_string(file).map_err(|e| ExitError::local(format!("reading {}: {e}", file.display())))?;
    let mut schedule: ScheduleDoc =
        serde_json::from_str(&json).map_err(|e| ExitError::local(format!("malformed schedule JSON: {e}")))?;

    if dome_only && !tel_only {
        schedule.actions = None;
    } else if tel_only && !dome_only {
        schedule.dome = None;
    }

    match send(host, &Request::ScheduleObservations { schedule })? {
        Response::Command(status) if status.is_success() => Ok(()),
        Response::Command(status) => Err(ExitError::from_status(&status)),
        other => Err(ExitError::local(format!("unexpected response: {other:?}"))),
    }
}
