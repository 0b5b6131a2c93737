// SPDX-License-Identifier: MIT

//! `opsctl status` / `opsctl json`: fetch and print the daemon's full
//! status payload (spec §6).

use obs_wire::{Request, Response, StatusPayload};

use crate::client::send;
use crate::exit_error::ExitError;

pub fn status(host: &str, as_json: bool) -> Result<(), ExitError> {
    let payload = fetch(host)?;
    if as_json {
        let json = serde_json::to_string_pretty(&payload).map_err(|e| ExitError::local(e.to_string()))?;
        println!("{json}");
    } else {
        print_human(&payload);
    }
    Ok(())
}

fn fetch(host: &str) -> Result<StatusPayload, ExitError> {
    match send(host, &Request::Status)? {
        Response::Status(payload) => Ok(payload),
        other => Err(ExitError::local(format!("unexpected response to status request: {other:?}"))),
    }
}

fn print_human(payload: &StatusPayload) {
    println!(
        "environment: {} (updated {})",
        if payload.environment.safe { "safe" } else { "unsafe" },
        payload.environment.updated.to_rfc3339()
    );
    for (label, readings) in &payload.environment.conditions {
        for reading in readings {
            let flags = match (reading.unsafe_, reading.stale) {
                (true, true) => " [unsafe, stale]",
                (true, false) => " [unsafe]",
                (false, true) => " [stale]",
                (false, false) => "",
            };
            println!("  {label}/{}: {}{flags}", reading.label, reading.value);
        }
    }

    match &payload.dome {
        Some(dome) => println!(
            "dome: mode={:?} requested_mode={:?} status={:?}",
            dome.mode, dome.requested_mode, dome.status
        ),
        None => println!("dome: not configured"),
    }

    println!(
        "telescope: mode={:?} requested_mode={:?}",
        payload.telescope.mode, payload.telescope.requested_mode
    );
    if payload.telescope.schedule.is_empty() {
        println!("  queue is empty");
    }
    for action in &payload.telescope.schedule {
        println!("  {}: {:?}", action.name, action.state);
    }
}
