// SPDX-License-Identifier: MIT

//! `opsctl validate <file>` (spec §6 CLI surface).
//!
//! Runs entirely client-side: `validate_schedule` is a pure function, and
//! there is no RPC for a dry-run against the live daemon. Validates
//! against the same config file the daemon itself would load, so action
//! types and the site's ephemeris bounds match what a real
//! `schedule_observations` call would see.

use std::path::Path;

use obs_wire::ScheduleDoc;

use super::registries::{build_action_registry, build_dome_registry};
use crate::exit_error::ExitError;

pub fn run(config_path: &Path, schedule_path: &Path) -> Result<(), ExitError> {
    let config_json = std::fs::read_to_string(config_path)
        .map_err(|e| ExitError::local(format!("reading {}: {e}", config_path.display())))?;
    let schedule_json = std::fs::read_to_string(schedule_path)
        .map_err(|e| ExitError::local(format!("reading {}: {e}", schedule_path.display())))?;

    let action_registry = build_action_registry();
    let dome_registry = build_dome_registry();

    let config = obs_config::Config::load(&config_json, &action_registry, &dome_registry).map_err(|errors| {
        let joined = errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ");
        ExitError::local(format!("invalid configuration: {joined}"))
    })?;

    let doc: ScheduleDoc =
        serde_json::from_str(&schedule_json).map_err(|e| ExitError::local(format!("malformed schedule JSON: {e}")))?;

    let (ok, errors) = obs_sched::validate_schedule(&doc, &config.site, &action_registry, true);
    if ok {
        println!("schedule is valid");
        Ok(())
    } else {
        for error in &errors {
            eprintln!("  - {error}");
        }
        Err(ExitError::local(format!("schedule is invalid ({} error(s))", errors.len())))
    }
}
