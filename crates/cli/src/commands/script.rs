// SPDX-License-Identifier: MIT

//! `opsctl script <name> [args...]` (spec §6 CLI surface).
//!
//! Runs a named operator script (site-local automation that typically
//! shells back out to `opsctl` itself for individual steps), resolved
//! against the `scripts_module` directory from the daemon's config. This
//! never touches the daemon's RPC surface directly.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::exit_error::ExitError;

pub fn run(scripts_dir: &Path, name: &str, args: &[String]) -> Result<(), ExitError> {
    let script_path: PathBuf = scripts_dir.join(name);
    if !script_path.is_file() {
        return Err(ExitError::local(format!("no such script '{name}' in {}", scripts_dir.display())));
    }

    let status = Command::new(&script_path)
        .args(args)
        .status()
        .map_err(|e| ExitError::local(format!("running {}: {e}", script_path.display())))?;

    if status.success() {
        Ok(())
    } else {
        Err(ExitError { code: status.code().unwrap_or(1), message: format!("script '{name}' exited with failure") })
    }
}
