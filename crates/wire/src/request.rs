// SPDX-License-Identifier: MIT

use obs_core::action::HeaderMap;
use serde::{Deserialize, Serialize};

use crate::schedule::ScheduleDoc;

/// RPC request from the CLI (or any control/pipeline caller) to the daemon
/// (spec §6 RPC surface). Caller authorization is checked by the daemon
/// against the source address, not carried in the request body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Request {
    Status,
    DomeControl { auto: bool },
    TelControl { auto: bool },
    StopTelescope,
    ClearDomeWindow,
    ScheduleObservations { schedule: ScheduleDoc },
    NotifyProcessedFrame { headers: HeaderMap },
    NotifyGuideProfiles { headers: HeaderMap, x: Vec<f64>, y: Vec<f64> },
    /// Stop the daemon's tick and worker threads and exit the process.
    /// Not gated on the control-machine list: it is meant for local use by
    /// the reference CLI running alongside the daemon, not remote control.
    Shutdown,
}
