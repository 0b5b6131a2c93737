// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use obs_core::action::HeaderMap;
use obs_core::{ActionStatus, CommandStatus, DomeState, EnvironmentSnapshot, OperationsMode, SensorReading, TelescopeState};
use serde::{Deserialize, Serialize};

/// RPC response from the daemon. `status()` gets its own payload shape;
/// every mutating RPC returns a `CommandStatus`; the two pipeline
/// notifications return an optional extra-header map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Response {
    Status(StatusPayload),
    Command(CommandStatus),
    Headers(Option<HeaderMap>),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnvironmentStatusPayload {
    pub updated: DateTime<Utc>,
    pub safe: bool,
    pub conditions: BTreeMap<String, Vec<SensorReading>>,
}

impl From<&EnvironmentSnapshot> for EnvironmentStatusPayload {
    fn from(snap: &EnvironmentSnapshot) -> Self {
        let conditions = snap
            .conditions
            .iter()
            .map(|(label, condition)| (label.clone(), condition.sensors.clone()))
            .collect();
        EnvironmentStatusPayload { updated: snap.updated, safe: snap.safe, conditions }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DomeStatusPayload {
    pub mode: OperationsMode,
    pub requested_mode: OperationsMode,
    pub status: obs_core::DomeStatus,
    pub status_updated: DateTime<Utc>,
    pub requested_open_date: Option<DateTime<Utc>>,
    pub requested_close_date: Option<DateTime<Utc>>,
}

impl From<&DomeState> for DomeStatusPayload {
    fn from(state: &DomeState) -> Self {
        DomeStatusPayload {
            mode: state.mode,
            requested_mode: state.requested_mode,
            status: state.status,
            status_updated: state.status_updated,
            requested_open_date: state.requested_open_at(),
            requested_close_date: state.requested_close_at(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TelescopeStatusPayload {
    pub mode: OperationsMode,
    pub requested_mode: OperationsMode,
    pub status_updated: DateTime<Utc>,
    pub schedule: Vec<ActionStatus>,
}

impl TelescopeStatusPayload {
    pub fn new(state: &TelescopeState, schedule: Vec<ActionStatus>) -> Self {
        TelescopeStatusPayload {
            mode: state.mode,
            requested_mode: state.requested_mode,
            status_updated: state.status_updated,
            schedule,
        }
    }
}

/// Full `status()` payload (spec §6).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusPayload {
    pub environment: EnvironmentStatusPayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dome: Option<DomeStatusPayload>,
    pub telescope: TelescopeStatusPayload,
}
