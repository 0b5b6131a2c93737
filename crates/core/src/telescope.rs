// SPDX-License-Identifier: MIT

//! Telescope controller state (mode only; the action queue is owned and
//! driven separately by the worker thread, see `ActionQueue`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mode::OperationsMode;

/// Persisted state of the telescope controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelescopeState {
    pub mode: OperationsMode,
    pub requested_mode: OperationsMode,
    pub status_updated: DateTime<Utc>,
}

impl TelescopeState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { mode: OperationsMode::Manual, requested_mode: OperationsMode::Manual, status_updated: now }
    }
}
