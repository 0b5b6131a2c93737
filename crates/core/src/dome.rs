// SPDX-License-Identifier: MIT

//! Dome status, open window, and the dome controller's persisted state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::mode::OperationsMode;

/// Status reported by the dome backend.
///
/// `Timeout`/`HardwareError` are sticky: they persist until an operator
/// clears them (by requesting `Automatic` again), they are never cleared
/// by a tick alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomeStatus {
    Closed,
    Open,
    Moving,
    Timeout,
    HardwareError,
}

crate::simple_display! {
    DomeStatus {
        Closed => "closed",
        Open => "open",
        Moving => "moving",
        Timeout => "timeout",
        HardwareError => "hardware_error",
    }
}

impl DomeStatus {
    pub fn is_sticky_fault(self) -> bool {
        matches!(self, DomeStatus::Timeout | DomeStatus::HardwareError)
    }
}

/// A scheduled interval during which the dome may open, if the
/// environment is safe. Invariant: `open_at < close_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomeOpenWindow {
    pub open_at: DateTime<Utc>,
    pub close_at: DateTime<Utc>,
}

impl DomeOpenWindow {
    pub fn new(open_at: DateTime<Utc>, close_at: DateTime<Utc>) -> Result<Self, CoreError> {
        if open_at >= close_at {
            return Err(CoreError::InvalidWindow(format!(
                "open_at ({open_at}) must be strictly before close_at ({close_at})"
            )));
        }
        Ok(Self { open_at, close_at })
    }

    /// Whether `now` falls inside `[open_at, close_at)`.
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        now >= self.open_at && now < self.close_at
    }

    /// Whether `now` is at or past `close_at` (the window should be cleared).
    pub fn has_elapsed(&self, now: DateTime<Utc>) -> bool {
        now >= self.close_at
    }
}

/// What the dome controller last commanded the backend to do, used to
/// decide whether to re-issue Open/Close on this tick (spec §9 open
/// question: remember intent, only re-issue on change).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomeIntent {
    Open,
    Close,
    Idle,
}

/// Persisted state of the dome controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomeState {
    pub mode: OperationsMode,
    pub requested_mode: OperationsMode,
    pub status: DomeStatus,
    pub status_updated: DateTime<Utc>,
    pub intent: DomeIntent,
    pub window: Option<DomeOpenWindow>,
    pub last_heartbeat_ack: Option<DateTime<Utc>>,
}

impl DomeState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            mode: OperationsMode::Manual,
            requested_mode: OperationsMode::Manual,
            status: DomeStatus::Closed,
            status_updated: now,
            intent: DomeIntent::Idle,
            window: None,
            last_heartbeat_ack: None,
        }
    }

    pub fn requested_open_at(&self) -> Option<DateTime<Utc>> {
        self.window.map(|w| w.open_at)
    }

    pub fn requested_close_at(&self) -> Option<DateTime<Utc>> {
        self.window.map(|w| w.close_at)
    }
}
