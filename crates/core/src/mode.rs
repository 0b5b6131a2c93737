// SPDX-License-Identifier: MIT

//! Controller operating mode, shared by the dome and telescope controllers.

use serde::{Deserialize, Serialize};

/// Mode of a controller (dome or telescope).
///
/// `Offline` is used only where a controller has no backend configured;
/// it is never a target of an operator-requested transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationsMode {
    Manual,
    Automatic,
    Error,
    Offline,
}

impl OperationsMode {
    pub fn is_error(self) -> bool {
        matches!(self, OperationsMode::Error)
    }

    pub fn is_automatic(self) -> bool {
        matches!(self, OperationsMode::Automatic)
    }
}

crate::simple_display! {
    OperationsMode {
        Manual => "manual",
        Automatic => "automatic",
        Error => "error",
        Offline => "offline",
    }
}
