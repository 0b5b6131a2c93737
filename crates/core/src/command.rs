// SPDX-License-Identifier: MIT

//! `CommandStatus` taxonomy returned by every mutating RPC (spec §6).

use serde::{Deserialize, Serialize};

/// Outcome of a mutating command, with a human-readable message for client
/// display. Numeric codes mirror the reference implementation's taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum CommandStatus {
    Succeeded,
    Failed(String),
    Blocked,
    InErrorState,
    DomeNotClosed,
    DomeNotAutomatic,
    TelescopeNotAutomatic,
    EnvironmentNotSafe,
    InvalidSchedule(Vec<String>),
    InvalidControlIp,
    CommunicationError(String),
}

impl CommandStatus {
    /// Numeric code matching the reference implementation.
    pub fn code(&self) -> i32 {
        match self {
            CommandStatus::Succeeded => 0,
            CommandStatus::Failed(_) => 1,
            CommandStatus::Blocked => 2,
            CommandStatus::InErrorState => 3,
            CommandStatus::DomeNotClosed => 4,
            CommandStatus::DomeNotAutomatic => 5,
            CommandStatus::TelescopeNotAutomatic => 6,
            CommandStatus::EnvironmentNotSafe => 7,
            CommandStatus::InvalidSchedule(_) => 8,
            CommandStatus::InvalidControlIp => 9,
            CommandStatus::CommunicationError(_) => -101,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CommandStatus::Succeeded)
    }

    /// Human-readable message for CLI display.
    pub fn message(&self) -> String {
        match self {
            CommandStatus::Succeeded => "succeeded".to_string(),
            CommandStatus::Failed(m) => m.clone(),
            CommandStatus::Blocked => "another command is in progress".to_string(),
            CommandStatus::InErrorState => {
                "controller is in an error state; acknowledge before proceeding".to_string()
            }
            CommandStatus::DomeNotClosed => "dome is not closed".to_string(),
            CommandStatus::DomeNotAutomatic => "dome is not in automatic mode".to_string(),
            CommandStatus::TelescopeNotAutomatic => "telescope is not in automatic mode".to_string(),
            CommandStatus::EnvironmentNotSafe => "environment is not safe".to_string(),
            CommandStatus::InvalidSchedule(errors) => format!("invalid schedule: {}", errors.join("; ")),
            CommandStatus::InvalidControlIp => "caller is not an authorized control machine".to_string(),
            CommandStatus::CommunicationError(m) => format!("communication error: {m}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_reference_taxonomy() {
        assert_eq!(CommandStatus::Succeeded.code(), 0);
        assert_eq!(CommandStatus::Failed("x".into()).code(), 1);
        assert_eq!(CommandStatus::CommunicationError("x".into()).code(), -101);
    }

    #[test]
    fn only_succeeded_is_success() {
        assert!(CommandStatus::Succeeded.is_success());
        assert!(!CommandStatus::Blocked.is_success());
    }
}
