// SPDX-License-Identifier: MIT

use thiserror::Error;

/// A single config validation failure, with enough context to report to an
/// operator. `Config::load` collects every failure rather than stopping at
/// the first (mirrors `validate_schedule`'s `(ok, errors[])` shape).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("failed to parse config JSON: {0}")]
    Malformed(String),

    #[error("missing required field '{0}'")]
    MissingField(String),

    #[error("field '{field}' has an invalid value: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("unknown actions module '{0}'")]
    UnknownActionsModule(String),

    #[error("unknown dome module '{0}'")]
    UnknownDomeModule(String),

    #[error("control_machines entry '{0}' is not a valid IP address")]
    InvalidControlMachine(String),

    #[error("pipeline_machines entry '{0}' is not a valid IP address")]
    InvalidPipelineMachine(String),
}
