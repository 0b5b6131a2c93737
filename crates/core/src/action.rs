// SPDX-License-Identifier: MIT

//! The `Action` capability set (spec §3/§9): the core's sole extensibility
//! seam for telescope behaviour. Concrete actions (point-and-track,
//! skyflats, autofocus...) are deliberately out of scope; this module only
//! defines the interface the telescope worker drives.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Arbitrary string-or-number header payload exchanged with the pipeline.
pub type HeaderMap = BTreeMap<String, serde_json::Value>;

/// Lifecycle state of a single action, as reported by `status()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionState {
    Pending,
    Running,
    Complete,
    Aborted,
    Error,
}

impl ActionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, ActionState::Complete | ActionState::Aborted | ActionState::Error)
    }
}

crate::simple_display! {
    ActionState {
        Pending => "pending",
        Running => "running",
        Complete => "complete",
        Aborted => "aborted",
        Error => "error",
    }
}

/// A single task line in an action's status, either a plain description or
/// a sub-list of them (spec §3: `string | list-of-string`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskDescriptor {
    Single(String),
    Group(Vec<String>),
}

impl From<&str> for TaskDescriptor {
    fn from(s: &str) -> Self {
        TaskDescriptor::Single(s.to_string())
    }
}

/// Snapshot of an action's progress, as returned by `Action::status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionStatus {
    pub name: String,
    pub tasks: Vec<TaskDescriptor>,
    pub state: ActionState,
}

/// The result of driving one cooperative step of an action.
pub enum ActionStep {
    /// The action has more work to do; call `step` again.
    Continue,
    /// The action has reached a terminal state.
    Finished(ActionState),
}

/// Capability set the core requires of every telescope action (spec §3).
///
/// Implementations must not share mutable state with other actions; all
/// coupling goes through the controller that owns the queue.
pub trait Action: Send {
    /// Human-readable action name, as shown in `status()`.
    fn name(&self) -> &str;

    /// Begin execution. Called once when the action transitions from
    /// `Pending` to `Running`.
    fn start(&mut self);

    /// Execute one cooperative step. Implementations must check their own
    /// abort flag at least once per step and return promptly -- the spec
    /// requires checkpoints at least once per second of wall time.
    fn step(&mut self) -> ActionStep;

    /// Request immediate graceful stop. Idempotent: calling this more than
    /// once, or after the action has already finished, has no extra effect.
    fn abort(&mut self);

    /// Current status snapshot.
    fn status(&self) -> ActionStatus;

    /// Called by the controller whenever the dome's open/closed state
    /// changes, so actions that assume the dome is open can self-abort.
    fn dome_is_open_changed(&mut self, open: bool);

    /// A processed-frame notification arrived from the pipeline while this
    /// action was running. Returns any extra header entries to merge back.
    fn notify_processed_frame(&mut self, headers: &HeaderMap) -> HeaderMap;

    /// A guide-profile notification arrived from the pipeline. `x`/`y` are
    /// parallel numeric arrays (spec §9: numeric-array transport).
    fn notify_guide_profile(&mut self, headers: &HeaderMap, x: &[f64], y: &[f64]) -> HeaderMap;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(ActionState::Complete.is_terminal());
        assert!(ActionState::Aborted.is_terminal());
        assert!(ActionState::Error.is_terminal());
        assert!(!ActionState::Pending.is_terminal());
        assert!(!ActionState::Running.is_terminal());
    }

    #[test]
    fn task_descriptor_serializes_untagged() {
        let single = TaskDescriptor::Single("slew".into());
        let group = TaskDescriptor::Group(vec!["expose".into(), "readout".into()]);
        assert_eq!(serde_json::to_string(&single).unwrap(), "\"slew\"");
        assert_eq!(serde_json::to_string(&group).unwrap(), "[\"expose\",\"readout\"]");
    }
}
