// SPDX-License-Identifier: MIT

//! The telescope's ordered action queue (spec §3 `ActionQueue`).
//!
//! Invariants enforced here: at most one action is `Running` at a time,
//! actions execute strictly in insertion order, and aborting drains
//! not-yet-started actions as `Aborted` without ever calling `start`/`step`
//! on them.

use crate::action::{Action, ActionState, ActionStatus, ActionStep, HeaderMap};
use crate::id::ActionId;

struct QueueEntry {
    id: ActionId,
    /// `Some` while the action is live (not yet reached a terminal state);
    /// dropped once terminal to free its resources, per spec §3 Lifetimes.
    action: Option<Box<dyn Action>>,
    /// Last known status, kept around after the action is dropped so
    /// `status()` can still report the full plan.
    snapshot: Option<ActionStatus>,
}

/// Ordered queue of telescope actions, owned by the telescope controller.
#[derive(Default)]
pub struct ActionQueue {
    entries: Vec<QueueEntry>,
    /// Index of the next action to start (or the currently running one).
    cursor: usize,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self { entries: Vec::new(), cursor: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Append an action to the back of the queue.
    pub fn push(&mut self, action: Box<dyn Action>) -> ActionId {
        let id = ActionId::new();
        self.entries.push(QueueEntry { id: id.clone(), action: Some(action), snapshot: None });
        id
    }

    /// Whether there is nothing left to run (everything finished or queue empty).
    pub fn is_idle(&self) -> bool {
        self.cursor >= self.entries.len()
    }

    /// Id of the action at the cursor, if any (running or about to start).
    pub fn current_id(&self) -> Option<&ActionId> {
        self.entries.get(self.cursor).map(|e| &e.id)
    }

    /// Start the action at the cursor, if one is waiting. No-op if the
    /// queue is idle or the current entry has already been started.
    pub fn start_next(&mut self) -> bool {
        match self.entries.get_mut(self.cursor) {
            Some(entry) => match entry.action.as_mut() {
                Some(action) => {
                    action.start();
                    true
                }
                None => false,
            },
            None => false,
        }
    }

    /// Drive one cooperative step of the action at the cursor. Advances the
    /// cursor and records a snapshot when the action reaches a terminal
    /// state. Returns `None` if the queue is idle.
    pub fn step_running(&mut self) -> Option<ActionState> {
        let entry = self.entries.get_mut(self.cursor)?;
        let action = entry.action.as_mut()?;
        match action.step() {
            ActionStep::Continue => None,
            ActionStep::Finished(state) => {
                let mut status = action.status();
                status.state = state;
                entry.snapshot = Some(status);
                entry.action = None;
                self.cursor += 1;
                Some(state)
            }
        }
    }

    /// Request graceful abort of the currently running action, if any.
    /// Idempotent: safe to call every tick while the abort is in flight.
    pub fn abort_running(&mut self) {
        if let Some(entry) = self.entries.get_mut(self.cursor) {
            if let Some(action) = entry.action.as_mut() {
                action.abort();
            }
        }
    }

    /// Mark every not-yet-started action (everything after the cursor) as
    /// `Aborted` without ever running it. Does not touch the action at the
    /// cursor itself -- the caller must abort/step that one to completion
    /// first, then call this to drain the rest.
    pub fn drain_remaining_as_aborted(&mut self) {
        let start = self.cursor + 1;
        for entry in self.entries.iter_mut().skip(start) {
            if let Some(action) = entry.action.take() {
                let mut status = action.status();
                status.state = ActionState::Aborted;
                entry.snapshot = Some(status);
            }
        }
        self.cursor = self.entries.len();
    }

    /// Forward a dome-open-changed notification to the running action.
    pub fn notify_dome_is_open_changed(&mut self, open: bool) {
        if let Some(entry) = self.entries.get_mut(self.cursor) {
            if let Some(action) = entry.action.as_mut() {
                action.dome_is_open_changed(open);
            }
        }
    }

    /// Forward a processed-frame notification to the running action, if
    /// any. Returns an empty header map if nothing is running.
    pub fn notify_processed_frame(&mut self, headers: &HeaderMap) -> HeaderMap {
        match self.entries.get_mut(self.cursor).and_then(|e| e.action.as_mut()) {
            Some(action) => action.notify_processed_frame(headers),
            None => HeaderMap::new(),
        }
    }

    /// Forward a guide-profile notification to the running action, if any.
    pub fn notify_guide_profile(&mut self, headers: &HeaderMap, x: &[f64], y: &[f64]) -> HeaderMap {
        match self.entries.get_mut(self.cursor).and_then(|e| e.action.as_mut()) {
            Some(action) => action.notify_guide_profile(headers, x, y),
            None => HeaderMap::new(),
        }
    }

    /// Status snapshot of every action in the queue, in order.
    pub fn statuses(&self) -> Vec<ActionStatus> {
        self.entries
            .iter()
            .map(|e| match (&e.action, &e.snapshot) {
                (Some(action), _) => action.status(),
                (None, Some(snapshot)) => snapshot.clone(),
                (None, None) => ActionStatus {
                    name: "unknown".to_string(),
                    tasks: Vec::new(),
                    state: ActionState::Pending,
                },
            })
            .collect()
    }

    /// True iff exactly one entry currently reports `Running`.
    pub fn running_count(&self) -> usize {
        self.statuses().iter().filter(|s| s.state == ActionState::Running).count()
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
