// SPDX-License-Identifier: MIT

//! DomeController (C3): owns dome mode/status, the open window, and the
//! heartbeat protocol (spec §4.2).

use std::sync::Arc;
use std::time::Instant;

use obs_backends::DomeBackend;
use obs_config::DomeConfig;
use obs_core::{Clock, CommandStatus, DomeIntent, DomeOpenWindow, DomeState, DomeStatus, OperationsMode};
use parking_lot::Mutex;

pub struct DomeController<C: Clock> {
    state: Mutex<DomeState>,
    backend: Arc<dyn DomeBackend>,
    config: DomeConfig,
    clock: C,
    movement_started: Mutex<Option<Instant>>,
}

impl<C: Clock> DomeController<C> {
    pub fn new(config: DomeConfig, backend: Arc<dyn DomeBackend>, clock: C) -> Self {
        let state = DomeState::new(clock.utc_now());
        Self { state: Mutex::new(state), backend, config, clock, movement_started: Mutex::new(None) }
    }

    pub fn status_snapshot(&self) -> DomeState {
        self.state.lock().clone()
    }

    /// Request a mode transition (spec §4.2 Transitions).
    pub fn request_mode(&self, requested: OperationsMode) -> CommandStatus {
        let mut state = self.state.lock();
        match requested {
            OperationsMode::Automatic => {
                state.requested_mode = OperationsMode::Automatic;
                state.mode = OperationsMode::Automatic;
                state.status_updated = self.clock.utc_now();
                CommandStatus::Succeeded
            }
            OperationsMode::Manual => {
                state.requested_mode = OperationsMode::Manual;
                if state.status == DomeStatus::Closed {
                    state.mode = OperationsMode::Manual;
                    state.status_updated = self.clock.utc_now();
                    CommandStatus::Succeeded
                } else {
                    // Leaves `mode`/`status` untouched; the next tick will
                    // command a close and complete the transition once the
                    // backend reports Closed.
                    CommandStatus::DomeNotClosed
                }
            }
            OperationsMode::Error | OperationsMode::Offline => {
                CommandStatus::Failed("dome mode can only be requested as automatic or manual".to_string())
            }
        }
    }

    /// Set the observing window. Fails if the dome is not in Automatic mode.
    pub fn set_window(&self, window: DomeOpenWindow) -> CommandStatus {
        let mut state = self.state.lock();
        if state.mode != OperationsMode::Automatic {
            return CommandStatus::DomeNotAutomatic;
        }
        state.window = Some(window);
        CommandStatus::Succeeded
    }

    /// Roll back a window set earlier in the same call (spec §4.5
    /// atomicity: action queueing failure rolls back the dome window).
    pub fn clear_window(&self) {
        self.state.lock().window = None;
    }

    /// Drive one tick: heartbeat, open-window reconciliation, timeout
    /// detection. Returns whether the dome is currently open, for the
    /// telescope controller's `dome_is_open_changed` coupling.
    pub fn tick(&self, env_safe: bool) -> bool {
        let mut state = self.state.lock();
        let now = self.clock.utc_now();

        if state.mode.is_error() {
            return state.status == DomeStatus::Open;
        }

        // Complete a pending Automatic -> Manual transition once closed.
        if state.requested_mode == OperationsMode::Manual && state.mode == OperationsMode::Automatic {
            self.command_if_intent_changed(&mut state, DomeIntent::Close);
            if let Err(e) = self.refresh_status(&mut state) {
                self.elevate_to_error(&mut state, &e.to_string());
                return state.status == DomeStatus::Open;
            }
            if state.status == DomeStatus::Closed {
                state.mode = OperationsMode::Manual;
                state.status_updated = now;
            }
        } else if state.mode == OperationsMode::Automatic {
            self.reconcile_window(&mut state, env_safe, now);
            if let Err(e) = self.refresh_status(&mut state) {
                self.elevate_to_error(&mut state, &e.to_string());
                return state.status == DomeStatus::Open;
            }
        }

        if let Err(e) = self.send_heartbeat(&state) {
            self.elevate_to_error(&mut state, &e.to_string());
        }

        self.check_movement_timeout(&mut state);

        state.status == DomeStatus::Open
    }

    fn reconcile_window(&self, state: &mut DomeState, env_safe: bool, now: chrono::DateTime<chrono::Utc>) {
        if let Some(window) = state.window {
            if window.has_elapsed(now) {
                state.window = None;
                self.command_if_intent_changed(state, DomeIntent::Close);
                return;
            }
            if window.contains(now) && env_safe {
                self.command_if_intent_changed(state, DomeIntent::Open);
            } else {
                self.command_if_intent_changed(state, DomeIntent::Close);
            }
        } else {
            self.command_if_intent_changed(state, DomeIntent::Close);
        }
    }

    fn command_if_intent_changed(&self, state: &mut DomeState, intent: DomeIntent) {
        if state.intent == intent {
            return;
        }
        let result = match intent {
            DomeIntent::Open => self.backend.open(),
            DomeIntent::Close | DomeIntent::Idle => self.backend.close(),
        };
        match result {
            Ok(()) => {
                state.intent = intent;
                *self.movement_started.lock() = Some(self.clock.now());
            }
            Err(e) => self.elevate_to_error(state, &e.to_string()),
        }
    }

    fn refresh_status(&self, state: &mut DomeState) -> Result<(), obs_core::error::BackendError> {
        let status = self.backend.status()?;
        if status != state.status {
            state.status = status;
            state.status_updated = self.clock.utc_now();
            if status != DomeStatus::Moving {
                *self.movement_started.lock() = None;
            }
        }
        Ok(())
    }

    fn send_heartbeat(&self, state: &DomeState) -> Result<(), obs_core::error::BackendError> {
        let timeout = match state.intent {
            DomeIntent::Open if state.status != DomeStatus::Moving => self.config.heartbeat_open_timeout,
            _ if state.status == DomeStatus::Moving => self.config.heartbeat_timeout,
            _ => self.config.heartbeat_close_timeout,
        };
        self.backend.heartbeat(timeout)?;
        Ok(())
    }

    fn check_movement_timeout(&self, state: &mut DomeState) {
        if state.status != DomeStatus::Moving {
            return;
        }
        let Some(started) = *self.movement_started.lock() else { return };
        if self.clock.now().duration_since(started) > self.config.movement_timeout {
            self.elevate_to_error(state, "dome movement exceeded movement_timeout");
        }
    }

    fn elevate_to_error(&self, state: &mut DomeState, reason: &str) {
        tracing::error!(reason, "dome controller elevating to error state");
        state.mode = OperationsMode::Error;
        state.status_updated = self.clock.utc_now();
        if !state.status.is_sticky_fault() {
            state.status = DomeStatus::HardwareError;
        }
    }
}

#[cfg(test)]
#[path = "dome_tests.rs"]
mod tests;
