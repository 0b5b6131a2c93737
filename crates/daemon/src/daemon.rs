// SPDX-License-Identifier: MIT

//! `OperationsDaemon`: ties the environment watcher, dome controller, and
//! telescope controller together behind one command lock (spec §4, §5).

use std::net::IpAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use obs_config::Config;
use obs_core::{ActionModuleRegistry, Clock, CommandStatus, DomeStatus, EnvironmentSnapshot, OperationsMode};
use obs_wire::{DomeStatusPayload, EnvironmentStatusPayload, Request, Response, ScheduleDoc, StatusPayload, TelescopeStatusPayload};
use parking_lot::Mutex;

use crate::dome::DomeController;
use crate::environment::EnvironmentWatcher;
use crate::telescope::TelescopeController;

pub struct OperationsDaemon<C: Clock + 'static> {
    config: Config,
    environment: EnvironmentWatcher<C>,
    last_environment: Mutex<Option<EnvironmentSnapshot>>,
    dome: Option<DomeController<C>>,
    telescope: TelescopeController<C>,
    action_registry: Arc<dyn ActionModuleRegistry>,
    /// Held for the duration of a single mutating RPC, never across a tick
    /// or while waiting on action completion (spec §5 Resource Model).
    command_lock: Mutex<()>,
    clock: C,
    shutdown_requested: AtomicBool,
}

impl<C: Clock + 'static> OperationsDaemon<C> {
    pub fn new(
        config: Config,
        environment: EnvironmentWatcher<C>,
        dome: Option<DomeController<C>>,
        action_registry: Arc<dyn ActionModuleRegistry>,
        clock: C,
    ) -> Self {
        let telescope = TelescopeController::new(clock.clone());
        Self {
            config,
            environment,
            last_environment: Mutex::new(None),
            dome,
            telescope,
            action_registry,
            command_lock: Mutex::new(()),
            clock,
            shutdown_requested: AtomicBool::new(false),
        }
    }

    /// Whether a `Shutdown` RPC has been received. Polled by the process's
    /// tick loop so it can stop cleanly (spec §5 lifecycle).
    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::SeqCst)
    }

    /// Drive one tick of the background loop: poll the environment, advance
    /// the dome controller, and forward any open/closed transition to the
    /// telescope's running action.
    pub fn tick(&self) {
        let previous = self.last_environment.lock().clone();
        let snapshot = self.environment.poll(previous.as_ref());
        let safe = snapshot.safe;
        *self.last_environment.lock() = Some(snapshot);

        if let Some(dome) = &self.dome {
            let was_open = dome.status_snapshot().status == DomeStatus::Open;
            let is_open = dome.tick(safe);
            if is_open != was_open {
                self.telescope.dome_is_open_changed(is_open);
            }
        }
    }

    pub fn status(&self) -> Response {
        let environment = self
            .last_environment
            .lock()
            .as_ref()
            .map(EnvironmentStatusPayload::from)
            .unwrap_or_else(|| EnvironmentStatusPayload {
                updated: self.clock.utc_now(),
                safe: false,
                conditions: Default::default(),
            });
        let dome = self.dome.as_ref().map(|d| DomeStatusPayload::from(&d.status_snapshot()));
        let (tel_state, tasks) = self.telescope.status_snapshot();
        let telescope = TelescopeStatusPayload::new(&tel_state, tasks);
        Response::Status(StatusPayload { environment, dome, telescope })
    }

    /// Handle one RPC request from `caller`, enforcing control/pipeline
    /// authorization and the single-writer command lock (spec §5, §6).
    pub fn handle(&self, request: Request, caller: IpAddr) -> Response {
        match request {
            Request::Status => self.status(),

            Request::DomeControl { auto } => {
                if !self.config.is_control_machine(caller) {
                    return Response::Command(CommandStatus::InvalidControlIp);
                }
                let Some(_guard) = self.command_lock.try_lock() else {
                    return Response::Command(CommandStatus::Blocked);
                };
                let Some(dome) = &self.dome else {
                    return Response::Command(CommandStatus::Failed("no dome is configured".to_string()));
                };
                Response::Command(dome.request_mode(mode_from(auto)))
            }

            Request::TelControl { auto } => {
                if !self.config.is_control_machine(caller) {
                    return Response::Command(CommandStatus::InvalidControlIp);
                }
                let Some(_guard) = self.command_lock.try_lock() else {
                    return Response::Command(CommandStatus::Blocked);
                };
                Response::Command(self.telescope.request_mode(mode_from(auto)))
            }

            Request::StopTelescope => {
                if !self.config.is_control_machine(caller) {
                    return Response::Command(CommandStatus::InvalidControlIp);
                }
                Response::Command(self.telescope.stop_telescope())
            }

            Request::ClearDomeWindow => {
                if !self.config.is_control_machine(caller) {
                    return Response::Command(CommandStatus::InvalidControlIp);
                }
                let Some(_guard) = self.command_lock.try_lock() else {
                    return Response::Command(CommandStatus::Blocked);
                };
                match &self.dome {
                    Some(dome) => {
                        dome.clear_window();
                        Response::Command(CommandStatus::Succeeded)
                    }
                    None => Response::Command(CommandStatus::Failed("no dome is configured".to_string())),
                }
            }

            Request::ScheduleObservations { schedule } => {
                if !self.config.is_control_machine(caller) {
                    return Response::Command(CommandStatus::InvalidControlIp);
                }
                Response::Command(self.schedule_observations(schedule))
            }

            Request::NotifyProcessedFrame { headers } => {
                if !self.config.is_pipeline_machine(caller) {
                    return Response::Headers(None);
                }
                Response::Headers(Some(self.telescope.notify_processed_frame(&headers)))
            }

            Request::NotifyGuideProfiles { headers, x, y } => {
                if !self.config.is_pipeline_machine(caller) {
                    return Response::Headers(None);
                }
                Response::Headers(Some(self.telescope.notify_guide_profile(&headers, &x, &y)))
            }

            Request::Shutdown => {
                self.shutdown_requested.store(true, Ordering::SeqCst);
                Response::Command(CommandStatus::Succeeded)
            }
        }
    }

    /// Validate, then atomically apply, a schedule: either the dome window
    /// and the action queue both take effect, or neither does (spec §4.5).
    fn schedule_observations(&self, schedule: ScheduleDoc) -> CommandStatus {
        let Some(_guard) = self.command_lock.try_lock() else {
            return CommandStatus::Blocked;
        };

        let (ok, errors) =
            obs_sched::validate_schedule(&schedule, &self.config.site, self.action_registry.as_ref(), true);
        if !ok {
            return CommandStatus::InvalidSchedule(errors);
        }

        let parsed = match obs_sched::parse_schedule(&schedule, &self.config.site, self.action_registry.as_ref()) {
            Ok(p) => p,
            Err(errors) => return CommandStatus::InvalidSchedule(errors),
        };

        if let Some(window) = parsed.window {
            if window.contains(self.clock.utc_now()) {
                let safe = self.last_environment.lock().as_ref().map(|s| s.safe).unwrap_or(false);
                if !safe {
                    return CommandStatus::EnvironmentNotSafe;
                }
            }
        }

        let mut window_was_set = false;
        if let Some(window) = parsed.window {
            match &self.dome {
                Some(dome) => {
                    let status = dome.set_window(window);
                    if !status.is_success() {
                        return status;
                    }
                    window_was_set = true;
                }
                None => {
                    return CommandStatus::Failed(
                        "schedule requests a dome window but no dome is configured".to_string(),
                    )
                }
            }
        }

        if !parsed.actions.is_empty() {
            let mut actions = Vec::with_capacity(parsed.actions.len());
            for parsed_action in &parsed.actions {
                match self.action_registry.construct(&parsed_action.action_type, &parsed_action.params) {
                    Ok(action) => actions.push(action),
                    Err(e) => {
                        self.rollback_window(window_was_set);
                        return CommandStatus::Failed(e);
                    }
                }
            }

            let status = self.telescope.enqueue_actions(actions);
            if !status.is_success() {
                self.rollback_window(window_was_set);
                return status;
            }
        }

        CommandStatus::Succeeded
    }

    fn rollback_window(&self, window_was_set: bool) {
        if window_was_set {
            if let Some(dome) = &self.dome {
                dome.clear_window();
            }
        }
    }

    /// Stop the telescope worker thread cleanly.
    pub fn shutdown(&self) {
        self.telescope.shutdown();
    }
}

fn mode_from(auto: bool) -> OperationsMode {
    if auto { OperationsMode::Automatic } else { OperationsMode::Manual }
}

#[cfg(test)]
#[path = "daemon_tests.rs"]
mod tests;
