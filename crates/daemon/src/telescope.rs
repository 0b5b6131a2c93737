// SPDX-License-Identifier: MIT

//! TelescopeController (C4): owns the action queue and the worker thread
//! that drives it (spec §4.3, §5).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use obs_core::action::HeaderMap;
use obs_core::{Action, ActionQueue, ActionStatus, Clock, CommandStatus, OperationsMode, TelescopeState};
use parking_lot::{Condvar, Mutex};

/// How often the worker thread polls the running action for more work.
const STEP_POLL_INTERVAL: Duration = Duration::from_millis(20);

struct Shared<C: Clock> {
    state: Mutex<TelescopeState>,
    queue: Mutex<ActionQueue>,
    clock: C,
    abort_requested: AtomicBool,
    shutting_down: AtomicBool,
    wake: Condvar,
    wake_gate: Mutex<()>,
}

pub struct TelescopeController<C: Clock + 'static> {
    shared: Arc<Shared<C>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl<C: Clock + 'static> TelescopeController<C> {
    pub fn new(clock: C) -> Self {
        let shared = Arc::new(Shared {
            state: Mutex::new(TelescopeState::new(clock.utc_now())),
            queue: Mutex::new(ActionQueue::new()),
            clock,
            abort_requested: AtomicBool::new(false),
            shutting_down: AtomicBool::new(false),
            wake: Condvar::new(),
            wake_gate: Mutex::new(()),
        });

        let worker_shared = shared.clone();
        let handle = std::thread::spawn(move || worker_loop(worker_shared));
        Self { shared, worker: Mutex::new(Some(handle)) }
    }

    pub fn status_snapshot(&self) -> (TelescopeState, Vec<ActionStatus>) {
        let state = self.shared.state.lock().clone();
        let tasks = self.shared.queue.lock().statuses();
        (state, tasks)
    }

    /// Request a mode transition (spec §4.3 Transitions).
    pub fn request_mode(&self, requested: OperationsMode) -> CommandStatus {
        let mut state = self.shared.state.lock();
        match requested {
            OperationsMode::Automatic => {
                state.requested_mode = OperationsMode::Automatic;
                state.mode = OperationsMode::Automatic;
                state.status_updated = self.shared.clock.utc_now();
                drop(state);
                self.wake_worker();
                CommandStatus::Succeeded
            }
            OperationsMode::Manual => {
                state.requested_mode = OperationsMode::Manual;
                state.mode = OperationsMode::Manual;
                state.status_updated = self.shared.clock.utc_now();
                drop(state);
                // Abort whatever is running and drain the rest; the worker
                // performs the actual queue mutation on its own thread.
                self.shared.abort_requested.store(true, Ordering::SeqCst);
                self.wake_worker();
                CommandStatus::Succeeded
            }
            OperationsMode::Error | OperationsMode::Offline => {
                CommandStatus::Failed("telescope mode can only be requested as automatic or manual".to_string())
            }
        }
    }

    /// Immediately request the running action (if any) stop. Returns right
    /// away; idempotent.
    pub fn stop_telescope(&self) -> CommandStatus {
        self.shared.abort_requested.store(true, Ordering::SeqCst);
        self.wake_worker();
        CommandStatus::Succeeded
    }

    /// Append actions to the queue. Fails if the telescope is not currently
    /// in automatic mode (spec §4.5 schedule atomicity).
    pub fn enqueue_actions(&self, actions: Vec<Box<dyn Action>>) -> CommandStatus {
        {
            let state = self.shared.state.lock();
            if state.mode != OperationsMode::Automatic {
                return CommandStatus::TelescopeNotAutomatic;
            }
        }
        let mut queue = self.shared.queue.lock();
        for action in actions {
            queue.push(action);
        }
        drop(queue);
        self.wake_worker();
        CommandStatus::Succeeded
    }

    pub fn notify_processed_frame(&self, headers: &HeaderMap) -> HeaderMap {
        self.shared.queue.lock().notify_processed_frame(headers)
    }

    pub fn notify_guide_profile(&self, headers: &HeaderMap, x: &[f64], y: &[f64]) -> HeaderMap {
        self.shared.queue.lock().notify_guide_profile(headers, x, y)
    }

    /// Forward the dome's open/closed transition to whichever action is
    /// currently running, called once per daemon tick.
    pub fn dome_is_open_changed(&self, open: bool) {
        self.shared.queue.lock().notify_dome_is_open_changed(open);
    }

    fn wake_worker(&self) {
        let _guard = self.shared.wake_gate.lock();
        self.shared.wake.notify_all();
    }

    /// Stop the worker thread cleanly. Safe to call more than once.
    pub fn shutdown(&self) {
        self.shared.shutting_down.store(true, Ordering::SeqCst);
        self.wake_worker();
        if let Some(handle) = self.worker.lock().take() {
            let _ = handle.join();
        }
    }
}

impl<C: Clock + 'static> Drop for TelescopeController<C> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop<C: Clock>(shared: Arc<Shared<C>>) {
    loop {
        if shared.shutting_down.load(Ordering::SeqCst) {
            return;
        }

        // Service a pending abort before the automatic-mode check below:
        // `request_mode(Manual)` sets both `mode = Manual` and this flag in
        // the same call, and the drain must still run even though the
        // worker would otherwise park on seeing a non-automatic mode.
        if shared.abort_requested.swap(false, Ordering::SeqCst) {
            let mut queue = shared.queue.lock();
            queue.abort_running();
            drain_current_to_terminal(&mut queue);
            queue.drain_remaining_as_aborted();
            continue;
        }

        let is_automatic = {
            let state = shared.state.lock();
            state.mode == OperationsMode::Automatic
        };

        if !is_automatic {
            wait_for_wake(&shared);
            continue;
        }

        let mut queue = shared.queue.lock();
        if queue.is_idle() {
            drop(queue);
            wait_for_wake(&shared);
            continue;
        }

        if queue.current_id().is_some() {
            queue.start_next();
            queue.step_running();
        }
        drop(queue);
        std::thread::sleep(STEP_POLL_INTERVAL);
    }
}

/// Step the currently running action to a terminal state without starting
/// any new ones, used while honoring an abort request.
fn drain_current_to_terminal(queue: &mut ActionQueue) {
    while queue.current_id().is_some() && queue.step_running().is_none() {
        std::thread::sleep(STEP_POLL_INTERVAL);
    }
}

fn wait_for_wake<C: Clock>(shared: &Shared<C>) {
    let guard = shared.wake_gate.lock();
    let _ = shared.wake.wait_timeout(guard, Duration::from_millis(200));
}

#[cfg(test)]
#[path = "telescope_tests.rs"]
mod tests;
