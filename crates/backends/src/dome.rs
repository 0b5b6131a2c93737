// SPDX-License-Identifier: MIT

//! The `DomeBackend` seam: how the daemon commands and polls dome
//! hardware. Concrete dome integrations are out of scope -- this crate
//! only defines the trait and a fake for tests.

use std::time::Duration;

use obs_core::error::BackendError;
use obs_core::DomeStatus;

/// Commands and polls one physical dome. All methods may block; the
/// controller is responsible for not holding the command lock across them
/// any longer than necessary.
pub trait DomeBackend: Send + Sync {
    /// Command the dome to start opening. Does not block until open.
    fn open(&self) -> Result<(), BackendError>;

    /// Command the dome to start closing. Does not block until closed.
    fn close(&self) -> Result<(), BackendError>;

    /// Poll current physical status.
    fn status(&self) -> Result<DomeStatus, BackendError>;

    /// Send a liveness heartbeat, acknowledged by the hardware controller
    /// within `timeout` (the intent-appropriate
    /// `heartbeat_open_timeout`/`heartbeat_close_timeout`/`heartbeat_timeout`
    /// chosen by the caller). A missed acknowledgement within `timeout` is a
    /// `BackendError`, and the hardware controller itself is expected to
    /// force the dome closed if it hears nothing before `timeout` elapses.
    fn heartbeat(&self, timeout: Duration) -> Result<(), BackendError>;
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use super::*;
    use parking_lot::Mutex;

    /// A controllable `DomeBackend` for tests.
    pub struct FakeDomeBackend {
        status: Mutex<DomeStatus>,
        next_error: Mutex<Option<BackendError>>,
        pub open_calls: Mutex<u32>,
        pub close_calls: Mutex<u32>,
        pub heartbeat_calls: Mutex<u32>,
        pub last_heartbeat_timeout: Mutex<Option<Duration>>,
    }

    impl FakeDomeBackend {
        pub fn new(initial: DomeStatus) -> Self {
            Self {
                status: Mutex::new(initial),
                next_error: Mutex::new(None),
                open_calls: Mutex::new(0),
                close_calls: Mutex::new(0),
                heartbeat_calls: Mutex::new(0),
                last_heartbeat_timeout: Mutex::new(None),
            }
        }

        pub fn set_status(&self, status: DomeStatus) {
            *self.status.lock() = status;
        }

        pub fn fail_next(&self, err: BackendError) {
            *self.next_error.lock() = Some(err);
        }

        fn take_error(&self) -> Option<BackendError> {
            self.next_error.lock().take()
        }
    }

    impl DomeBackend for FakeDomeBackend {
        fn open(&self) -> Result<(), BackendError> {
            *self.open_calls.lock() += 1;
            if let Some(err) = self.take_error() {
                return Err(err);
            }
            *self.status.lock() = DomeStatus::Moving;
            Ok(())
        }

        fn close(&self) -> Result<(), BackendError> {
            *self.close_calls.lock() += 1;
            if let Some(err) = self.take_error() {
                return Err(err);
            }
            *self.status.lock() = DomeStatus::Moving;
            Ok(())
        }

        fn status(&self) -> Result<DomeStatus, BackendError> {
            if let Some(err) = self.take_error() {
                return Err(err);
            }
            Ok(*self.status.lock())
        }

        fn heartbeat(&self, timeout: Duration) -> Result<(), BackendError> {
            *self.heartbeat_calls.lock() += 1;
            *self.last_heartbeat_timeout.lock() = Some(timeout);
            if let Some(err) = self.take_error() {
                return Err(err);
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::FakeDomeBackend;
    use super::*;

    #[test]
    fn open_transitions_to_moving() {
        let dome = FakeDomeBackend::new(DomeStatus::Closed);
        dome.open().unwrap();
        assert_eq!(dome.status().unwrap(), DomeStatus::Moving);
        assert_eq!(*dome.open_calls.lock(), 1);
    }

    #[test]
    fn heartbeat_records_the_timeout_it_was_sent() {
        let dome = FakeDomeBackend::new(DomeStatus::Closed);
        dome.heartbeat(Duration::from_secs(30)).unwrap();
        assert_eq!(*dome.last_heartbeat_timeout.lock(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn armed_error_surfaces_on_next_call() {
        let dome = FakeDomeBackend::new(DomeStatus::Closed);
        dome.fail_next(BackendError::Timeout(std::time::Duration::from_secs(5)));
        assert!(dome.open().is_err());
        assert!(dome.open().is_ok());
    }
}
