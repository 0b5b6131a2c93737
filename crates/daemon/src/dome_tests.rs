use super::*;
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use obs_backends::dome::fake::FakeDomeBackend;
use obs_core::FakeClock;
use std::time::Duration;

fn config() -> DomeConfig {
    DomeConfig {
        module: "fake".into(),
        settings: serde_json::Value::Null,
        open_timeout: Duration::from_secs(60),
        close_timeout: Duration::from_secs(60),
        movement_timeout: Duration::from_secs(120),
        heartbeat_open_timeout: Duration::from_secs(30),
        heartbeat_close_timeout: Duration::from_secs(30),
        heartbeat_timeout: Duration::from_secs(15),
    }
}

fn clock() -> FakeClock {
    FakeClock::new(Utc.with_ymd_and_hms(2024, 3, 14, 22, 0, 0).unwrap())
}

#[test]
fn manual_to_automatic_is_unconditional() {
    let backend = Arc::new(FakeDomeBackend::new(DomeStatus::Open));
    let controller = DomeController::new(config(), backend, clock());
    let status = controller.request_mode(OperationsMode::Automatic);
    assert_eq!(status, CommandStatus::Succeeded);
    assert_eq!(controller.status_snapshot().mode, OperationsMode::Automatic);
}

#[test]
fn automatic_to_manual_requires_closed_dome() {
    let backend = Arc::new(FakeDomeBackend::new(DomeStatus::Open));
    let controller = DomeController::new(config(), backend, clock());
    controller.request_mode(OperationsMode::Automatic);

    let status = controller.request_mode(OperationsMode::Manual);
    assert_eq!(status, CommandStatus::DomeNotClosed);
    assert_eq!(controller.status_snapshot().mode, OperationsMode::Automatic);
}

#[test]
fn automatic_to_manual_succeeds_immediately_when_already_closed() {
    let backend = Arc::new(FakeDomeBackend::new(DomeStatus::Closed));
    let controller = DomeController::new(config(), backend, clock());
    controller.request_mode(OperationsMode::Automatic);

    let status = controller.request_mode(OperationsMode::Manual);
    assert_eq!(status, CommandStatus::Succeeded);
    assert_eq!(controller.status_snapshot().mode, OperationsMode::Manual);
}

#[test]
fn pending_manual_request_closes_dome_on_tick_then_completes() {
    let backend = Arc::new(FakeDomeBackend::new(DomeStatus::Open));
    let controller = DomeController::new(config(), backend.clone(), clock());
    controller.request_mode(OperationsMode::Automatic);
    controller.request_mode(OperationsMode::Manual);

    controller.tick(true);
    assert_eq!(*backend.close_calls.lock(), 1);
    assert_eq!(controller.status_snapshot().mode, OperationsMode::Automatic);

    backend.set_status(DomeStatus::Closed);
    controller.tick(true);
    assert_eq!(controller.status_snapshot().mode, OperationsMode::Manual);
}

#[test]
fn opens_within_safe_window_and_closes_after() {
    let backend = Arc::new(FakeDomeBackend::new(DomeStatus::Closed));
    let controller = DomeController::new(config(), backend.clone(), clock());
    controller.request_mode(OperationsMode::Automatic);

    let now = clock().utc_now();
    let window = DomeOpenWindow::new(now - ChronoDuration::hours(1), now + ChronoDuration::hours(1)).unwrap();
    controller.set_window(window);

    controller.tick(true);
    assert_eq!(*backend.open_calls.lock(), 1);
    assert_eq!(controller.status_snapshot().intent, DomeIntent::Open);
}

#[test]
fn unsafe_mid_window_closes_then_reopens_once_safe_again() {
    let backend = Arc::new(FakeDomeBackend::new(DomeStatus::Open));
    let controller = DomeController::new(config(), backend.clone(), clock());
    controller.request_mode(OperationsMode::Automatic);

    let now = clock().utc_now();
    let window = DomeOpenWindow::new(now - ChronoDuration::hours(1), now + ChronoDuration::hours(1)).unwrap();
    controller.set_window(window);

    // Already open per the backend's initial state; tick with unsafe env closes it.
    controller.tick(true);
    backend.set_status(DomeStatus::Open);
    controller.tick(false);
    assert_eq!(*backend.close_calls.lock(), 1);
    assert_eq!(controller.status_snapshot().intent, DomeIntent::Close);

    backend.set_status(DomeStatus::Closed);
    controller.tick(true);
    assert_eq!(*backend.open_calls.lock(), 1);
    assert_eq!(controller.status_snapshot().intent, DomeIntent::Open);
}

#[test]
fn window_is_cleared_once_close_at_has_passed() {
    let backend = Arc::new(FakeDomeBackend::new(DomeStatus::Closed));
    let fake_clock = clock();
    let controller = DomeController::new(config(), backend, fake_clock.clone());
    controller.request_mode(OperationsMode::Automatic);

    let now = fake_clock.utc_now();
    let window = DomeOpenWindow::new(now - ChronoDuration::hours(2), now - ChronoDuration::hours(1)).unwrap();
    controller.set_window(window);

    controller.tick(true);
    assert!(controller.status_snapshot().window.is_none());
}

#[test]
fn backend_failure_elevates_to_error_and_is_sticky() {
    let backend = Arc::new(FakeDomeBackend::new(DomeStatus::Closed));
    let controller = DomeController::new(config(), backend.clone(), clock());
    controller.request_mode(OperationsMode::Automatic);

    let now = clock().utc_now();
    let window = DomeOpenWindow::new(now - ChronoDuration::hours(1), now + ChronoDuration::hours(1)).unwrap();
    controller.set_window(window);

    backend.fail_next(obs_core::error::BackendError::HardwareError("stuck shutter".into()));
    controller.tick(true);

    let snapshot = controller.status_snapshot();
    assert_eq!(snapshot.mode, OperationsMode::Error);

    // Error is sticky: further ticks don't clear it on their own.
    controller.tick(true);
    assert_eq!(controller.status_snapshot().mode, OperationsMode::Error);

    // Only an explicit Automatic request clears it.
    controller.request_mode(OperationsMode::Automatic);
    assert_eq!(controller.status_snapshot().mode, OperationsMode::Automatic);
}

#[test]
fn set_window_fails_outside_automatic_mode() {
    let backend = Arc::new(FakeDomeBackend::new(DomeStatus::Closed));
    let controller = DomeController::new(config(), backend, clock());
    let now = clock().utc_now();
    let window = DomeOpenWindow::new(now, now + ChronoDuration::hours(1)).unwrap();
    assert_eq!(controller.set_window(window), CommandStatus::DomeNotAutomatic);
}
