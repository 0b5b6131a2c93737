use super::*;
use chrono::{TimeZone, Utc};
use obs_backends::environment::fake::FakeEnvironmentSource;
use obs_core::FakeClock;
use obs_core::test_support::{fresh_sensor, unsafe_sensor};

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 14, 22, 0, 0).unwrap()
}

fn clock() -> FakeClock {
    FakeClock::new(now())
}

fn condition(label: &str, sensor_label: &str) -> EnvironmentConditionConfig {
    EnvironmentConditionConfig {
        label: label.to_string(),
        sensors: vec![obs_config::SensorConfig {
            label: sensor_label.to_string(),
            sensor: "vaisala1".into(),
            parameter: "rain".into(),
            cadence: None,
            max_age: None,
        }],
    }
}

#[test]
fn aggregate_safe_when_all_conditions_safe() {
    let source = Arc::new(FakeEnvironmentSource::new());
    source.set_reading(fresh_sensor("rain", 0.0, now()));
    let watcher = EnvironmentWatcher::new(vec![condition("rain", "rain")], source, 2, clock());
    let snap = watcher.poll(None);
    assert!(snap.safe);
}

#[test]
fn aggregate_unsafe_when_any_condition_unsafe() {
    let source = Arc::new(FakeEnvironmentSource::new());
    source.set_reading(unsafe_sensor("rain", 5.0, now()));
    let watcher = EnvironmentWatcher::new(vec![condition("rain", "rain")], source, 2, clock());
    let snap = watcher.poll(None);
    assert!(!snap.safe);
}

#[test]
fn single_missed_poll_preserves_last_values_but_marks_stale() {
    let source = Arc::new(FakeEnvironmentSource::new());
    source.set_reading(fresh_sensor("rain", 3.5, now()));
    let watcher = EnvironmentWatcher::new(vec![condition("rain", "rain")], source.clone(), 2, clock());
    let first = watcher.poll(None);
    assert!(first.safe);

    source.fail_next_poll(obs_core::error::BackendError::Unreachable("down".into()));
    let second = watcher.poll(Some(&first));
    let rain = &second.conditions["rain"];
    // last known value is carried over, just re-flagged stale -- not reset
    // to a default/unknown reading.
    assert_eq!(rain.sensors[0].value, 3.5);
    assert!(rain.sensors[0].stale);
}

#[test]
fn exceeding_grace_ticks_forces_unsafe() {
    let source = Arc::new(FakeEnvironmentSource::new());
    source.set_reading(fresh_sensor("rain", 0.0, now()));
    let watcher = EnvironmentWatcher::new(vec![condition("rain", "rain")], source.clone(), 1, clock());
    let mut snap = watcher.poll(None);
    for _ in 0..3 {
        source.fail_next_poll(obs_core::error::BackendError::Unreachable("down".into()));
        snap = watcher.poll(Some(&snap));
    }
    assert!(!snap.safe);
}
