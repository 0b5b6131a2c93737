// SPDX-License-Identifier: MIT

//! The `EnvironmentSource` seam: how the daemon polls sensor hardware.
//! Concrete weather-station/roof-sensor integrations are out of scope --
//! this crate only defines the trait and a fake for tests.

use obs_config::SensorConfig;
use obs_core::error::BackendError;
use obs_core::RawSensorReading;

/// Polls configured sensors and returns each one's raw `(value, unsafe,
/// updated)` report. Staleness is a function of configured max-age against
/// the clock and is computed by the watcher, not here -- a source only
/// knows when it last actually sampled a sensor.
pub trait EnvironmentSource: Send + Sync {
    fn poll(&self, sensors: &[SensorConfig]) -> Result<Vec<RawSensorReading>, BackendError>;
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::BTreeMap;

    /// A controllable `EnvironmentSource` for tests: readings are set per
    /// sensor label and returned verbatim on poll, or an error if armed.
    pub struct FakeEnvironmentSource {
        readings: Mutex<BTreeMap<String, RawSensorReading>>,
        next_error: Mutex<Option<BackendError>>,
    }

    impl Default for FakeEnvironmentSource {
        fn default() -> Self {
            Self { readings: Mutex::new(BTreeMap::new()), next_error: Mutex::new(None) }
        }
    }

    impl FakeEnvironmentSource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_reading(&self, reading: RawSensorReading) {
            self.readings.lock().insert(reading.label.clone(), reading);
        }

        pub fn fail_next_poll(&self, err: BackendError) {
            *self.next_error.lock() = Some(err);
        }
    }

    impl EnvironmentSource for FakeEnvironmentSource {
        fn poll(&self, sensors: &[SensorConfig]) -> Result<Vec<RawSensorReading>, BackendError> {
            if let Some(err) = self.next_error.lock().take() {
                return Err(err);
            }
            let readings = self.readings.lock();
            Ok(sensors
                .iter()
                .filter_map(|s| readings.get(&s.label).cloned())
                .collect())
        }
    }
}
