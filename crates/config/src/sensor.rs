// SPDX-License-Identifier: MIT

//! Environment condition / sensor config (spec §4.1).

use std::time::Duration;

/// Fallback max-age when neither `max_age` nor `cadence` is configured.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(30);

/// A single sensor reading source within a condition: the nested
/// `sensor.parameter` key pair the environment daemon publishes under.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorConfig {
    pub label: String,
    pub sensor: String,
    pub parameter: String,
    pub cadence: Option<Duration>,
    pub max_age: Option<Duration>,
}

impl SensorConfig {
    /// The max-age to use when deciding staleness: the configured value, or
    /// three times the reporting cadence, or the 30s default.
    pub fn effective_max_age(&self) -> Duration {
        self.max_age.unwrap_or_else(|| match self.cadence {
            Some(cadence) => cadence * 3,
            None => DEFAULT_MAX_AGE,
        })
    }
}

/// A named group of sensors that together determine one safe/unsafe verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentConditionConfig {
    pub label: String,
    pub sensors: Vec<SensorConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sensor(cadence: Option<u64>, max_age: Option<u64>) -> SensorConfig {
        SensorConfig {
            label: "s".into(),
            sensor: "vaisala1".into(),
            parameter: "rain".into(),
            cadence: cadence.map(Duration::from_secs),
            max_age: max_age.map(Duration::from_secs),
        }
    }

    #[test]
    fn explicit_max_age_wins() {
        assert_eq!(sensor(Some(10), Some(99)).effective_max_age(), Duration::from_secs(99));
    }

    #[test]
    fn falls_back_to_three_times_cadence() {
        assert_eq!(sensor(Some(10), None).effective_max_age(), Duration::from_secs(30));
    }

    #[test]
    fn falls_back_to_default_when_neither_given() {
        assert_eq!(sensor(None, None).effective_max_age(), DEFAULT_MAX_AGE);
    }
}
