// SPDX-License-Identifier: MIT

//! Environment aggregation: per-sensor readings folded into per-condition
//! and aggregate safe/unsafe verdicts (spec §4.1).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single sensor's contribution to a condition, already resolved to the
/// `(value, unsafe, stale)` triple the spec calls for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub label: String,
    pub value: f64,
    #[serde(rename = "unsafe")]
    pub unsafe_: bool,
    pub stale: bool,
}

/// A sensor's reading as the source reports it, before the watcher resolves
/// staleness: `unsafe` is the source's own call, `updated` is when the
/// source last actually sampled the sensor.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSensorReading {
    pub label: String,
    pub value: f64,
    pub unsafe_: bool,
    pub updated: DateTime<Utc>,
}

/// A named group of sensors and their aggregated safe/unsafe verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentCondition {
    pub label: String,
    pub safe: bool,
    pub age: std::time::Duration,
    pub sensors: Vec<SensorReading>,
}

impl EnvironmentCondition {
    /// Fold a set of sensor readings into a condition verdict.
    ///
    /// Invariant (spec §3/§8-1): `safe == (exists a fresh sensor) && (no
    /// sensor reports unsafe)`.
    pub fn from_sensors(label: impl Into<String>, sensors: Vec<SensorReading>, age: std::time::Duration) -> Self {
        let any_fresh = sensors.iter().any(|s| !s.stale);
        let any_unsafe = sensors.iter().any(|s| s.unsafe_);
        let safe = any_fresh && !any_unsafe;
        Self { label: label.into(), safe, age, sensors }
    }
}

/// Aggregate snapshot of all configured environment conditions for one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentSnapshot {
    pub updated: DateTime<Utc>,
    pub safe: bool,
    pub conditions: BTreeMap<String, EnvironmentCondition>,
}

impl EnvironmentSnapshot {
    /// Build a snapshot from already-folded conditions; `safe` is the
    /// conjunction over all conditions (spec §3: aggregate `safe := ∀
    /// conditions safe`). An empty condition set is vacuously safe.
    pub fn new(updated: DateTime<Utc>, conditions: BTreeMap<String, EnvironmentCondition>) -> Self {
        let safe = conditions.values().all(|c| c.safe);
        Self { updated, safe, conditions }
    }

    /// A snapshot representing "environment daemon unreachable too long":
    /// forced unsafe regardless of last-known condition values (spec §4.1).
    pub fn forced_unsafe(updated: DateTime<Utc>, conditions: BTreeMap<String, EnvironmentCondition>) -> Self {
        Self { updated, safe: false, conditions }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn reading(label: &str, unsafe_: bool, stale: bool) -> SensorReading {
        SensorReading { label: label.into(), value: 0.0, unsafe_, stale }
    }

    #[test]
    fn condition_unsafe_when_any_sensor_unsafe() {
        let c = EnvironmentCondition::from_sensors(
            "rain",
            vec![reading("a", false, false), reading("b", true, false)],
            Duration::from_secs(1),
        );
        assert!(!c.safe);
    }

    #[test]
    fn condition_unsafe_when_all_stale() {
        let c = EnvironmentCondition::from_sensors(
            "rain",
            vec![reading("a", false, true), reading("b", false, true)],
            Duration::from_secs(60),
        );
        assert!(!c.safe);
    }

    #[test]
    fn condition_safe_when_one_fresh_and_none_unsafe() {
        let c = EnvironmentCondition::from_sensors(
            "rain",
            vec![reading("a", false, true), reading("b", false, false)],
            Duration::from_secs(1),
        );
        assert!(c.safe);
    }

    #[test]
    fn condition_with_no_sensors_is_unsafe() {
        let c = EnvironmentCondition::from_sensors("rain", vec![], Duration::from_secs(0));
        assert!(!c.safe);
    }

    #[test]
    fn snapshot_safe_is_conjunction_of_conditions() {
        let mut conditions = BTreeMap::new();
        conditions.insert(
            "rain".to_string(),
            EnvironmentCondition::from_sensors("rain", vec![reading("a", false, false)], Duration::ZERO),
        );
        conditions.insert(
            "wind".to_string(),
            EnvironmentCondition::from_sensors("wind", vec![reading("a", true, false)], Duration::ZERO),
        );
        let snap = EnvironmentSnapshot::new(Utc::now(), conditions);
        assert!(!snap.safe);
    }

    #[test]
    fn forced_unsafe_ignores_condition_values() {
        let mut conditions = BTreeMap::new();
        conditions.insert(
            "rain".to_string(),
            EnvironmentCondition::from_sensors("rain", vec![reading("a", false, false)], Duration::ZERO),
        );
        let snap = EnvironmentSnapshot::forced_unsafe(Utc::now(), conditions);
        assert!(!snap.safe);
    }
}
