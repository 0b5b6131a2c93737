// SPDX-License-Identifier: MIT

//! EnvironmentWatcher (C2): polls configured sensors once per tick and
//! folds them into an `EnvironmentSnapshot`.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use obs_backends::EnvironmentSource;
use obs_config::{EnvironmentConditionConfig, SensorConfig};
use obs_core::{Clock, EnvironmentCondition, EnvironmentSnapshot, SensorReading};
use parking_lot::Mutex;

pub struct EnvironmentWatcher<C: Clock> {
    conditions: Vec<EnvironmentConditionConfig>,
    source: Arc<dyn EnvironmentSource>,
    grace_ticks: u32,
    missed_polls: Mutex<u32>,
    clock: C,
}

impl<C: Clock> EnvironmentWatcher<C> {
    pub fn new(
        conditions: Vec<EnvironmentConditionConfig>,
        source: Arc<dyn EnvironmentSource>,
        grace_ticks: u32,
        clock: C,
    ) -> Self {
        Self { conditions, source, grace_ticks, missed_polls: Mutex::new(0), clock }
    }

    /// Poll every configured condition's sensors and fold them into a
    /// fresh snapshot. A single missed poll preserves last-known sensor
    /// values but marks the condition stale; exceeding `grace_ticks`
    /// consecutive missed polls forces the aggregate `safe` flag false
    /// regardless of last-known values (spec §4.1).
    pub fn poll(&self, last: Option<&EnvironmentSnapshot>) -> EnvironmentSnapshot {
        let now = self.clock.utc_now();
        let mut conditions = BTreeMap::new();
        let mut any_failure = false;

        for cond_cfg in &self.conditions {
            match self.source.poll(&cond_cfg.sensors) {
                Ok(raw_readings) => {
                    let readings = resolve_staleness(&cond_cfg.sensors, raw_readings, now);
                    conditions.insert(
                        cond_cfg.label.clone(),
                        EnvironmentCondition::from_sensors(cond_cfg.label.clone(), readings, std::time::Duration::ZERO),
                    );
                }
                Err(err) => {
                    tracing::warn!(condition = %cond_cfg.label, error = %err, "environment poll failed");
                    any_failure = true;
                    if let Some(prev) = last.and_then(|s| s.conditions.get(&cond_cfg.label)) {
                        conditions.insert(cond_cfg.label.clone(), stale_copy(prev));
                    }
                }
            }
        }

        let mut missed = self.missed_polls.lock();
        if any_failure {
            *missed += 1;
        } else {
            *missed = 0;
        }

        if *missed > self.grace_ticks {
            EnvironmentSnapshot::forced_unsafe(now, conditions)
        } else {
            EnvironmentSnapshot::new(now, conditions)
        }
    }
}

/// Resolve each sensor's raw `(value, unsafe, updated)` report against its
/// configured max-age (spec §4.1: stale if `updated` is older than 3x
/// cadence, or 30s by default). A sensor the source didn't report at all is
/// dropped -- the same as the source reporting it stale forever.
fn resolve_staleness(
    sensors: &[SensorConfig],
    raw_readings: Vec<obs_core::RawSensorReading>,
    now: DateTime<Utc>,
) -> Vec<SensorReading> {
    let by_label: BTreeMap<&str, &obs_core::RawSensorReading> =
        raw_readings.iter().map(|r| (r.label.as_str(), r)).collect();

    sensors
        .iter()
        .filter_map(|cfg| {
            let raw = *by_label.get(cfg.label.as_str())?;
            let age = (now - raw.updated).to_std().unwrap_or(std::time::Duration::ZERO);
            let stale = age > cfg.effective_max_age();
            Some(SensorReading { label: cfg.label.clone(), value: raw.value, unsafe_: raw.unsafe_, stale })
        })
        .collect()
}

fn stale_copy(condition: &EnvironmentCondition) -> EnvironmentCondition {
    let stale_sensors: Vec<SensorReading> =
        condition.sensors.iter().cloned().map(|mut s| { s.stale = true; s }).collect();
    EnvironmentCondition::from_sensors(condition.label.clone(), stale_sensors, condition.age)
}

#[cfg(test)]
#[path = "environment_tests.rs"]
mod tests;
