// SPDX-License-Identifier: MIT

//! Test builders and `proptest` strategies shared by other crates' tests.

use crate::action::{Action, ActionState, ActionStatus, ActionStep, HeaderMap, TaskDescriptor};
use crate::environment::RawSensorReading;
use chrono::{DateTime, Duration as ChronoDuration, Utc};

/// A scriptable fake [`Action`] for exercising controllers and the queue
/// without real hardware. Mirrors the teacher's `FakeAdapter` pattern.
pub struct FakeAction {
    pub name: String,
    pub steps_before_done: u32,
    pub outcome: ActionState,
    started: bool,
    aborted: bool,
    pub dome_open_events: Vec<bool>,
    pub processed_frame_calls: u32,
    pub guide_profile_calls: u32,
}

impl FakeAction {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps_before_done: 0,
            outcome: ActionState::Complete,
            started: false,
            aborted: false,
            dome_open_events: Vec::new(),
            processed_frame_calls: 0,
            guide_profile_calls: 0,
        }
    }

    pub fn steps(mut self, n: u32) -> Self {
        self.steps_before_done = n;
        self
    }

    pub fn outcome(mut self, outcome: ActionState) -> Self {
        self.outcome = outcome;
        self
    }
}

impl Action for FakeAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn start(&mut self) {
        self.started = true;
    }

    fn step(&mut self) -> ActionStep {
        if self.aborted {
            return ActionStep::Finished(ActionState::Aborted);
        }
        if self.steps_before_done == 0 {
            return ActionStep::Finished(self.outcome);
        }
        self.steps_before_done -= 1;
        ActionStep::Continue
    }

    fn abort(&mut self) {
        self.aborted = true;
    }

    fn status(&self) -> ActionStatus {
        let state = if !self.started {
            ActionState::Pending
        } else if self.aborted {
            ActionState::Aborted
        } else if self.steps_before_done == 0 {
            self.outcome
        } else {
            ActionState::Running
        };
        ActionStatus { name: self.name.clone(), tasks: vec![TaskDescriptor::Single("run".into())], state }
    }

    fn dome_is_open_changed(&mut self, open: bool) {
        self.dome_open_events.push(open);
    }

    fn notify_processed_frame(&mut self, _headers: &HeaderMap) -> HeaderMap {
        self.processed_frame_calls += 1;
        HeaderMap::new()
    }

    fn notify_guide_profile(&mut self, _headers: &HeaderMap, _x: &[f64], _y: &[f64]) -> HeaderMap {
        self.guide_profile_calls += 1;
        HeaderMap::new()
    }
}

/// A reading a source just took, as of `as_of`: never stale regardless of
/// the condition's configured max-age.
pub fn fresh_sensor(label: &str, value: f64, as_of: DateTime<Utc>) -> RawSensorReading {
    RawSensorReading { label: label.to_string(), value, unsafe_: false, updated: as_of }
}

/// A reading a source took a day before `as_of`: stale against any
/// realistic configured max-age.
pub fn stale_sensor(label: &str, value: f64, as_of: DateTime<Utc>) -> RawSensorReading {
    RawSensorReading { label: label.to_string(), value, unsafe_: false, updated: as_of - ChronoDuration::days(1) }
}

pub fn unsafe_sensor(label: &str, value: f64, as_of: DateTime<Utc>) -> RawSensorReading {
    RawSensorReading { label: label.to_string(), value, unsafe_: true, updated: as_of }
}

pub mod registries {
    use crate::registry::{ActionModuleRegistry, ActionParamSchema, DomeModuleRegistry};
    use std::collections::BTreeSet;

    /// A fixed-membership `ActionModuleRegistry` for tests: every listed
    /// name resolves to an empty schema and constructs a [`FakeAction`]
    /// (see [`super::FakeAction`]).
    pub struct FakeActionRegistry {
        names: BTreeSet<String>,
    }

    impl FakeActionRegistry {
        pub fn with<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
            Self { names: names.into_iter().map(str::to_string).collect() }
        }
    }

    impl ActionModuleRegistry for FakeActionRegistry {
        fn schema_for(&self, action_type: &str) -> Option<ActionParamSchema> {
            self.names.contains(action_type).then(ActionParamSchema::default)
        }

        fn construct(
            &self,
            action_type: &str,
            _params: &serde_json::Value,
        ) -> Result<Box<dyn crate::Action>, String> {
            if self.names.contains(action_type) {
                Ok(Box::new(super::FakeAction::new(action_type)))
            } else {
                Err(format!("unknown action type '{action_type}'"))
            }
        }
    }

    /// A fixed-membership `DomeModuleRegistry` for tests.
    pub struct FakeDomeRegistry {
        names: BTreeSet<String>,
    }

    impl FakeDomeRegistry {
        pub fn with<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
            Self { names: names.into_iter().map(str::to_string).collect() }
        }
    }

    impl DomeModuleRegistry for FakeDomeRegistry {
        fn is_registered(&self, module: &str) -> bool {
            self.names.contains(module)
        }
    }
}

#[cfg(feature = "proptest")]
pub mod strategies {
    use super::*;
    use crate::environment::EnvironmentCondition;
    use proptest::prelude::*;
    use std::time::Duration;

    /// Arbitrary sensor readings, biased toward realistic combinations.
    pub fn sensor_reading() -> impl Strategy<Value = SensorReading> {
        ("[a-z]{2,6}", any::<f64>(), any::<bool>(), any::<bool>())
            .prop_map(|(label, value, unsafe_, stale)| SensorReading { label, value, unsafe_, stale })
    }

    /// Arbitrary condition built from 1..5 sensors.
    pub fn condition(label: &'static str) -> impl Strategy<Value = EnvironmentCondition> {
        proptest::collection::vec(sensor_reading(), 1..5)
            .prop_map(move |sensors| EnvironmentCondition::from_sensors(label, sensors, Duration::from_secs(1)))
    }
}
