// SPDX-License-Identifier: MIT

//! Stand-in action implementations. The real point-and-track/skyflats/
//! autofocus behaviours that would drive actual mount and camera hardware
//! are out of scope; these exist so a `StaticActionRegistry` has something
//! real to construct, both in tests and when the daemon is run standalone.

pub mod stand_ins {
    use obs_core::action::HeaderMap;
    use obs_core::{Action, ActionParamSchema, ActionState, ActionStatus, ActionStep, ParamType, TaskDescriptor};

    /// A single-step pointing action: completes on its first `step()`.
    pub struct PointAndTrack {
        ra: f64,
        dec: f64,
        aborted: bool,
        started: bool,
    }

    impl PointAndTrack {
        pub fn new(ra: f64, dec: f64) -> Self {
            Self { ra, dec, aborted: false, started: false }
        }

        pub fn schema() -> ActionParamSchema {
            let mut schema = ActionParamSchema::default();
            schema.required.insert("ra".to_string(), ParamType::Number);
            schema.required.insert("dec".to_string(), ParamType::Number);
            schema
        }
    }

    impl Action for PointAndTrack {
        fn name(&self) -> &str {
            "point_and_track"
        }

        fn start(&mut self) {
            self.started = true;
            tracing::debug!(ra = self.ra, dec = self.dec, "slewing to target");
        }

        fn step(&mut self) -> ActionStep {
            if self.aborted {
                return ActionStep::Finished(ActionState::Aborted);
            }
            ActionStep::Finished(ActionState::Complete)
        }

        fn abort(&mut self) {
            self.aborted = true;
        }

        fn status(&self) -> ActionStatus {
            let state = if !self.started {
                ActionState::Pending
            } else if self.aborted {
                ActionState::Aborted
            } else {
                ActionState::Complete
            };
            ActionStatus {
                name: self.name().to_string(),
                tasks: vec![TaskDescriptor::Single(format!("slew to ({}, {})", self.ra, self.dec))],
                state,
            }
        }

        fn dome_is_open_changed(&mut self, open: bool) {
            if !open {
                self.abort();
            }
        }

        fn notify_processed_frame(&mut self, _headers: &HeaderMap) -> HeaderMap {
            HeaderMap::new()
        }

        fn notify_guide_profile(&mut self, _headers: &HeaderMap, _x: &[f64], _y: &[f64]) -> HeaderMap {
            HeaderMap::new()
        }
    }

    /// A multi-step flat-fielding action: runs a fixed number of exposures.
    pub struct Skyflats {
        remaining_exposures: u32,
        aborted: bool,
        started: bool,
    }

    impl Skyflats {
        pub fn new(exposures: u32) -> Self {
            Self { remaining_exposures: exposures, aborted: false, started: false }
        }

        pub fn schema() -> ActionParamSchema {
            let mut schema = ActionParamSchema::default();
            schema.optional.insert("exposures".to_string(), ParamType::Number);
            schema
        }
    }

    impl Action for Skyflats {
        fn name(&self) -> &str {
            "skyflats"
        }

        fn start(&mut self) {
            self.started = true;
        }

        fn step(&mut self) -> ActionStep {
            if self.aborted {
                return ActionStep::Finished(ActionState::Aborted);
            }
            if self.remaining_exposures == 0 {
                return ActionStep::Finished(ActionState::Complete);
            }
            self.remaining_exposures -= 1;
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
            } else if self.remaining_exposures == 0 {
                ActionState::Complete
            } else {
                ActionState::Running
            };
            ActionStatus {
                name: self.name().to_string(),
                tasks: vec![TaskDescriptor::Single(format!("{} exposures remaining", self.remaining_exposures))],
                state,
            }
        }

        fn dome_is_open_changed(&mut self, open: bool) {
            if !open {
                self.abort();
            }
        }

        fn notify_processed_frame(&mut self, _headers: &HeaderMap) -> HeaderMap {
            HeaderMap::new()
        }

        fn notify_guide_profile(&mut self, _headers: &HeaderMap, _x: &[f64], _y: &[f64]) -> HeaderMap {
            HeaderMap::new()
        }
    }
}
