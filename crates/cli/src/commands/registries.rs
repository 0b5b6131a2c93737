// SPDX-License-Identifier: MIT

//! Registries used when validating a config/schedule locally, mirroring
//! the wiring `opsd` itself uses (see `obs-daemon`'s `main.rs`). Concrete
//! action and dome backends are out of scope, so both the daemon and this
//! CLI build their registries from the same stand-ins.

use obs_backends::actions::stand_ins::{PointAndTrack, Skyflats};
use obs_backends::dome::fake::FakeDomeBackend;
use obs_backends::{StaticActionRegistry, StaticDomeRegistry};
use obs_core::DomeStatus;

pub fn build_action_registry() -> StaticActionRegistry {
    let mut registry = StaticActionRegistry::new();
    registry.register("point_and_track", PointAndTrack::schema(), |params| {
        let ra = params.get("ra").and_then(|v| v.as_f64()).ok_or("missing 'ra'")?;
        let dec = params.get("dec").and_then(|v| v.as_f64()).ok_or("missing 'dec'")?;
        Ok(Box::new(PointAndTrack::new(ra, dec)) as Box<dyn obs_core::Action>)
    });
    registry.register("skyflats", Skyflats::schema(), |params| {
        let exposures = params.get("exposures").and_then(|v| v.as_u64()).unwrap_or(5) as u32;
        Ok(Box::new(Skyflats::new(exposures)) as Box<dyn obs_core::Action>)
    });
    registry
}

pub fn build_dome_registry() -> StaticDomeRegistry {
    let mut registry = StaticDomeRegistry::new();
    registry.register("fake", |_settings| Ok(Box::new(FakeDomeBackend::new(DomeStatus::Closed)) as Box<dyn obs_backends::DomeBackend>));
    registry
}
