// SPDX-License-Identifier: MIT

//! Site geography, used by the ephemeris-adjacent `night_start_end` in
//! `obs-sched`.

/// Observatory site location and the solar-altitude cutoff that defines
/// "night" for scheduling purposes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiteConfig {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub elevation_m: f64,
    pub sun_altitude_limit_deg: f64,
}
