// SPDX-License-Identifier: MIT

//! Low-precision solar position, enough to bound an observing night by a
//! configured sun-altitude cutoff. No ephemeris crate exists anywhere in
//! this workspace's lineage, so this follows the standard NOAA low-precision
//! solar calculator formulas (accurate to within a minute or two, which is
//! ample for scheduling bounds).

use chrono::{DateTime, Datelike, Duration as ChronoDuration, NaiveDate, NaiveTime, TimeZone, Utc};
use obs_config::SiteConfig;

/// The observing night bounds for `night` at `site`, bounded by
/// `sun_altitude_limit_deg` (the sun must be at or below this altitude for
/// observing to be permitted).
///
/// Two degenerate cases are handled explicitly (relevant at extreme
/// latitudes or very permissive altitude limits):
/// - the sun never rises above the limit on that date: the "night" is the
///   full calendar day, midnight to midnight;
/// - the sun never sets below the limit: there is no valid night, and the
///   returned interval is empty (`start == end`).
pub fn night_start_end(night: NaiveDate, site: &SiteConfig, sun_altitude_limit_deg: f64) -> (DateTime<Utc>, DateTime<Utc>) {
    let midnight_start = midnight_utc(night);
    // `succ_opt` only returns `None` at `NaiveDate::MAX`; falling back to
    // the same date just collapses the degenerate-case math below to a
    // single-day window instead of panicking on a date nobody schedules.
    let next_day = night.succ_opt().unwrap_or(night);

    let sunset = sun_crossing(night, site, sun_altitude_limit_deg, Crossing::Descending);
    let sunrise = sun_crossing(next_day, site, sun_altitude_limit_deg, Crossing::Ascending);

    match (sunset, sunrise) {
        (Some(set), Some(rise)) => (set, rise),
        (None, None) => {
            // Never crosses: decide direction by the altitude at local solar noon.
            if sun_altitude_at_noon(night, site) <= sun_altitude_limit_deg {
                (midnight_start, midnight_start + ChronoDuration::days(1))
            } else {
                (midnight_start, midnight_start)
            }
        }
        // One crossing found but not the other is effectively the same
        // degenerate case on the neighboring day; fall back to the same
        // decision using the night in question.
        _ => {
            if sun_altitude_at_noon(night, site) <= sun_altitude_limit_deg {
                (midnight_start, midnight_start + ChronoDuration::days(1))
            } else {
                (midnight_start, midnight_start)
            }
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Crossing {
    /// Sun descending through the altitude limit (sunset-like).
    Descending,
    /// Sun ascending through the altitude limit (sunrise-like).
    Ascending,
}

fn sun_crossing(date: NaiveDate, site: &SiteConfig, altitude_limit_deg: f64, which: Crossing) -> Option<DateTime<Utc>> {
    let day_of_year = date.ordinal() as f64;
    let gamma = std::f64::consts::TAU / 365.0 * (day_of_year - 1.0 + 12.0 / 24.0);

    let eq_time_min = 229.18
        * (0.000075 + 0.001868 * gamma.cos()
            - 0.032077 * gamma.sin()
            - 0.014615 * (2.0 * gamma).cos()
            - 0.040849 * (2.0 * gamma).sin());

    let decl = 0.006918 - 0.399912 * gamma.cos() + 0.070257 * gamma.sin()
        - 0.006758 * (2.0 * gamma).cos()
        + 0.000907 * (2.0 * gamma).sin()
        - 0.002697 * (3.0 * gamma).cos()
        + 0.00148 * (3.0 * gamma).sin();

    let lat_rad = site.latitude_deg.to_radians();
    let zenith_rad = (90.0 - altitude_limit_deg).to_radians();

    let cos_ha = (zenith_rad.cos() - lat_rad.sin() * decl.sin()) / (lat_rad.cos() * decl.cos());
    if !(-1.0..=1.0).contains(&cos_ha) {
        return None;
    }
    let ha_deg = cos_ha.acos().to_degrees();

    let solar_noon_min = 720.0 - 4.0 * site.longitude_deg - eq_time_min;
    let offset_min = match which {
        Crossing::Descending => ha_deg * 4.0,
        Crossing::Ascending => -ha_deg * 4.0,
    };
    let minutes_from_midnight = solar_noon_min + offset_min;

    let midnight = midnight_utc(date);
    Some(midnight + ChronoDuration::seconds((minutes_from_midnight * 60.0).round() as i64))
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

fn sun_altitude_at_noon(date: NaiveDate, site: &SiteConfig) -> f64 {
    let day_of_year = date.ordinal() as f64;
    let gamma = std::f64::consts::TAU / 365.0 * (day_of_year - 1.0 + 12.0 / 24.0);
    let decl = 0.006918 - 0.399912 * gamma.cos() + 0.070257 * gamma.sin()
        - 0.006758 * (2.0 * gamma).cos()
        + 0.000907 * (2.0 * gamma).sin()
        - 0.002697 * (3.0 * gamma).cos()
        + 0.00148 * (3.0 * gamma).sin();
    let lat_rad = site.latitude_deg.to_radians();
    // Altitude at solar noon (hour angle 0).
    let sin_alt = lat_rad.sin() * decl.sin() + lat_rad.cos() * decl.cos();
    sin_alt.asin().to_degrees()
}
