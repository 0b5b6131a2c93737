// SPDX-License-Identifier: MIT

//! Schedule validation: turn a wire-level `ScheduleDoc` into a
//! `ParsedSchedule` the daemon can act on, or a list of human-readable
//! errors. Validation never partially commits -- callers either get a
//! fully parsed schedule or a non-empty error list.

use chrono::{DateTime, NaiveDate, Utc};
use obs_config::SiteConfig;
use obs_core::{ActionModuleRegistry, DomeOpenWindow};
use obs_wire::ScheduleDoc;
use serde_json::Value;

use crate::ephemeris::night_start_end;

/// One action queued by a validated schedule.
#[derive(Debug, Clone)]
pub struct ParsedAction {
    pub action_type: String,
    pub params: Value,
}

/// A schedule that has passed both `parse_dome_window` and
/// `parse_schedule_actions`.
#[derive(Debug, Clone)]
pub struct ParsedSchedule {
    pub night: NaiveDate,
    pub window: Option<DomeOpenWindow>,
    pub actions: Vec<ParsedAction>,
}

/// Parse and bounds-check the dome window, if present.
///
/// A window is invalid if its bounds are non-increasing (`open_at >=
/// close_at`, rejected by `DomeOpenWindow::new`) or if it straddles the
/// night boundary: any part of the window falling outside
/// `night_start_end(night, ...)`.
pub fn parse_dome_window(
    doc: &ScheduleDoc,
    night: NaiveDate,
    site: &SiteConfig,
) -> Result<Option<DomeOpenWindow>, Vec<String>> {
    let Some(dome) = &doc.dome else {
        return Ok(None);
    };

    let mut errors = Vec::new();
    let open_at = parse_timestamp(&dome.open, "dome.open", &mut errors);
    let close_at = parse_timestamp(&dome.close, "dome.close", &mut errors);

    let (Some(open_at), Some(close_at)) = (open_at, close_at) else {
        return Err(errors);
    };

    let window = match DomeOpenWindow::new(open_at, close_at) {
        Ok(w) => w,
        Err(e) => return Err(vec![e.to_string()]),
    };

    let (night_start, night_end) = night_start_end(night, site, site.sun_altitude_limit_deg);
    if window.open_at < night_start || window.close_at > night_end {
        return Err(vec![format!(
            "dome window [{}, {}) straddles the night boundary [{night_start}, {night_end})",
            window.open_at, window.close_at
        )]);
    }

    Ok(Some(window))
}

fn parse_timestamp(raw: &str, field: &str, errors: &mut Vec<String>) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(e) => {
            errors.push(format!("'{field}' ('{raw}') is not a valid ISO-8601 timestamp: {e}"));
            None
        }
    }
}

/// Parse and validate the queued actions, if present, against the action
/// registry's parameter schemas.
pub fn parse_schedule_actions(
    doc: &ScheduleDoc,
    registry: &dyn ActionModuleRegistry,
) -> Result<Vec<ParsedAction>, Vec<String>> {
    let Some(actions) = &doc.actions else {
        return Ok(Vec::new());
    };

    let mut errors = Vec::new();
    let mut parsed = Vec::with_capacity(actions.len());

    for entry in actions {
        let Some(schema) = registry.schema_for(&entry.action_type) else {
            errors.push(format!("unknown action type '{}'", entry.action_type));
            continue;
        };
        let params = Value::Object(entry.params.clone());
        let violations = schema.validate(&params);
        if !violations.is_empty() {
            for v in violations {
                errors.push(format!("action '{}': {v}", entry.action_type));
            }
            continue;
        }
        parsed.push(ParsedAction { action_type: entry.action_type.clone(), params });
    }

    if errors.is_empty() {
        Ok(parsed)
    } else {
        Err(errors)
    }
}

/// Validate a whole schedule document, collecting every error rather than
/// stopping at the first. `require_night` enforces the authoritative call
/// shape (spec §9 open question): reject any schedule missing `night`.
pub fn validate_schedule(
    doc: &ScheduleDoc,
    site: &SiteConfig,
    registry: &dyn ActionModuleRegistry,
    require_night: bool,
) -> (bool, Vec<String>) {
    let mut errors = Vec::new();

    let night = match &doc.night {
        Some(raw) => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(n) => Some(n),
            Err(e) => {
                errors.push(format!("'night' ('{raw}') is not a valid date: {e}"));
                None
            }
        },
        None => {
            if require_night {
                errors.push("schedule is missing required field 'night'".to_string());
            }
            None
        }
    };

    if let Some(night) = night {
        if let Err(window_errors) = parse_dome_window(doc, night, site) {
            errors.extend(window_errors);
        }
    } else if doc.dome.is_some() {
        errors.push("cannot validate dome window without a valid 'night'".to_string());
    }

    if let Err(action_errors) = parse_schedule_actions(doc, registry) {
        errors.extend(action_errors);
    }

    (errors.is_empty(), errors)
}

/// Fully parse a schedule already known to be valid (callers should call
/// `validate_schedule` first; this panics-free re-derivation is for the
/// daemon to obtain the parsed window/actions after a successful
/// validation).
pub fn parse_schedule(
    doc: &ScheduleDoc,
    site: &SiteConfig,
    registry: &dyn ActionModuleRegistry,
) -> Result<ParsedSchedule, Vec<String>> {
    let mut errors = Vec::new();

    let night = match &doc.night {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok(),
        None => None,
    };
    let Some(night) = night else {
        errors.push("schedule is missing required field 'night'".to_string());
        return Err(errors);
    };

    let window = match parse_dome_window(doc, night, site) {
        Ok(w) => w,
        Err(e) => {
            errors.extend(e);
            None
        }
    };
    let actions = match parse_schedule_actions(doc, registry) {
        Ok(a) => a,
        Err(e) => {
            errors.extend(e);
            Vec::new()
        }
    };

    if errors.is_empty() {
        Ok(ParsedSchedule { night, window, actions })
    } else {
        Err(errors)
    }
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
