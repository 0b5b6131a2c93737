use super::*;
use obs_core::test_support::registries::FakeActionRegistry;
use obs_wire::{ActionDoc, DomeWindowDoc};
use serde_json::json;

fn clasp_site() -> SiteConfig {
    SiteConfig { latitude_deg: 19.82, longitude_deg: -155.47, elevation_m: 4207.0, sun_altitude_limit_deg: 5.0 }
}

fn doc_with(night: Option<&str>, dome: Option<DomeWindowDoc>, actions: Option<Vec<ActionDoc>>) -> ScheduleDoc {
    ScheduleDoc { night: night.map(str::to_string), dome, actions }
}

fn action_doc(action_type: &str, params: serde_json::Value) -> ActionDoc {
    ActionDoc {
        action_type: action_type.to_string(),
        params: params.as_object().cloned().unwrap_or_default(),
    }
}

#[test]
fn valid_schedule_with_window_and_actions_passes() {
    let doc = doc_with(
        Some("2024-03-14"),
        Some(DomeWindowDoc { open: "2024-03-14T21:00:00Z".into(), close: "2024-03-15T06:00:00Z".into() }),
        Some(vec![action_doc("point_and_track", json!({"ra": 10.0}))]),
    );
    let registry = FakeActionRegistry::with(["point_and_track"]);
    let (ok, errors) = validate_schedule(&doc, &clasp_site(), &registry, true);
    assert!(ok, "errors: {errors:?}");
}

#[test]
fn missing_night_is_rejected_when_required() {
    let doc = doc_with(None, None, None);
    let registry = FakeActionRegistry::with([]);
    let (ok, errors) = validate_schedule(&doc, &clasp_site(), &registry, true);
    assert!(!ok);
    assert!(errors.iter().any(|e| e.contains("night")));
}

#[test]
fn missing_night_is_allowed_when_not_required() {
    let doc = doc_with(None, None, None);
    let registry = FakeActionRegistry::with([]);
    let (ok, _) = validate_schedule(&doc, &clasp_site(), &registry, false);
    assert!(ok);
}

#[test]
fn window_with_non_increasing_bounds_is_invalid() {
    let doc = doc_with(
        Some("2024-03-14"),
        Some(DomeWindowDoc { open: "2024-03-14T21:00:00Z".into(), close: "2024-03-14T21:00:00Z".into() }),
        None,
    );
    let registry = FakeActionRegistry::with([]);
    let (ok, errors) = validate_schedule(&doc, &clasp_site(), &registry, true);
    assert!(!ok);
    assert!(!errors.is_empty());
}

#[test]
fn window_straddling_night_boundary_is_invalid() {
    let doc = doc_with(
        Some("2024-03-14"),
        // Opens the afternoon before the computed night start -- straddles.
        Some(DomeWindowDoc { open: "2024-03-14T12:00:00Z".into(), close: "2024-03-15T06:00:00Z".into() }),
        None,
    );
    let registry = FakeActionRegistry::with([]);
    let (ok, errors) = validate_schedule(&doc, &clasp_site(), &registry, true);
    assert!(!ok);
    assert!(errors.iter().any(|e| e.contains("straddles")));
}

#[test]
fn unknown_action_type_is_rejected() {
    let doc = doc_with(Some("2024-03-14"), None, Some(vec![action_doc("warp_drive", json!({}))]));
    let registry = FakeActionRegistry::with(["point_and_track"]);
    let (ok, errors) = validate_schedule(&doc, &clasp_site(), &registry, true);
    assert!(!ok);
    assert!(errors.iter().any(|e| e.contains("warp_drive")));
}

#[test]
fn atomicity_collects_every_error_not_just_the_first() {
    let doc = doc_with(
        None,
        Some(DomeWindowDoc { open: "not-a-time".into(), close: "also-not-a-time".into() }),
        Some(vec![action_doc("warp_drive", json!({}))]),
    );
    let registry = FakeActionRegistry::with(["point_and_track"]);
    let (ok, errors) = validate_schedule(&doc, &clasp_site(), &registry, true);
    assert!(!ok);
    // missing night, unparseable dome timestamps skipped (no valid night to
    // check against), unknown action -- at least two distinct failures.
    assert!(errors.len() >= 2);
}
