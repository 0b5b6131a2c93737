// SPDX-License-Identifier: MIT

//! Wire shape of the schedule document carried by `schedule_observations`
//! and the CLI's `schedule`/`validate` subcommands. This crate only carries
//! the data across the wire; `obs-sched` is what validates it.

use serde::{Deserialize, Serialize};
use serde_json::Map;

/// Canonical schedule JSON (spec §6): an observing night, an optional dome
/// open window, and an optional list of queued actions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleDoc {
    #[serde(default)]
    pub night: Option<String>,
    #[serde(default)]
    pub dome: Option<DomeWindowDoc>,
    #[serde(default)]
    pub actions: Option<Vec<ActionDoc>>,
}

/// Requested open/close bounds, still as raw ISO-8601 strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DomeWindowDoc {
    pub open: String,
    pub close: String,
}

/// One queued action entry: a `type` name plus arbitrary parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionDoc {
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(flatten)]
    pub params: Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_shape() {
        let json = r#"{
            "night": "2024-03-14",
            "dome": {"open": "2024-03-14T21:00:00Z", "close": "2024-03-15T06:00:00Z"},
            "actions": [{"type": "point_and_track", "ra": 10.5, "dec": -5.2}]
        }"#;
        let doc: ScheduleDoc = serde_json::from_str(json).unwrap();
        assert_eq!(doc.night.as_deref(), Some("2024-03-14"));
        assert_eq!(doc.dome.unwrap().open, "2024-03-14T21:00:00Z");
        let actions = doc.actions.unwrap();
        assert_eq!(actions[0].action_type, "point_and_track");
        assert_eq!(actions[0].params.get("ra").unwrap(), 10.5);
    }

    #[test]
    fn night_dome_and_actions_are_all_optional() {
        let doc: ScheduleDoc = serde_json::from_str("{}").unwrap();
        assert!(doc.night.is_none());
        assert!(doc.dome.is_none());
        assert!(doc.actions.is_none());
    }
}
