// SPDX-License-Identifier: MIT

//! Top-level daemon configuration: parse the Config JSON (spec §6), resolve
//! dynamically-named modules against registries, and validate everything
//! up front. `Config` is immutable once built and lives for the process
//! lifetime (spec §3 Lifetimes).

use std::net::IpAddr;
use std::time::Duration;

use obs_core::{ActionModuleRegistry, DomeModuleRegistry};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::sensor::{EnvironmentConditionConfig, SensorConfig};
use crate::site::SiteConfig;

/// Dome backend configuration: which module to load, plus its
/// backend-specific settings (opaque to the core).
#[derive(Debug, Clone, PartialEq)]
pub struct DomeConfig {
    pub module: String,
    pub settings: serde_json::Value,
    pub open_timeout: Duration,
    pub close_timeout: Duration,
    pub movement_timeout: Duration,
    pub heartbeat_open_timeout: Duration,
    pub heartbeat_close_timeout: Duration,
    pub heartbeat_timeout: Duration,
}

/// Fully validated daemon configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub daemon: String,
    pub log_name: String,
    pub control_machines: Vec<IpAddr>,
    pub pipeline_machines: Vec<IpAddr>,
    pub actions_module: String,
    pub scripts_module: String,
    pub loop_delay: Duration,
    pub site: SiteConfig,
    pub dome: Option<DomeConfig>,
    pub environment_daemon: String,
    pub environment_conditions: Vec<EnvironmentConditionConfig>,
    pub environment_poll_grace_ticks: u32,
}

#[derive(Debug, Deserialize)]
struct RawSensor {
    label: String,
    sensor: String,
    parameter: String,
    #[serde(default)]
    cadence_secs: Option<u64>,
    #[serde(default)]
    max_age_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawCondition {
    label: String,
    sensors: Vec<RawSensor>,
}

#[derive(Debug, Deserialize)]
struct RawDome {
    module: String,
    #[serde(default)]
    settings: serde_json::Value,
    #[serde(default = "default_timeout_secs")]
    open_timeout_secs: u64,
    #[serde(default = "default_timeout_secs")]
    close_timeout_secs: u64,
    #[serde(default = "default_timeout_secs")]
    movement_timeout_secs: u64,
    #[serde(default = "default_heartbeat_secs")]
    heartbeat_open_timeout_secs: u64,
    #[serde(default = "default_heartbeat_secs")]
    heartbeat_close_timeout_secs: u64,
    #[serde(default = "default_heartbeat_secs")]
    heartbeat_timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_heartbeat_secs() -> u64 {
    30
}

fn default_grace_ticks() -> u32 {
    2
}

fn default_loop_delay_secs() -> u64 {
    10
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    daemon: String,
    #[serde(default)]
    log_name: Option<String>,
    #[serde(default)]
    control_machines: Vec<String>,
    #[serde(default)]
    pipeline_machines: Vec<String>,
    actions_module: String,
    #[serde(default)]
    scripts_module: Option<String>,
    #[serde(default = "default_loop_delay_secs")]
    loop_delay: u64,
    site_latitude: f64,
    site_longitude: f64,
    site_elevation: f64,
    sun_altitude_limit: f64,
    #[serde(default)]
    dome: Option<RawDome>,
    #[serde(default)]
    environment_daemon: Option<String>,
    #[serde(default)]
    environment_conditions: Vec<RawCondition>,
    #[serde(default = "default_grace_ticks")]
    environment_poll_grace_ticks: u32,
}

impl Config {
    /// Parse and fully validate a Config JSON document, resolving
    /// `actions_module`/`dome.module` against the supplied registries.
    ///
    /// Returns every validation failure found, not just the first.
    pub fn load(
        json: &str,
        actions: &dyn ActionModuleRegistry,
        domes: &dyn DomeModuleRegistry,
    ) -> Result<Config, Vec<ConfigError>> {
        let raw: RawConfig = serde_json::from_str(json)
            .map_err(|e| vec![ConfigError::Malformed(e.to_string())])?;

        let mut errors = Vec::new();

        let control_machines = parse_ips(&raw.control_machines, &mut errors, ConfigError::InvalidControlMachine);
        let pipeline_machines = parse_ips(&raw.pipeline_machines, &mut errors, ConfigError::InvalidPipelineMachine);

        if !actions.is_registered(&raw.actions_module) {
            errors.push(ConfigError::UnknownActionsModule(raw.actions_module.clone()));
        }

        let dome = match raw.dome {
            Some(d) => {
                if !domes.is_registered(&d.module) {
                    errors.push(ConfigError::UnknownDomeModule(d.module.clone()));
                }
                Some(DomeConfig {
                    module: d.module,
                    settings: d.settings,
                    open_timeout: Duration::from_secs(d.open_timeout_secs),
                    close_timeout: Duration::from_secs(d.close_timeout_secs),
                    movement_timeout: Duration::from_secs(d.movement_timeout_secs),
                    heartbeat_open_timeout: Duration::from_secs(d.heartbeat_open_timeout_secs),
                    heartbeat_close_timeout: Duration::from_secs(d.heartbeat_close_timeout_secs),
                    heartbeat_timeout: Duration::from_secs(d.heartbeat_timeout_secs),
                })
            }
            None => None,
        };

        if raw.sun_altitude_limit < -90.0 || raw.sun_altitude_limit > 90.0 {
            errors.push(ConfigError::InvalidValue {
                field: "sun_altitude_limit".to_string(),
                reason: "must be between -90 and 90 degrees".to_string(),
            });
        }

        let environment_conditions = raw
            .environment_conditions
            .into_iter()
            .map(|c| EnvironmentConditionConfig {
                label: c.label,
                sensors: c
                    .sensors
                    .into_iter()
                    .map(|s| SensorConfig {
                        label: s.label,
                        sensor: s.sensor,
                        parameter: s.parameter,
                        cadence: s.cadence_secs.map(Duration::from_secs),
                        max_age: s.max_age_secs.map(Duration::from_secs),
                    })
                    .collect(),
            })
            .collect();

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Config {
            daemon: raw.daemon,
            log_name: raw.log_name.unwrap_or_else(|| "opsd".to_string()),
            control_machines,
            pipeline_machines,
            actions_module: raw.actions_module,
            scripts_module: raw.scripts_module.unwrap_or_default(),
            loop_delay: Duration::from_secs(raw.loop_delay),
            site: SiteConfig {
                latitude_deg: raw.site_latitude,
                longitude_deg: raw.site_longitude,
                elevation_m: raw.site_elevation,
                sun_altitude_limit_deg: raw.sun_altitude_limit,
            },
            dome,
            environment_daemon: raw.environment_daemon.unwrap_or_default(),
            environment_conditions,
            environment_poll_grace_ticks: raw.environment_poll_grace_ticks,
        })
    }

    /// Whether `addr` is authorized to issue control commands.
    pub fn is_control_machine(&self, addr: IpAddr) -> bool {
        self.control_machines.iter().any(|m| *m == addr)
    }

    /// Whether `addr` is authorized to send pipeline notifications.
    pub fn is_pipeline_machine(&self, addr: IpAddr) -> bool {
        self.pipeline_machines.iter().any(|m| *m == addr)
    }
}

fn parse_ips(
    raw: &[String],
    errors: &mut Vec<ConfigError>,
    to_error: impl Fn(String) -> ConfigError,
) -> Vec<IpAddr> {
    let mut out = Vec::with_capacity(raw.len());
    for entry in raw {
        match entry.parse::<IpAddr>() {
            Ok(ip) => out.push(ip),
            Err(_) => errors.push(to_error(entry.clone())),
        }
    }
    out
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
