// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! obs-config: parses and validates the daemon's JSON configuration file.
//!
//! Depends only on `obs-core` -- module resolution happens against the
//! `ActionModuleRegistry`/`DomeModuleRegistry` trait objects defined there,
//! so this crate never needs to know about `obs-backends`.

pub mod config;
pub mod error;
pub mod sensor;
pub mod site;

pub use config::{Config, DomeConfig};
pub use error::ConfigError;
pub use sensor::{EnvironmentConditionConfig, SensorConfig, DEFAULT_MAX_AGE};
pub use site::SiteConfig;
