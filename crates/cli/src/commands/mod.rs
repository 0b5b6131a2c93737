// SPDX-License-Identifier: MIT

//! CLI subcommand implementations, one module per `opsctl` verb group.

pub mod dome;
pub mod registries;
pub mod schedule;
pub mod script;
pub mod status;
pub mod tel;
pub mod validate;
