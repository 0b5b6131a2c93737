// SPDX-License-Identifier: MIT

//! IPC protocol between `obs-cli` and the operations daemon.
//!
//! Wire format: 4-byte length prefix (big-endian) + JSON payload.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod request;
mod response;
mod schedule;
mod wire;

pub use request::Request;
pub use response::{DomeStatusPayload, EnvironmentStatusPayload, Response, StatusPayload, TelescopeStatusPayload};
pub use schedule::{ActionDoc, DomeWindowDoc, ScheduleDoc};
pub use wire::{decode, encode, read_message, read_request, write_message, write_response, ProtocolError, MAX_MESSAGE_BYTES};
