// SPDX-License-Identifier: MIT

//! One-shot RPC client: connect, send a single framed `Request`, read the
//! framed `Response`, disconnect. The daemon's listener accepts any number
//! of requests per connection, but the CLI only ever needs one per
//! invocation (spec §6).

use std::net::TcpStream;
use std::time::Duration;

use obs_wire::{decode, encode, read_message, write_message, Request, Response};

use crate::exit_error::ExitError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub fn send(host: &str, request: &Request) -> Result<Response, ExitError> {
    let addr = host
        .parse()
        .or_else(|_| format!("{host}:7624").parse())
        .map_err(|_| ExitError::local(format!("invalid daemon address '{host}'")))?;

    let mut stream = TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT)
        .map_err(|e| ExitError::local(format!("could not reach daemon at {host}: {e}")))?;

    let payload = encode(request).map_err(|e| ExitError::local(format!("encoding request: {e}")))?;
    write_message(&mut stream, &payload).map_err(|e| ExitError::local(format!("sending request: {e}")))?;

    let bytes = read_message(&mut stream).map_err(|e| ExitError::local(format!("reading response: {e}")))?;
    decode(&bytes).map_err(|e| ExitError::local(format!("decoding response: {e}")))
}
