// SPDX-License-Identifier: MIT

//! RPC listener (spec §5, §6): one blocking OS thread per connection,
//! reading/writing length-prefixed JSON requests/responses.

use std::net::{TcpListener, TcpStream};
use std::sync::Arc;

use obs_core::Clock;
use obs_wire::{read_request, write_response};

use crate::daemon::OperationsDaemon;

/// Accept connections on `listener` until the process is told to stop,
/// spawning one handler thread per connection.
pub fn serve<C: Clock + 'static>(listener: TcpListener, daemon: Arc<OperationsDaemon<C>>) {
    for incoming in listener.incoming() {
        match incoming {
            Ok(stream) => {
                let daemon = daemon.clone();
                std::thread::spawn(move || handle_connection(stream, &daemon));
            }
            Err(e) => tracing::warn!(error = %e, "failed to accept connection"),
        }
    }
}

fn handle_connection<C: Clock + 'static>(mut stream: TcpStream, daemon: &OperationsDaemon<C>) {
    let caller = match stream.peer_addr() {
        Ok(addr) => addr.ip(),
        Err(e) => {
            tracing::warn!(error = %e, "could not determine peer address");
            return;
        }
    };

    loop {
        let request = match read_request(&mut stream) {
            Ok(req) => req,
            Err(e) => {
                if !is_clean_disconnect(&e) {
                    tracing::warn!(error = %e, %caller, "failed to read request");
                }
                return;
            }
        };

        let response = daemon.handle(request, caller);
        if let Err(e) = write_response(&mut stream, &response) {
            tracing::warn!(error = %e, %caller, "failed to write response");
            return;
        }
    }
}

fn is_clean_disconnect(e: &obs_wire::ProtocolError) -> bool {
    matches!(e, obs_wire::ProtocolError::Io(io_err) if io_err.kind() == std::io::ErrorKind::UnexpectedEof)
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
