// SPDX-License-Identifier: MIT

//! Length-prefixed JSON framing: a 4-byte big-endian length prefix followed
//! by the JSON payload. Blocking `std::io`, not async -- the daemon's RPC
//! dispatcher is a plain OS thread per connection.

use std::io::{self, Read, Write};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("message of {0} bytes exceeds the {1}-byte limit")]
    TooLarge(u32, u32),
}

/// Largest single message this protocol will read, guarding against a
/// malformed or hostile length prefix.
pub const MAX_MESSAGE_BYTES: u32 = 16 * 1024 * 1024;

/// Serialize `value` to raw JSON bytes (no length prefix).
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, ProtocolError> {
    Ok(serde_json::to_vec(value)?)
}

/// Deserialize raw JSON bytes (no length prefix) into `T`.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ProtocolError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Write `payload` to `out` with a 4-byte big-endian length prefix.
pub fn write_message<W: Write>(out: &mut W, payload: &[u8]) -> Result<(), ProtocolError> {
    let len = u32::try_from(payload.len()).unwrap_or(u32::MAX);
    out.write_all(&len.to_be_bytes())?;
    out.write_all(payload)?;
    out.flush()?;
    Ok(())
}

/// Read one length-prefixed message from `input`.
pub fn read_message<R: Read>(input: &mut R) -> Result<Vec<u8>, ProtocolError> {
    let mut len_buf = [0u8; 4];
    input.read_exact(&mut len_buf)?;
    let len = u32::from_be_bytes(len_buf);
    if len > MAX_MESSAGE_BYTES {
        return Err(ProtocolError::TooLarge(len, MAX_MESSAGE_BYTES));
    }
    let mut payload = vec![0u8; len as usize];
    input.read_exact(&mut payload)?;
    Ok(payload)
}

/// Read one framed `Request` from `input`.
pub fn read_request<R: Read>(input: &mut R) -> Result<crate::Request, ProtocolError> {
    let bytes = read_message(input)?;
    decode(&bytes)
}

/// Write one framed `Response` to `out`.
pub fn write_response<W: Write>(out: &mut W, response: &crate::Response) -> Result<(), ProtocolError> {
    let bytes = encode(response)?;
    write_message(out, &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Response;

    #[test]
    fn encode_returns_json_without_length_prefix() {
        let response = Response::Command(obs_core::CommandStatus::Succeeded);
        let encoded = encode(&response).expect("encode failed");
        let json_str = std::str::from_utf8(&encoded).expect("should be valid UTF-8");
        assert!(json_str.starts_with('{'), "should be JSON object: {json_str}");
    }

    #[test]
    fn read_write_message_roundtrip() {
        let original = b"hello world";
        let mut buffer = Vec::new();
        write_message(&mut buffer, original).expect("write failed");
        assert_eq!(buffer.len(), 4 + original.len());

        let mut cursor = io::Cursor::new(buffer);
        let read_back = read_message(&mut cursor).expect("read failed");
        assert_eq!(read_back, original);
    }

    #[test]
    fn write_message_adds_length_prefix() {
        let data = b"test data";
        let mut buffer = Vec::new();
        write_message(&mut buffer, data).expect("write failed");

        let len = u32::from_be_bytes([buffer[0], buffer[1], buffer[2], buffer[3]]) as usize;
        assert_eq!(len, data.len());
        assert_eq!(&buffer[4..], data);
    }

    #[test]
    fn read_message_rejects_oversized_length_prefix() {
        let mut buffer = Vec::new();
        buffer.extend_from_slice(&(MAX_MESSAGE_BYTES + 1).to_be_bytes());
        let mut cursor = io::Cursor::new(buffer);
        let err = read_message(&mut cursor).unwrap_err();
        assert!(matches!(err, ProtocolError::TooLarge(_, _)));
    }

    #[test]
    fn request_response_round_trip_through_framing() {
        let req = crate::Request::DomeControl { auto: true };
        let mut buffer = Vec::new();
        write_message(&mut buffer, &encode(&req).unwrap()).unwrap();
        let mut cursor = io::Cursor::new(buffer);
        let read_back = read_request(&mut cursor).unwrap();
        assert_eq!(read_back, req);
    }
}
