//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! ### Request (Command) Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Cmd (1)  │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Payload by Command Type
//! - LIST:   empty
//! - GET:    id (8 bytes, big-endian i64)
//! - CREATE: record JSON
//! - UPDATE: record JSON
//! - DELETE: id (8 bytes, big-endian i64)
//! - PING:   empty
//! - LOOKUP: service name (UTF-8)
//!
//! ### Response Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │Status(1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```

use std::io::{Read, Write};

use bytes::{BufMut, BytesMut};

use crate::error::{Result, VaultError};
use crate::record::{RecordId, Videogame};
use super::{Command, Response, Status};

/// Header size: 1 byte command/status + 4 bytes length
pub const HEADER_SIZE: usize = 5;

/// Maximum payload size (16 MB)
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

/// Size of an encoded record id
const ID_SIZE: usize = 8;

// =============================================================================
// Command Encoding/Decoding
// =============================================================================

/// Encode a command to bytes
///
/// Format: cmd_type (1) + payload_len (4) + payload
pub fn encode_command(command: &Command) -> Result<Vec<u8>> {
    let payload = match command {
        Command::List | Command::Ping => Vec::new(),
        Command::Get { id } | Command::Delete { id } => id.to_be_bytes().to_vec(),
        Command::Create { record } | Command::Update { record } => serde_json::to_vec(record)?,
        Command::Lookup { service } => service.as_bytes().to_vec(),
    };

    frame(command.command_type() as u8, &payload)
}

/// Decode a command from bytes
pub fn decode_command(bytes: &[u8]) -> Result<Command> {
    let (cmd_type, payload) = split_frame(bytes, "")?;

    match cmd_type {
        0x01 => expect_empty(payload, "LIST").map(|_| Command::List),
        0x02 => decode_id(payload, "GET").map(|id| Command::Get { id }),
        0x03 => decode_record(payload, "CREATE").map(|record| Command::Create { record }),
        0x04 => decode_record(payload, "UPDATE").map(|record| Command::Update { record }),
        0x05 => decode_id(payload, "DELETE").map(|id| Command::Delete { id }),
        0x06 => expect_empty(payload, "PING").map(|_| Command::Ping),
        0x07 => decode_lookup(payload),
        _ => Err(VaultError::Protocol(format!(
            "Unknown command type: 0x{:02x}",
            cmd_type
        ))),
    }
}

/// Decode an id payload (GET, DELETE)
fn decode_id(payload: &[u8], name: &str) -> Result<RecordId> {
    let bytes: [u8; ID_SIZE] = payload.try_into().map_err(|_| {
        VaultError::Protocol(format!(
            "{} command: expected {}-byte id, got {} bytes",
            name,
            ID_SIZE,
            payload.len()
        ))
    })?;
    Ok(RecordId::from_be_bytes(bytes))
}

/// Decode a record payload (CREATE, UPDATE)
fn decode_record(payload: &[u8], name: &str) -> Result<Videogame> {
    serde_json::from_slice(payload)
        .map_err(|e| VaultError::Protocol(format!("{} command: invalid record: {}", name, e)))
}

/// Decode LOOKUP command payload
fn decode_lookup(payload: &[u8]) -> Result<Command> {
    let service = std::str::from_utf8(payload)
        .map_err(|e| VaultError::Protocol(format!("LOOKUP command: invalid name: {}", e)))?;
    Ok(Command::Lookup {
        service: service.to_string(),
    })
}

/// Commands without arguments must carry no payload
fn expect_empty(payload: &[u8], name: &str) -> Result<()> {
    if !payload.is_empty() {
        return Err(VaultError::Protocol(format!(
            "{} command: unexpected payload of {} bytes",
            name,
            payload.len()
        )));
    }
    Ok(())
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a response to bytes
///
/// Format: status (1) + payload_len (4) + payload
pub fn encode_response(response: &Response) -> Result<Vec<u8>> {
    frame(response.status as u8, response.payload_bytes())
}

/// Decode a response from bytes
pub fn decode_response(bytes: &[u8]) -> Result<Response> {
    let (status_byte, payload) = split_frame(bytes, "response ")?;

    let status = match status_byte {
        0x00 => Status::Ok,
        0x01 => Status::NotFound,
        0x02 => Status::Error,
        0x03 => Status::PersistFailed,
        _ => {
            return Err(VaultError::Protocol(format!(
                "Unknown response status: 0x{:02x}",
                status_byte
            )))
        }
    };

    let payload = if payload.is_empty() {
        None
    } else {
        Some(payload.to_vec())
    };

    Ok(Response { status, payload })
}

// =============================================================================
// Framing
// =============================================================================

/// Prefix a payload with its type byte and length
fn frame(kind: u8, payload: &[u8]) -> Result<Vec<u8>> {
    if payload.len() > MAX_PAYLOAD_SIZE as usize {
        return Err(VaultError::Protocol(format!(
            "Payload too large: {} bytes (max {})",
            payload.len(),
            MAX_PAYLOAD_SIZE
        )));
    }

    let mut message = BytesMut::with_capacity(HEADER_SIZE + payload.len());
    message.put_u8(kind);
    message.put_u32(payload.len() as u32);
    message.put_slice(payload);

    Ok(message.to_vec())
}

/// Validate a header and return (type byte, payload)
fn split_frame<'a>(bytes: &'a [u8], what: &str) -> Result<(u8, &'a [u8])> {
    if bytes.len() < HEADER_SIZE {
        return Err(VaultError::Protocol(format!(
            "Incomplete {}header: expected {} bytes, got {}",
            what,
            HEADER_SIZE,
            bytes.len()
        )));
    }

    let payload_len = payload_len(&bytes[..HEADER_SIZE])?;
    let total_len = HEADER_SIZE + payload_len;
    if bytes.len() < total_len {
        return Err(VaultError::Protocol(format!(
            "Incomplete {}payload: expected {} bytes, got {}",
            what,
            total_len,
            bytes.len()
        )));
    }

    Ok((bytes[0], &bytes[HEADER_SIZE..total_len]))
}

/// Parse and bound-check the length field of a header
fn payload_len(header: &[u8]) -> Result<usize> {
    let len = u32::from_be_bytes([header[1], header[2], header[3], header[4]]);
    if len > MAX_PAYLOAD_SIZE {
        return Err(VaultError::Protocol(format!(
            "Payload too large: {} bytes (max {})",
            len, MAX_PAYLOAD_SIZE
        )));
    }
    Ok(len as usize)
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read one complete frame (header + payload) from a stream
fn read_frame<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;

    let payload_len = payload_len(&header)?;

    let mut message = vec![0u8; HEADER_SIZE + payload_len];
    message[..HEADER_SIZE].copy_from_slice(&header);
    if payload_len > 0 {
        reader.read_exact(&mut message[HEADER_SIZE..])?;
    }

    Ok(message)
}

/// Read a complete command from a stream
///
/// Blocks until a complete command is received or an error occurs
pub fn read_command<R: Read>(reader: &mut R) -> Result<Command> {
    decode_command(&read_frame(reader)?)
}

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    let bytes = encode_command(command)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Read a complete response from a stream
pub fn read_response<R: Read>(reader: &mut R) -> Result<Response> {
    decode_response(&read_frame(reader)?)
}

/// Write a response to a stream
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    let bytes = encode_response(response)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}
