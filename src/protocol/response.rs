//! Response definitions
//!
//! Typed call results and the status-framed responses sent to clients.

use crate::error::{Result, VaultError};
use crate::record::Videogame;

use super::codec::MAX_PAYLOAD_SIZE;

/// Response status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Ok = 0x00,
    NotFound = 0x01,
    Error = 0x02,
    PersistFailed = 0x03,
}

/// A response to send to client
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Status code
    pub status: Status,

    /// Optional payload (JSON result for OK, message for ERROR/PERSIST_FAILED)
    pub payload: Option<Vec<u8>>,
}

impl Response {
    /// Create an OK response with optional payload
    pub fn ok(payload: Option<Vec<u8>>) -> Self {
        Self {
            status: Status::Ok,
            payload,
        }
    }

    /// Create a NOT_FOUND response
    pub fn not_found() -> Self {
        Self {
            status: Status::NotFound,
            payload: None,
        }
    }

    /// Create an ERROR response
    pub fn error(message: &str) -> Self {
        Self {
            status: Status::Error,
            payload: Some(message.as_bytes().to_vec()),
        }
    }

    /// Create a PERSIST_FAILED response
    pub fn persist_failed(message: &str) -> Self {
        Self {
            status: Status::PersistFailed,
            payload: Some(message.as_bytes().to_vec()),
        }
    }

    /// Build the wire response for a service reply
    ///
    /// - `Records`        → OK, JSON array
    /// - `Record(Some)`   → OK, JSON object
    /// - `Record(None)`   → NOT_FOUND
    /// - `Deleted(b)`     → OK, one byte (0/1)
    /// - `Pong`           → OK, "PONG"
    /// - `Bound(true)`    → OK, empty
    /// - `Bound(false)`   → NOT_FOUND
    ///
    /// A payload that would not fit in one frame is a `Protocol` error, so
    /// the caller can still answer with ERROR instead of dropping the
    /// connection.
    pub fn from_reply(reply: &Reply) -> Result<Self> {
        let response = match reply {
            Reply::Records(records) => Self::ok(Some(serde_json::to_vec(records)?)),
            Reply::Record(Some(record)) => Self::ok(Some(serde_json::to_vec(record)?)),
            Reply::Record(None) => Self::not_found(),
            Reply::Deleted(removed) => Self::ok(Some(vec![*removed as u8])),
            Reply::Pong => Self::ok(Some(b"PONG".to_vec())),
            Reply::Bound(true) => Self::ok(None),
            Reply::Bound(false) => Self::not_found(),
        };

        let size = response.payload_bytes().len();
        if size > MAX_PAYLOAD_SIZE as usize {
            return Err(VaultError::Protocol(format!(
                "Reply too large: {} bytes (max {})",
                size, MAX_PAYLOAD_SIZE
            )));
        }
        Ok(response)
    }

    /// Payload bytes, empty when absent
    pub fn payload_bytes(&self) -> &[u8] {
        self.payload.as_deref().unwrap_or(&[])
    }

    /// Payload as text (for ERROR/PERSIST_FAILED messages)
    pub fn message(&self) -> String {
        String::from_utf8_lossy(self.payload_bytes()).into_owned()
    }
}

/// Typed result of executing a command
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// `list`
    Records(Vec<Videogame>),

    /// `get`, `create`, `update`
    Record(Option<Videogame>),

    /// `delete`: whether a record was removed
    Deleted(bool),

    /// `ping`
    Pong,

    /// `lookup`: whether the name is bound
    Bound(bool),
}
