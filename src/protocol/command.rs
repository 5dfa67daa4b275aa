//! Command definitions
//!
//! Represents remote calls from clients.

use crate::record::{RecordId, Videogame};

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandType {
    List = 0x01,
    Get = 0x02,
    Create = 0x03,
    Update = 0x04,
    Delete = 0x05,
    Ping = 0x06,
    Lookup = 0x07,
}

/// A parsed command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// List every record in store order
    List,

    /// Fetch a record by id
    Get { id: RecordId },

    /// Store a new record under a freshly assigned id
    Create { record: Videogame },

    /// Replace (or insert) the record with `record.id`
    Update { record: Videogame },

    /// Remove a record by id
    Delete { id: RecordId },

    /// Ping (health check)
    Ping,

    /// Ask whether a service is bound under this name
    Lookup { service: String },
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::List => CommandType::List,
            Command::Get { .. } => CommandType::Get,
            Command::Create { .. } => CommandType::Create,
            Command::Update { .. } => CommandType::Update,
            Command::Delete { .. } => CommandType::Delete,
            Command::Ping => CommandType::Ping,
            Command::Lookup { .. } => CommandType::Lookup,
        }
    }
}
