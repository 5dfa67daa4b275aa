//! Client
//!
//! Blocking client for a gamevault server. One TCP connection, one call at
//! a time.

use std::io::{BufReader, BufWriter};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::error::{Result, VaultError};
use crate::protocol::{read_response, write_command, Command, Response, Status};
use crate::record::{RecordId, Videogame};

/// Remote handle to a `VideogameService`
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Client {
    /// Connect to a server
    pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .map_err(|e| VaultError::Network(format!("Failed to connect: {}", e)))?;
        stream.set_nodelay(true)?;

        Ok(Self {
            reader: BufReader::new(stream.try_clone()?),
            writer: BufWriter::new(stream),
        })
    }

    /// Connect and verify `service` is bound on the server
    pub fn connect_service<A: ToSocketAddrs>(addr: A, service: &str) -> Result<Self> {
        let mut client = Self::connect(addr)?;
        if !client.lookup(service)? {
            return Err(VaultError::ServiceNotBound(service.to_string()));
        }
        Ok(client)
    }

    /// Set a timeout for waiting on responses
    pub fn set_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        self.reader.get_ref().set_read_timeout(timeout)?;
        self.writer.get_ref().set_write_timeout(timeout)?;
        Ok(())
    }

    /// All records in store order
    pub fn list(&mut self) -> Result<Vec<Videogame>> {
        let response = self.call(&Command::List)?;
        expect_ok(&response, "LIST")?;
        Ok(serde_json::from_slice(response.payload_bytes())?)
    }

    /// Fetch a record, `None` if the server has no such id
    pub fn get(&mut self, id: RecordId) -> Result<Option<Videogame>> {
        let response = self.call(&Command::Get { id })?;
        if response.status == Status::NotFound {
            return Ok(None);
        }
        expect_ok(&response, "GET")?;
        Ok(Some(serde_json::from_slice(response.payload_bytes())?))
    }

    /// Create a record; the returned copy carries the assigned id
    pub fn create(&mut self, record: &Videogame) -> Result<Videogame> {
        let response = self.call(&Command::Create {
            record: record.clone(),
        })?;
        expect_ok(&response, "CREATE")?;
        Ok(serde_json::from_slice(response.payload_bytes())?)
    }

    /// Upsert a record by its id
    pub fn update(&mut self, record: &Videogame) -> Result<Videogame> {
        let response = self.call(&Command::Update {
            record: record.clone(),
        })?;
        expect_ok(&response, "UPDATE")?;
        Ok(serde_json::from_slice(response.payload_bytes())?)
    }

    /// Delete a record; true if one was removed
    pub fn delete(&mut self, id: RecordId) -> Result<bool> {
        let response = self.call(&Command::Delete { id })?;
        expect_ok(&response, "DELETE")?;
        match response.payload_bytes() {
            [flag] => Ok(*flag != 0),
            other => Err(VaultError::Protocol(format!(
                "DELETE response: expected 1-byte flag, got {} bytes",
                other.len()
            ))),
        }
    }

    /// Health check
    pub fn ping(&mut self) -> Result<()> {
        let response = self.call(&Command::Ping)?;
        expect_ok(&response, "PING")
    }

    /// Whether a service is bound under `service`
    pub fn lookup(&mut self, service: &str) -> Result<bool> {
        let response = self.call(&Command::Lookup {
            service: service.to_string(),
        })?;
        if response.status == Status::NotFound {
            return Ok(false);
        }
        expect_ok(&response, "LOOKUP")?;
        Ok(true)
    }

    /// Send a command and read its response
    ///
    /// ERROR and PERSIST_FAILED statuses are turned into `Err`.
    pub fn call(&mut self, command: &Command) -> Result<Response> {
        write_command(&mut self.writer, command)?;
        let response = read_response(&mut self.reader)?;

        match response.status {
            Status::Error => Err(VaultError::Remote(response.message())),
            Status::PersistFailed => Err(VaultError::Persist(response.message())),
            Status::Ok | Status::NotFound => Ok(response),
        }
    }
}

fn expect_ok(response: &Response, name: &str) -> Result<()> {
    if response.status != Status::Ok {
        return Err(VaultError::Protocol(format!(
            "{} response: unexpected status {:?}",
            name, response.status
        )));
    }
    Ok(())
}
