//! Configuration for gamevault
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Main configuration for a gamevault instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Store Configuration
    // -------------------------------------------------------------------------
    /// Backing JSON document holding the whole collection
    pub document_path: PathBuf,

    /// Write the document indented (true) or compact (false)
    pub pretty: bool,

    /// How new record ids are assigned on create
    pub id_strategy: IdStrategy,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Well-known name clients look the service up by
    pub service_name: String,

    /// TCP listen address
    pub listen_addr: String,

    /// Number of worker threads serving connections
    pub worker_threads: usize,

    /// Max accepted connections waiting for a free worker
    pub max_connections: usize,

    /// Connection read timeout (milliseconds, must be > 0)
    ///
    /// Also bounds how long `Server::run()` waits for an idle connection
    /// after shutdown.
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 disables)
    pub write_timeout_ms: u64,
}

/// Id assignment strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdStrategy {
    /// Previous id + 1
    Sequential,

    /// Current unix time in seconds, bumped past the previous id on collision
    Clock,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            document_path: PathBuf::from("./videogames.json"),
            pretty: true,
            id_strategy: IdStrategy::Sequential,
            service_name: "VideogameService".to_string(),
            listen_addr: "127.0.0.1:1099".to_string(),
            worker_threads: 8,
            max_connections: 1024,
            read_timeout_ms: 30_000,
            write_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the backing document path
    pub fn document_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.document_path = path.into();
        self
    }

    /// Toggle indented document output
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.config.pretty = pretty;
        self
    }

    /// Set the id assignment strategy
    pub fn id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.config.id_strategy = strategy;
        self
    }

    /// Set the name the service is bound under
    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.config.service_name = name.into();
        self
    }

    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the number of worker threads
    pub fn worker_threads(mut self, count: usize) -> Self {
        self.config.worker_threads = count;
        self
    }

    /// Set the maximum number of queued connections
    pub fn max_connections(mut self, count: usize) -> Self {
        self.config.max_connections = count;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
