//! TCP Server
//!
//! Accepts connections and dispatches to worker threads.

use std::io::{BufWriter, ErrorKind};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, TrySendError};

use crate::config::Config;
use crate::error::{Result, VaultError};
use crate::protocol::{write_response, Response};
use crate::service::VideogameService;

use super::Connection;

/// How long the acceptor sleeps when no connection is pending
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// TCP server exposing a `VideogameService`
///
/// ## Threads
/// - the caller of `run()` is the acceptor
/// - `worker_threads` workers pull accepted streams from a bounded channel
///   of `max_connections` slots; a connection arriving while the queue is
///   full is answered with an ERROR and closed
pub struct Server {
    config: Config,
    service: Arc<VideogameService>,
    listener: TcpListener,
    shutdown: AtomicBool,
}

impl Server {
    /// Bind the listen address from `config`
    pub fn bind(config: Config, service: Arc<VideogameService>) -> Result<Self> {
        if config.worker_threads == 0 {
            return Err(VaultError::Config("worker_threads must be at least 1".to_string()));
        }
        if config.max_connections == 0 {
            return Err(VaultError::Config("max_connections must be at least 1".to_string()));
        }
        // Idle connections end only at the read timeout, and run() waits for them
        if config.read_timeout_ms == 0 {
            return Err(VaultError::Config(
                "read_timeout_ms must be greater than 0".to_string(),
            ));
        }

        let listener = TcpListener::bind(&config.listen_addr).map_err(|e| {
            VaultError::Network(format!("Failed to bind {}: {}", config.listen_addr, e))
        })?;
        listener.set_nonblocking(true)?;

        Ok(Self {
            config,
            service,
            listener,
            shutdown: AtomicBool::new(false),
        })
    }

    /// Address actually bound (useful with port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Start the server (blocking until `shutdown()` is called)
    pub fn run(&self) -> Result<()> {
        let (tx, rx) = channel::bounded::<TcpStream>(self.config.max_connections);
        let workers = self.spawn_workers(rx)?;

        tracing::info!(
            "Service '{}' listening on {} with {} workers",
            self.config.service_name,
            self.local_addr()?,
            workers.len()
        );

        while !self.shutdown.load(Ordering::Acquire) {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    if let Err(e) = stream.set_nonblocking(false) {
                        tracing::warn!("Dropping {}: cannot make blocking: {}", peer, e);
                        continue;
                    }
                    match tx.try_send(stream) {
                        Ok(()) => tracing::trace!("Queued connection from {}", peer),
                        Err(TrySendError::Full(stream)) => {
                            tracing::warn!("Connection queue full, refusing {}", peer);
                            refuse(stream);
                        }
                        Err(TrySendError::Disconnected(_)) => {
                            return Err(VaultError::Network("All workers exited".to_string()));
                        }
                    }
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) => {
                    tracing::warn!("Accept failed: {}", e);
                }
            }
        }

        tracing::info!("Shutting down, waiting for workers");
        drop(tx);
        for worker in workers {
            if worker.join().is_err() {
                tracing::error!("Worker thread panicked");
            }
        }

        Ok(())
    }

    /// Signal the server to shutdown gracefully
    ///
    /// `run()` stops accepting and returns once in-flight connections end.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
    }

    fn spawn_workers(&self, rx: Receiver<TcpStream>) -> Result<Vec<JoinHandle<()>>> {
        (0..self.config.worker_threads)
            .map(|i| {
                let rx = rx.clone();
                let service = Arc::clone(&self.service);
                let read_ms = self.config.read_timeout_ms;
                let write_ms = self.config.write_timeout_ms;

                thread::Builder::new()
                    .name(format!("gamevault-worker-{}", i))
                    .spawn(move || {
                        for stream in rx.iter() {
                            serve(stream, Arc::clone(&service), read_ms, write_ms);
                        }
                    })
                    .map_err(VaultError::from)
            })
            .collect()
    }
}

/// Serve one connection to completion
fn serve(stream: TcpStream, service: Arc<VideogameService>, read_ms: u64, write_ms: u64) {
    let result = Connection::new(stream, service).and_then(|mut conn| {
        conn.set_timeouts(read_ms, write_ms)?;
        conn.handle()
    });

    if let Err(e) = result {
        tracing::warn!("Connection ended with error: {}", e);
    }
}

/// Tell a client there is no room and drop it
fn refuse(stream: TcpStream) {
    let mut writer = BufWriter::new(stream);
    let _ = write_response(&mut writer, &Response::error("server busy"));
}
