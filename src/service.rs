//! Service Module
//!
//! The remote-callable CRUD operation set over the record store.
//!
//! ## Responsibilities
//! - Load the backing document once on open
//! - Serve list/get/create/update/delete against the in-memory table
//! - Persist the full table after every mutation
//! - Roll the table back when persisting fails

use std::path::Path;

use parking_lot::Mutex;

use crate::config::Config;
use crate::error::{Result, VaultError};
use crate::ids::IdGenerator;
use crate::protocol::{Command, Reply};
use crate::record::{RecordId, Videogame};
use crate::store::{Document, RecordTable};

/// Mutable state guarded by the service lock
#[derive(Debug, Clone)]
struct State {
    table: RecordTable,
    ids: IdGenerator,
}

/// The videogame CRUD service
///
/// ## Concurrency Model: one serialization point
///
/// Every call, reads included, runs inside `state`'s mutex. Mutations hold
/// the lock across modify → persist → (rollback), so each call is atomic
/// with respect to every other call and the document always matches a state
/// some caller was told about.
///
/// One instance is shared (via `Arc`) by all connection workers.
pub struct VideogameService {
    /// Service configuration
    config: Config,

    /// Backing JSON document
    document: Document,

    /// Table + id generator
    state: Mutex<State>,
}

impl VideogameService {
    /// Open the service with the given config
    ///
    /// On startup:
    /// 1. Load the backing document (missing/corrupt → empty)
    /// 2. Seed the id generator from the largest loaded id
    /// 3. Ready to serve requests
    pub fn open(config: Config) -> Result<Self> {
        if config.document_path.as_os_str().is_empty() {
            return Err(VaultError::Config("Document path is empty".to_string()));
        }

        let document = Document::new(&config.document_path, config.pretty);
        let table = RecordTable::from_records(document.load());
        let ids = IdGenerator::for_table(config.id_strategy, &table);

        tracing::info!(
            "Opened {} with {} records (next id after {})",
            document.path().display(),
            table.len(),
            ids.last()
        );

        Ok(Self {
            config,
            document,
            state: Mutex::new(State { table, ids }),
        })
    }

    /// Open with a document path (convenience method)
    ///
    /// Uses default config with the specified document
    pub fn open_path(path: &Path) -> Result<Self> {
        let mut config = Config::default();
        config.document_path = path.to_path_buf();
        Self::open(config)
    }

    /// Execute a command
    ///
    /// Routes commands to appropriate handlers
    pub fn execute(&self, command: Command) -> Result<Reply> {
        match command {
            Command::List => Ok(Reply::Records(self.list())),
            Command::Get { id } => Ok(Reply::Record(self.get(id))),
            Command::Create { record } => self.create(record).map(|r| Reply::Record(Some(r))),
            Command::Update { record } => self.update(record).map(|r| Reply::Record(Some(r))),
            Command::Delete { id } => self.delete(id).map(Reply::Deleted),
            Command::Ping => Ok(Reply::Pong),
            Command::Lookup { service } => Ok(Reply::Bound(service == self.config.service_name)),
        }
    }

    /// All records in store order
    pub fn list(&self) -> Vec<Videogame> {
        self.state.lock().table.records().to_vec()
    }

    /// First record with a matching id, `None` if absent
    pub fn get(&self, id: RecordId) -> Option<Videogame> {
        self.state.lock().table.find(id).cloned()
    }

    /// Store a new record
    ///
    /// Any id on the input is replaced by a freshly assigned one.
    pub fn create(&self, record: Videogame) -> Result<Videogame> {
        self.mutate("create", |state| {
            let id = state.ids.next(&state.table)?;
            let record = record.normalized().with_id(id);
            state.table.push(record.clone());
            tracing::debug!("Created record {}", id);
            Ok(record)
        })
    }

    /// Replace the record with `record.id`, inserting it if absent (upsert)
    ///
    /// The replacement is appended, so an updated record moves to the end
    /// of the list.
    pub fn update(&self, record: Videogame) -> Result<Videogame> {
        self.mutate("update", |state| {
            let record = record.normalized();
            let replaced = state.table.remove(record.id).is_some();
            state.ids.observe(record.id);
            state.table.push(record.clone());
            tracing::debug!("Updated record {} (replaced: {})", record.id, replaced);
            Ok(record)
        })
    }

    /// Remove the record with `id`
    ///
    /// The document is written whether or not anything was removed.
    pub fn delete(&self, id: RecordId) -> Result<bool> {
        self.mutate("delete", |state| {
            let removed = state.table.remove(id).is_some();
            tracing::debug!("Deleted record {} (found: {})", id, removed);
            Ok(removed)
        })
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.state.lock().table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().table.is_empty()
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the backing document path
    pub fn document_path(&self) -> &Path {
        self.document.path()
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Apply a mutation and persist, restoring the previous state on failure
    ///
    /// Called for every create/update/delete. The lock is held throughout.
    /// A failing `apply` persists nothing.
    fn mutate<T, F>(&self, op: &str, apply: F) -> Result<T>
    where
        F: FnOnce(&mut State) -> Result<T>,
    {
        let mut state = self.state.lock();
        let snapshot = state.clone();

        let result = match apply(&mut state) {
            Ok(result) => result,
            Err(e) => {
                *state = snapshot;
                tracing::warn!("{} rejected: {}", op, e);
                return Err(e);
            }
        };

        if let Err(e) = self.document.persist(state.table.records()) {
            *state = snapshot;
            tracing::error!(
                "{} not persisted to {}, rolled back: {}",
                op,
                self.document.path().display(),
                e
            );
            return Err(VaultError::Persist(format!(
                "{}: {}",
                self.document.path().display(),
                e
            )));
        }

        Ok(result)
    }
}
