//! RecordTable implementation
//!
//! Vec-backed ordered collection. Lookups are linear scans; the collection
//! is small and order must match the document.

use crate::record::{RecordId, Videogame};

/// In-memory ordered sequence of records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordTable {
    records: Vec<Videogame>,
}

impl RecordTable {
    /// Create a new empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from already loaded records
    ///
    /// Later duplicates of an id are dropped so the table starts out
    /// satisfying the one-record-per-id invariant.
    pub fn from_records(records: Vec<Videogame>) -> Self {
        let mut table = Self::new();
        for record in records {
            if table.contains(record.id) {
                tracing::warn!("Dropping duplicate record with id {}", record.id);
                continue;
            }
            table.records.push(record);
        }
        table
    }

    /// All records in store order
    pub fn records(&self) -> &[Videogame] {
        &self.records
    }

    /// First record with a matching id
    pub fn find(&self, id: RecordId) -> Option<&Videogame> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Whether a record with this id exists
    pub fn contains(&self, id: RecordId) -> bool {
        self.find(id).is_some()
    }

    /// Remove the first record with a matching id
    pub fn remove(&mut self, id: RecordId) -> Option<Videogame> {
        let pos = self.records.iter().position(|r| r.id == id)?;
        Some(self.records.remove(pos))
    }

    /// Append a record at the end
    pub fn push(&mut self, record: Videogame) {
        self.records.push(record);
    }

    /// Highest id present, if any
    pub fn max_id(&self) -> Option<RecordId> {
        self.records.iter().map(|r| r.id).max()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
