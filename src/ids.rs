//! Id assignment
//!
//! Strictly increasing record ids, seeded from the largest id already in
//! the store. Every candidate is checked against the table before use.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::IdStrategy;
use crate::error::{Result, VaultError};
use crate::record::RecordId;
use crate::store::RecordTable;

/// Hands out ids for newly created records
///
/// Not internally synchronized; the service calls it with the store lock held.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    strategy: IdStrategy,

    /// Highest id handed out or observed so far
    last: RecordId,
}

impl IdGenerator {
    /// Create a generator that continues after `seed`
    pub fn new(strategy: IdStrategy, seed: RecordId) -> Self {
        Self { strategy, last: seed }
    }

    /// Seed from the largest id in `table` (0 when empty)
    pub fn for_table(strategy: IdStrategy, table: &RecordTable) -> Self {
        Self::new(strategy, table.max_id().unwrap_or(0).max(0))
    }

    /// Next free id, never returned before and not present in `table`
    ///
    /// Fails with `IdsExhausted` once no id above the current floor is left.
    /// The generator is left unchanged in that case.
    pub fn next(&mut self, table: &RecordTable) -> Result<RecordId> {
        let floor = self.last.checked_add(1).ok_or(VaultError::IdsExhausted)?;
        let mut candidate = match self.strategy {
            IdStrategy::Sequential => floor,
            IdStrategy::Clock => unix_seconds().max(floor),
        };
        while table.contains(candidate) {
            candidate = candidate.checked_add(1).ok_or(VaultError::IdsExhausted)?;
        }
        self.last = candidate;
        Ok(candidate)
    }

    /// Raise the floor to an id inserted from outside (e.g. an upsert)
    pub fn observe(&mut self, id: RecordId) {
        self.last = self.last.max(id);
    }

    /// Highest id handed out or observed so far
    pub fn last(&self) -> RecordId {
        self.last
    }

    pub fn strategy(&self) -> IdStrategy {
        self.strategy
    }
}

fn unix_seconds() -> RecordId {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as RecordId)
        .unwrap_or(0)
}
