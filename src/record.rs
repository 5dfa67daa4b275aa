//! Record definitions
//!
//! A videogame entry: an integer id plus fields the store never looks at.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier type for records
pub type RecordId = i64;

/// JSON key holding the record id
const ID_FIELD: &str = "id";

/// A single videogame record
///
/// Only `id` is interpreted. Every other key of the JSON object (title,
/// platform, ...) is carried verbatim in `fields`, in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Videogame {
    /// Unique within a store; missing in the JSON means 0
    #[serde(default)]
    pub id: RecordId,

    /// Opaque remaining fields
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Videogame {
    /// Create an empty record with the given id
    pub fn new(id: RecordId) -> Self {
        Self {
            id,
            fields: Map::new(),
        }
    }

    /// Builder-style field setter
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_field(name, value);
        self
    }

    /// Set (or replace) a field
    ///
    /// `"id"` is never stored among the opaque fields: an integer value
    /// sets the record id, anything else is ignored.
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        if name == ID_FIELD {
            match value.as_i64() {
                Some(id) => self.id = id,
                None => tracing::warn!("Ignoring non-integer id field: {}", value),
            }
            return;
        }
        self.fields.insert(name, value);
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Same record with a different id
    pub fn with_id(mut self, id: RecordId) -> Self {
        self.id = id;
        self
    }

    /// Drop any `"id"` key inserted into `fields` directly
    ///
    /// `id` serializes next to the flattened fields, so a second `"id"` key
    /// would make the document unreadable.
    pub fn normalized(mut self) -> Self {
        if self.fields.remove(ID_FIELD).is_some() {
            tracing::warn!("Dropped duplicate id key from record {}", self.id);
        }
        self
    }
}
