//! Store Module
//!
//! The in-memory record collection and its backing JSON document.
//!
//! ## Responsibilities
//! - Hold records in insertion order (`RecordTable`)
//! - Load the collection once at startup, tolerating a missing or corrupt file
//! - Persist the full collection after every mutation (`Document`)
//!
//! ## Document Format
//! ```text
//! [
//!   { "id": 1, "title": "Chess", "platform": "PC" },
//!   { "id": 2, "title": "Go" }
//! ]
//! ```
//!
//! ## Write Path
//! ```text
//! serialize ──► videogames.json.tmp ──► fsync ──► rename ──► videogames.json
//! ```
//! A crash at any point leaves either the old or the new document, never a
//! truncated one.

mod table;
mod document;

pub use table::RecordTable;
pub use document::Document;
